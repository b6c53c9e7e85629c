//! Minimal squall server: groups, verbs, parameters, catch-alls.

use squall_core::{Engine, Response};

#[tokio::main]
async fn main() -> squall_core::Result<()> {
    tracing_subscriber::fmt().init();

    let mut engine = Engine::new();

    let root = engine.group("");
    root.get("/hello", |_ctx| async { Response::text("Hello, squall\n") })?;
    root.get("/user/:id", |ctx| async move {
        Response::text(format!("user {}\n", ctx.param("id")))
    })?;
    root.get("/static/*filepath", |ctx| async move {
        Response::text(format!("would serve {}\n", ctx.param("filepath")))
    })?;

    let api = engine.group("/api");
    api.any("/ping", |_ctx| async { Response::json(r#"{"pong":true}"#) })?;

    engine.run(":8081").await
}
