//! Serving boundary: bind a listener and hand requests to the engine
//!
//! The engine is consumed when serving starts and moved behind an `Arc`,
//! so the route tables are immutable while connections are in flight.
//! Each accepted connection runs on its own tokio task.

use crate::{Engine, Error, Method, Request, Response, Result};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub hostname: String,
    pub workers: usize,
}

impl ServerConfig {
    /// The `host:port` string this config binds to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            hostname: "0.0.0.0".to_string(),
            workers: num_cpus::get(),
        }
    }
}

impl Engine {
    /// Accept connections on `addr` and dispatch every request.
    ///
    /// `addr` may omit the host (`":8081"` binds on all interfaces).
    /// Consumes the engine: no routes can be added once serving starts.
    pub async fn run(self, addr: &str) -> Result<()> {
        let addr = resolve_addr(addr)?;
        let listener = bind_listener(&addr)?;
        let listener = tokio::net::TcpListener::from_std(listener)?;
        tracing::info!(%addr, "listening");

        let engine = Arc::new(self);
        loop {
            let (stream, peer) = listener.accept().await?;
            stream.set_nodelay(true).ok();
            let engine = engine.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req: hyper::Request<Incoming>| {
                    let engine = engine.clone();
                    async move {
                        let response = match from_hyper_request(req) {
                            Ok(request) => engine.dispatch(request).await,
                            Err(err) => Response::bad_request(&err.to_string()),
                        };
                        Ok::<_, Infallible>(to_hyper_response(response))
                    }
                });
                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::debug!(%peer, error = %err, "connection error");
                }
            });
        }
    }

    /// Blocking entrypoint: build a multi-threaded runtime per `config`
    /// and serve on its address.
    pub fn serve(self, config: ServerConfig) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.workers)
            .enable_all()
            .build()?;
        runtime.block_on(self.run(&config.addr()))
    }
}

fn resolve_addr(addr: &str) -> Result<SocketAddr> {
    let addr = if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    };
    addr.as_str()
        .to_socket_addrs()?
        .next()
        .ok_or(Error::InvalidAddress(addr))
}

/// Create a TCP listener with the usual socket options set.
fn bind_listener(addr: &SocketAddr) -> std::io::Result<std::net::TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR - allow binding to address in TIME_WAIT
    socket.set_reuse_address(true)?;

    // SO_REUSEPORT - enable kernel load balancing across processes
    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    // TCP_NODELAY - disable Nagle's algorithm for lower latency
    socket.set_nodelay(true)?;

    socket.bind(&(*addr).into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// Convert a hyper request into our Request type.
///
/// The body is left unread; routing never consumes it.
pub fn from_hyper_request<B>(req: hyper::Request<B>) -> Result<Request> {
    let method = Method::from_str(req.method().as_str())?;
    let uri = req.uri();
    let path = uri.path().to_string();
    let query = uri.query().map(|q| q.to_string());

    let mut request = Request::new(method, path);
    request.query = query;

    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            request.headers.push((name.to_string(), v.to_string()));
        }
    }

    Ok(request)
}

/// Convert our Response to a hyper response.
pub fn to_hyper_response(res: Response) -> hyper::Response<Full<Bytes>> {
    let mut builder = hyper::Response::builder().status(res.status.as_u16());

    for (name, value) in &res.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder.body(Full::new(res.body)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusCode;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert!(config.workers >= 1);
        assert_eq!(config.addr(), format!("0.0.0.0:{}", config.port));
    }

    #[test]
    fn test_resolve_addr() {
        assert_eq!(resolve_addr(":8081").unwrap().port(), 8081);
        assert_eq!(
            resolve_addr("127.0.0.1:9000").unwrap(),
            "127.0.0.1:9000".parse().unwrap()
        );
        assert!(resolve_addr("not an address").is_err());
    }

    #[test]
    fn test_from_hyper_request() {
        let req = hyper::Request::builder()
            .method("GET")
            .uri("/users/7?page=2")
            .header("x-request-id", "abc")
            .body(())
            .unwrap();

        let request = from_hyper_request(req).unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/users/7");
        assert_eq!(request.query.as_deref(), Some("page=2"));
        assert_eq!(request.header("x-request-id"), Some("abc"));
    }

    #[test]
    fn test_to_hyper_response() {
        let res = Response::new(StatusCode::NOT_FOUND);
        let hyper_res = to_hyper_response(res);
        assert_eq!(hyper_res.status(), hyper::StatusCode::NOT_FOUND);

        let res = Response::json("{}");
        let hyper_res = to_hyper_response(res);
        assert_eq!(
            hyper_res.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
