//! HTTP Response types

use smallvec::SmallVec;

/// HTTP Status Code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    // 2xx Success
    pub const OK: StatusCode = StatusCode(200);
    pub const CREATED: StatusCode = StatusCode(201);
    pub const NO_CONTENT: StatusCode = StatusCode(204);

    // 4xx Client Errors
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);

    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Get the numeric code
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Get the reason phrase
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }

    /// Check if this is a success status (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// Check if this is a client error status (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

/// HTTP Response
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: StatusCode,
    /// Response headers (stack-allocated for small header counts)
    pub headers: SmallVec<[(String, String); 8]>,
    /// Response body
    pub body: bytes::Bytes,
}

impl Response {
    /// Create a new response
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: SmallVec::new(),
            body: bytes::Bytes::new(),
        }
    }

    /// Create a 200 OK response
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Create a JSON response
    pub fn json(body: impl Into<bytes::Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::OK)
            .header("content-type", "application/json")
            .body(body)
            .build()
    }

    /// Create a text response
    pub fn text(body: impl Into<bytes::Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::OK)
            .header("content-type", "text/plain; charset=utf-8")
            .body(body)
            .build()
    }

    /// Create an HTML response
    pub fn html(body: impl Into<bytes::Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::OK)
            .header("content-type", "text/html; charset=utf-8")
            .body(body)
            .build()
    }

    /// Create a 404 Not Found response
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NOT_FOUND)
            .header("content-type", "text/plain")
            .body("Not Found")
            .build()
    }

    /// Create a 405 Method Not Allowed response
    pub fn method_not_allowed() -> Self {
        ResponseBuilder::new(StatusCode::METHOD_NOT_ALLOWED)
            .header("content-type", "text/plain")
            .body("Method Not Allowed")
            .build()
    }

    /// Create a 400 Bad Request response
    pub fn bad_request(message: &str) -> Self {
        ResponseBuilder::new(StatusCode::BAD_REQUEST)
            .header("content-type", "text/plain")
            .body(message.to_string())
            .build()
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Get content-type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get body as string (if UTF-8)
    pub fn body_string(&self) -> Option<String> {
        std::str::from_utf8(&self.body).ok().map(|s| s.to_string())
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}

/// Builder for constructing responses
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    /// Create a new builder
    pub fn new(status: StatusCode) -> Self {
        Self {
            response: Response::new(status),
        }
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response.headers.push((name.into(), value.into()));
        self
    }

    /// Set body
    pub fn body(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.response.body = body.into();
        self
    }

    /// Build the response
    pub fn build(self) -> Response {
        self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        assert!(StatusCode::OK.is_success());
        assert!(StatusCode::NOT_FOUND.is_client_error());
        assert_eq!(StatusCode::METHOD_NOT_ALLOWED.to_string(), "405 Method Not Allowed");
    }

    #[test]
    fn test_response_json() {
        let res = Response::json(r#"{"foo":"bar"}"#);
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.content_type(), Some("application/json"));
    }

    #[test]
    fn test_response_builder() {
        let res = ResponseBuilder::new(StatusCode::CREATED)
            .header("x-custom", "value")
            .body("Hello")
            .build();

        assert_eq!(res.status, StatusCode::CREATED);
        assert_eq!(res.header("x-custom"), Some("value"));
        assert_eq!(res.body_string(), Some("Hello".to_string()));
    }
}
