//! Minimal blocking HTTP/1.1 request parsing and response writing.
//!
//! Works over any `Read`/`Write` pair. Limited surface:
//! - One request per connection (no keep-alive)
//! - No chunked transfer encoding (rejected)
//! - POST/PUT/PATCH require Content-Length
//! - Header cap: 32 KiB, body cap from config (enforced with `Read::take`)

use std::io::{BufRead, Read, Write};

use thiserror::Error;

/// Maximum header section size (32 KiB)
const MAX_HEADER_SIZE: usize = 32 * 1024;

/// Maximum number of headers parsed
const MAX_HEADERS: usize = 64;

/// A request that could not be read.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("headers too large")]
    HeadersTooLarge,
    #[error("connection closed mid-request")]
    Truncated,
    #[error("HTTP parse error: {0}")]
    Malformed(String),
    #[error("chunked transfer encoding not supported")]
    Chunked,
    #[error("{0} requires Content-Length")]
    LengthRequired(String),
    #[error("request body too large")]
    BodyTooLarge,
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}

impl RequestError {
    /// Status code to answer with.
    pub fn status(&self) -> u16 {
        match self {
            RequestError::HeadersTooLarge => 431,
            RequestError::LengthRequired(_) => 411,
            RequestError::BodyTooLarge => 413,
            _ => 400,
        }
    }
}

/// Parsed HTTP request (transport-free).
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub method: String,
    /// Path without the query string
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Get header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter. A bare key (`?verbose`) yields an empty value.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then_some(value)
        })
    }
}

/// HTTP response to write back.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Create a JSON response
    pub fn json(status: u16, value: &impl serde::Serialize) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body,
            },
            Err(e) => Self::error(500, &format!("failed to serialize response: {}", e)),
        }
    }

    /// Create a JSON error response: `{"error": message}`
    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string().into_bytes();
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Reason phrase for common status codes
fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        411 => "Length Required",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Read and parse one HTTP request from a buffered stream.
///
/// Returns `Ok(None)` if the connection closed before any byte arrived.
pub fn read_request(
    stream: &mut impl BufRead,
    max_body_size: usize,
) -> Result<Option<HttpRequest>, RequestError> {
    let Some(header_buf) = read_header_section(stream)? else {
        return Ok(None);
    };

    let mut parsed_headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut parsed_headers);

    match req.parse(&header_buf) {
        Ok(httparse::Status::Complete(_)) => {}
        Ok(httparse::Status::Partial) => {
            return Err(RequestError::Malformed("incomplete request".to_string()));
        }
        Err(e) => return Err(RequestError::Malformed(e.to_string())),
    }

    let method = req.method.unwrap_or("").to_string();
    let target = req.path.unwrap_or("/");
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target.to_string(), None),
    };

    let mut headers = Vec::with_capacity(req.headers.len());
    let mut content_length: Option<usize> = None;
    let mut chunked = false;

    for h in req.headers.iter() {
        let name = h.name.to_string();
        let value = String::from_utf8_lossy(h.value).to_string();

        if name.eq_ignore_ascii_case("Content-Length") {
            let len = value.trim().parse::<usize>().map_err(|_| {
                RequestError::Malformed(format!("invalid Content-Length: {}", value.trim()))
            })?;
            content_length = Some(len);
        }
        if name.eq_ignore_ascii_case("Transfer-Encoding")
            && value.to_lowercase().contains("chunked")
        {
            chunked = true;
        }

        headers.push((name, value));
    }

    if chunked {
        return Err(RequestError::Chunked);
    }

    let body = if matches!(method.as_str(), "POST" | "PUT" | "PATCH") {
        let len = content_length.ok_or_else(|| RequestError::LengthRequired(method.clone()))?;
        if len > max_body_size {
            return Err(RequestError::BodyTooLarge);
        }
        let mut body = Vec::with_capacity(len);
        stream.take(len as u64).read_to_end(&mut body)?;
        if body.len() < len {
            return Err(RequestError::Truncated);
        }
        body
    } else {
        Vec::new()
    };

    Ok(Some(HttpRequest {
        method,
        path,
        query,
        headers,
        body,
    }))
}

/// Read up to and including the blank line that ends the headers.
fn read_header_section(stream: &mut impl BufRead) -> Result<Option<Vec<u8>>, RequestError> {
    let mut header_buf = Vec::with_capacity(1024);

    loop {
        let read = stream.read_until(b'\n', &mut header_buf)?;
        if read == 0 {
            if header_buf.is_empty() {
                return Ok(None); // clean close
            }
            return Err(RequestError::Truncated);
        }
        if header_buf.len() > MAX_HEADER_SIZE {
            return Err(RequestError::HeadersTooLarge);
        }
        if header_buf.ends_with(b"\r\n\r\n") || header_buf.ends_with(b"\n\n") {
            return Ok(Some(header_buf));
        }
    }
}

/// Write an HTTP response to a stream.
pub fn write_response(stream: &mut impl Write, response: &HttpResponse) -> std::io::Result<()> {
    let mut header_block = format!(
        "HTTP/1.1 {} {}\r\n",
        response.status,
        reason(response.status)
    );
    header_block.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    header_block.push_str("Connection: close\r\n");

    for (name, value) in &response.headers {
        header_block.push_str(&format!("{}: {}\r\n", name, value));
    }
    header_block.push_str("\r\n");

    stream.write_all(header_block.as_bytes())?;
    if !response.body.is_empty() {
        stream.write_all(&response.body)?;
    }
    stream.flush()
}
