//! Request routing, CORS and panic recovery.
//!
//! Everything here is transport-free: handlers take an `HttpRequest` and
//! return an `HttpResponse`.

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, error};

use super::http::{HttpRequest, HttpResponse};
use super::ServerState;
use crate::config::CorsConfig;
use crate::parser;
use crate::transform;

/// Header carrying the number of skipped constructs.
pub const WARNINGS_HEADER: &str = "X-Tree-Warnings";

const TREE_PREFIX: &str = "/tree/";

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
}

/// Route a request, recovering from handler panics, and apply CORS headers.
pub fn handle(request: &HttpRequest, state: &ServerState) -> HttpResponse {
    let response = match panic::catch_unwind(AssertUnwindSafe(|| route(request, state))) {
        Ok(response) => response,
        Err(payload) => {
            error!(
                method = %request.method,
                path = %request.path,
                panic = panic_message(payload.as_ref()),
                "handler panicked"
            );
            HttpResponse::error(500, "internal server error")
        }
    };
    with_cors(response, request.header("Origin"), &state.config().cors)
}

/// Route request to handler
pub fn route(request: &HttpRequest, state: &ServerState) -> HttpResponse {
    let method = request.method.as_str();
    let path = request.path.as_str();

    if method == "OPTIONS" {
        return preflight(&state.config().cors);
    }

    if let Some(selector) = path.strip_prefix(TREE_PREFIX) {
        return match method {
            "POST" if !selector.is_empty() && !selector.contains('/') => {
                handle_tree(request, selector)
            }
            "POST" => HttpResponse::error(404, "not found"),
            _ => method_not_allowed("POST, OPTIONS"),
        };
    }

    match (method, path) {
        ("GET", "/health") => handle_health(state),
        ("GET", "/languages") => HttpResponse::json(200, &parser::selectors()),
        (_, "/health" | "/languages") => method_not_allowed("GET, OPTIONS"),
        _ => HttpResponse::error(404, "not found"),
    }
}

/// Handle POST /tree/{language}
fn handle_tree(request: &HttpRequest, selector: &str) -> HttpResponse {
    let outline = match transform::transform(selector, &request.body) {
        Ok(outline) => outline,
        Err(e) => {
            debug!(language = selector, error = %e, "rejected tree request");
            return HttpResponse::error(400, &e.to_string());
        }
    };

    let warnings = outline.warnings.len().to_string();
    let response = if wants_warnings(request) {
        HttpResponse::json(200, &outline)
    } else {
        HttpResponse::json(200, &outline.nodes)
    };
    response.with_header(WARNINGS_HEADER, &warnings)
}

/// Handle GET /health
fn handle_health(state: &ServerState) -> HttpResponse {
    HttpResponse::json(
        200,
        &HealthResponse {
            status: "ok",
            version: state.version(),
            uptime_secs: state.uptime_secs(),
        },
    )
}

fn wants_warnings(request: &HttpRequest) -> bool {
    matches!(request.query_param("warnings"), Some("" | "1" | "true"))
}

fn method_not_allowed(allow: &str) -> HttpResponse {
    HttpResponse::error(405, "method not allowed").with_header("Allow", allow)
}

fn preflight(cors: &CorsConfig) -> HttpResponse {
    HttpResponse::new(204)
        .with_header("Access-Control-Allow-Methods", &cors.allow_methods.join(", "))
        .with_header("Access-Control-Allow-Headers", &cors.allow_headers.join(", "))
        .with_header("Access-Control-Max-Age", &cors.max_age_secs.to_string())
}

/// Add cross-origin headers for the request's origin.
pub(crate) fn with_cors(
    response: HttpResponse,
    origin: Option<&str>,
    cors: &CorsConfig,
) -> HttpResponse {
    let Some(allowed) = cors.allowed_origin(origin) else {
        return response;
    };
    let response = response
        .with_header("Access-Control-Allow-Origin", &allowed)
        .with_header("Access-Control-Expose-Headers", WARNINGS_HEADER);
    if allowed == "*" {
        response
    } else {
        response.with_header("Vary", "Origin")
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
