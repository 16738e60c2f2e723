use tracing::warn;

use crate::config::AppConfig;
use crate::server::api::{self, ApiError};

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

pub fn route_request(method: &str, path: &str, body: &str, config: &AppConfig) -> HttpResponse {
    // Query strings carry nothing the API reads.
    let path = path.split('?').next().unwrap_or(path);
    let result = match (method, path) {
        ("GET", "/api/health") => api::health_payload(),
        ("POST", "/api/simulate") => api::simulate_payload(body, config),
        ("POST", "/api/sensitivity") => api::sensitivity_payload(body, config),
        ("POST", "/api/optimize") => api::optimize_payload(body),
        ("POST", "/api/scenarios/generate") => api::generate_payload(body, config),
        ("POST", "/api/scenarios/compare") => api::compare_payload(body, config),
        ("POST", "/api/risk") => api::risk_payload(body),
        _ => return error_response(404, "Not Found", "Route not found"),
    };
    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(err) => api_error_response(method, path, err),
    }
}

fn api_error_response(method: &str, path: &str, err: ApiError) -> HttpResponse {
    if err.is_client_error() {
        warn!(method, path, error = %err, "rejected request");
        error_response(400, "Bad Request", &err.to_string())
    } else {
        warn!(method, path, error = %err, "request failed");
        error_response(500, "Internal Server Error", &err.to_string())
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    let body = serde_json::to_string_pretty(&serde_json::json!({
        "status": "error",
        "message": message
    }))
    .unwrap_or_else(|_| "{\n  \"status\": \"error\"\n}".to_string());
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body,
    }
}
