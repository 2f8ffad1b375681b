use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Service banner with the available endpoints.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Resume Generator API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /template": "Download the Excel template",
            "POST /generate": "Upload a filled template and get download links",
            "GET /download/{file_id}/{file_type}": "Download a generated pdf or docx",
            "POST /generate-preview": "Summarise an uploaded template",
            "GET /health": "Health check"
        }
    }))
}

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api",
        "timestamp": chrono::Local::now().to_rfc3339()
    }))
}
