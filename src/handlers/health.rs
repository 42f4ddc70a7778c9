// src/handlers/health.rs

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
