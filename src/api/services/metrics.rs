//! Prometheus metrics endpoint
//!
//! Renders the registry snapshot in Prometheus text format at `GET /metrics`.

use actix_web::{HttpResponse, Responder, web};
use tracing::error;

use crate::metrics::Metrics;

/// Metrics service handler
pub struct MetricsService;

impl MetricsService {
    /// Handle metrics export request
    pub async fn metrics(metrics: web::Data<Metrics>) -> impl Responder {
        match metrics.export() {
            Ok(output) => HttpResponse::Ok()
                .content_type("text/plain; version=0.0.4; charset=utf-8")
                .body(output),
            Err(e) => {
                error!("[{}] metrics encoding failed: {}", e.code(), e);
                HttpResponse::InternalServerError().finish()
            }
        }
    }
}
