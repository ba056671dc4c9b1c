//! Server mode
//!
//! Configures and starts the HTTP server. Only `GET /metrics` is routed;
//! everything else falls through to an empty 404. No access-logging
//! middleware is installed: the exporter is scraped every few seconds and
//! would otherwise drown its own log.

use actix_web::{App, HttpServer, middleware::from_fn, web};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::api::middleware::MetricsAuth;
use crate::api::services::MetricsService;
use crate::config::AppConfig;
use crate::metrics::Metrics;

pub async fn run_server(config: AppConfig, metrics: Arc<Metrics>) -> Result<()> {
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting exporter at http://{}/metrics", bind_address);

    let auth = config.auth.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(metrics.clone()))
            .app_data(web::Data::new(auth.clone()))
            .service(
                web::scope("/metrics")
                    .wrap(from_fn(MetricsAuth::basic_auth))
                    .route("", web::get().to(MetricsService::metrics)),
            )
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
