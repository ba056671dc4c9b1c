//! Basic auth for the metrics endpoint
//!
//! Every failure mode (missing header, malformed header, wrong credentials,
//! unconfigured password) resolves to a 401 with a Basic challenge and an
//! empty body; nothing here ever becomes a server error.

use actix_web::middleware::Next;
use actix_web::{
    Error, HttpResponse, body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    web,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::config::AuthConfig;

const CHALLENGE: &str = "Basic realm=\"Asterisk Metrics\"";

pub struct MetricsAuth;

impl MetricsAuth {
    /// Metrics endpoint authentication middleware
    pub async fn basic_auth(
        req: ServiceRequest,
        next: Next<BoxBody>,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let authorized = req
            .app_data::<web::Data<AuthConfig>>()
            .filter(|auth| !auth.password.is_empty())
            .is_some_and(|auth| {
                req.headers()
                    .get(header::AUTHORIZATION)
                    .and_then(|h| h.to_str().ok())
                    .is_some_and(|h| check_basic(h, &auth.username, &auth.password))
            });

        if authorized {
            debug!("Metrics authentication succeeded");
            return next.call(req).await;
        }

        info!("Metrics authentication failed: invalid or missing credentials");
        Ok(req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((header::WWW_AUTHENTICATE, CHALLENGE))
                .finish(),
        ))
    }
}

/// Validate an `Authorization: Basic <base64>` header value.
fn check_basic(header_value: &str, username: &str, password: &str) -> bool {
    let Some((scheme, payload)) = header_value.split_once(' ') else {
        return false;
    };
    if !scheme.eq_ignore_ascii_case("basic") {
        return false;
    }
    let Ok(decoded) = BASE64.decode(payload.trim()) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };
    let Some((user, pass)) = decoded.split_once(':') else {
        return false;
    };

    // Constant-time on both halves to keep credential length/content
    // unobservable through timing
    let user_ok = user.as_bytes().ct_eq(username.as_bytes());
    let pass_ok = pass.as_bytes().ct_eq(password.as_bytes());
    bool::from(user_ok & pass_ok)
}
