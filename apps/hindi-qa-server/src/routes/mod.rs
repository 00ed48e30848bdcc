//! Route modules for the Hindi QA server

pub mod health;
pub mod ocr;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;
use crate::state::AppState;

/// Local frontend dev server
const DEV_ORIGIN: &str = "http://localhost:5173";

/// Build the application router with CORS and request tracing
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors);

    Router::new()
        .merge(health::router())
        .merge(ocr::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let frontend_url = config.frontend_url.clone();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|origin| is_allowed_origin(origin, frontend_url.as_deref()))
                .unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// The dev server, any `https://*.vercel.app` deployment and the configured frontend
fn is_allowed_origin(origin: &str, frontend_url: Option<&str>) -> bool {
    if origin == DEV_ORIGIN {
        return true;
    }

    let vercel = origin
        .strip_prefix("https://")
        .and_then(|host| host.strip_suffix(".vercel.app"))
        .is_some_and(|sub| !sub.is_empty() && !sub.contains('/'));

    vercel || frontend_url.is_some_and(|url| url.trim_end_matches('/') == origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origins() {
        assert!(is_allowed_origin("http://localhost:5173", None));
        assert!(is_allowed_origin("https://hindi-ocr.vercel.app", None));
        assert!(is_allowed_origin("https://my.site.org", Some("https://my.site.org/")));

        assert!(!is_allowed_origin("http://localhost:3000", None));
        assert!(!is_allowed_origin("http://hindi-ocr.vercel.app", None));
        assert!(!is_allowed_origin("https://.vercel.app", None));
        assert!(!is_allowed_origin("https://evil.com/x.vercel.app", None));
        assert!(!is_allowed_origin("https://my.site.org", None));
    }
}
