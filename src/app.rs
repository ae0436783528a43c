use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::routes::{analysis, health};
use crate::state::AppState;

/// Headers browsers may send on cross-origin analysis calls
fn allowed_headers() -> [HeaderName; 4] {
    [
        header::AUTHORIZATION,
        HeaderName::from_static("x-client-info"),
        HeaderName::from_static("apikey"),
        header::CONTENT_TYPE,
    ]
}

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api", analysis::router())
        .layer(cors_layer())
        .layer(allow_headers_layer())
        .with_state(state)
}

/// Any origin; OPTIONS pre-flights are answered here with an empty body
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(allowed_headers())
}

/// Same allow-list on plain responses, success or error; pre-flights keep the CORS layer's value
fn allow_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("authorization, x-client-info, apikey, content-type"),
    )
}
