use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LINK};
use axum::http::{HeaderMap, HeaderName, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::Instrument;

use crate::error::DetailedError;

const TRUE_CLIENT_IP: HeaderName = HeaderName::from_static("true-client-ip");
const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");
const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_CSRF_TOKEN: HeaderName = HeaderName::from_static("x-csrf-token");

/// Looks at `True-Client-IP`, then `X-Real-IP`, then the first
/// `X-Forwarded-For` entry. A header that does not hold an address is
/// skipped.
pub fn client_ip_from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    header_ip(headers, &TRUE_CLIENT_IP)
        .or_else(|| header_ip(headers, &X_REAL_IP))
        .or_else(|| {
            header_str(headers, &X_FORWARDED_FOR)
                .and_then(|value| value.split(',').next())
                .and_then(parse_ip)
        })
}

fn header_ip(headers: &HeaderMap, name: &HeaderName) -> Option<IpAddr> {
    header_str(headers, name).and_then(parse_ip)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse().ok()
}

/// Runs the rest of the stack inside a request span carrying the real
/// client address, falling back to the socket peer.
pub async fn real_ip(request: Request, next: Next) -> Response {
    let client_ip = client_ip_from_headers(request.headers()).or_else(|| {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    });

    let client_ip_field = client_ip.map(|ip| ip.to_string()).unwrap_or_default();

    let span = tracing::info_span!(
        "http.request",
        method = %request.method(),
        route = %request.uri().path(),
        client_ip = %client_ip_field,
    );

    next.run(request).instrument(span).await
}

/// Swaps an error body for its detailed form when `expose` is set.
pub async fn expose_error_detail(State(expose): State<bool>, mut response: Response) -> Response {
    match response.extensions_mut().remove::<DetailedError>() {
        Some(DetailedError(body)) if expose => (response.status(), Json(body)).into_response(),
        _ => response,
    }
}

/// Browser access from any origin, credentials included.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE, X_CSRF_TOKEN])
        .expose_headers([LINK])
        .allow_credentials(true)
        .max_age(Duration::from_secs(300))
}
