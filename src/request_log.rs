use std::{net::SocketAddr, time::Instant};

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{error, info};
use uuid::Uuid;

pub const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Tags every response with an `X-Request-ID` and logs one line per request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::now_v7().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let ip = client_ip(&request);
    let start = Instant::now();

    let mut response = next.run(request).await;

    let status = response.status();
    let duration = start.elapsed();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID, value);
    }

    if status.is_server_error() {
        let status = status.as_u16();
        error!(%request_id, %method, %path, status, ?duration, %ip, "request failed");
    } else {
        let status = status.as_u16();
        info!(%request_id, %method, %path, status, ?duration, %ip, "request handled");
    }

    response
}

/// First `X-Forwarded-For` hop, then `X-Real-IP`, then the peer address.
fn client_ip(request: &Request) -> String {
    let headers = request.headers();

    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|ip| !ip.is_empty()) {
            return first.to_owned();
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        return real_ip.to_owned();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http};

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().uri("/health");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn forwarded_for_takes_the_first_hop() {
        let req = request(&[
            ("x-forwarded-for", " 203.0.113.7 , 10.0.0.1"),
            ("x-real-ip", "10.0.0.2"),
        ]);
        assert_eq!(client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn real_ip_is_the_fallback() {
        assert_eq!(client_ip(&request(&[("x-real-ip", "10.0.0.2")])), "10.0.0.2");
    }

    #[test]
    fn peer_address_when_no_proxy_headers() {
        let mut req = request(&[]);
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(client_ip(&req), "127.0.0.1");
        assert_eq!(client_ip(&request(&[])), "unknown");
    }
}
