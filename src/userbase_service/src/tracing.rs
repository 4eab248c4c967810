use std::time::Duration;

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http::Response,
};
use ::tracing::{Level, Span};

/// Root span for a request, tagged with a fresh request id.
pub fn make_span_with_request_id(request: &Request<Body>) -> Span {
    let request_id = uuid::Uuid::new_v4();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    ::tracing::span!(
        Level::INFO,
        "[REQUEST]",
        method = ::tracing::field::display(request.method()),
        uri = ::tracing::field::display(request.uri()),
        route,
        version = ::tracing::field::debug(request.version()),
        request_id = ::tracing::field::display(request_id),
    )
}

pub fn on_request(_request: &Request<Body>, _span: &Span) {
    ::tracing::event!(Level::INFO, "[REQUEST START]");
}

pub fn on_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    let status = response.status();
    let status_code = status.as_u16();
    let status_code_class = status_code / 100;

    match status_code_class {
        4..=5 => {
            ::tracing::event!(
                Level::ERROR,
                latency = ?latency,
                status = status_code,
                "[REQUEST END]"
            )
        }
        _ => {
            ::tracing::event!(
                Level::INFO,
                latency = ?latency,
                status = status_code,
                "[REQUEST END]"
            )
        }
    };
}
