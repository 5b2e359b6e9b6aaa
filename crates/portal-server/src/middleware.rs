use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Assigns each request an `x-request-id`, preserving an inbound one, and
/// echoes it on the response.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");

    let req_id_value = req
        .headers()
        .get(&header_name)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap());

    // Available to downstream layers (e.g. the trace span).
    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;

    res.headers_mut().insert(header_name, req_id_value);

    res
}
