//! Request correlation IDs.
//!
//! An `x-request-id` set by the load balancer is kept so storefront logs line
//! up with the proxy's; anything missing or unprintable is replaced with a
//! UUID v4. The ID lands on the `http_request` span, the Sentry scope and the
//! response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// The caller's request ID, if it is short printable ASCII.
fn inbound_request_id(headers: &HeaderMap) -> Option<&str> {
    let id = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let printable = id.bytes().all(|b| b.is_ascii_graphic());
    (printable && !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN).then_some(id)
}

pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = inbound_request_id(request.headers())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::try_from(request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers_with(id: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(id));
        headers
    }

    #[test]
    fn test_proxy_id_is_kept() {
        let headers = headers_with("lb-7f3a");
        assert_eq!(inbound_request_id(&headers), Some("lb-7f3a"));
    }

    #[test]
    fn test_unusable_ids_are_replaced() {
        assert_eq!(inbound_request_id(&HeaderMap::new()), None);
        assert_eq!(inbound_request_id(&headers_with("")), None);
        assert_eq!(inbound_request_id(&headers_with("two words")), None);

        let long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::try_from(long).unwrap());
        assert_eq!(inbound_request_id(&headers), None);
    }
}
