use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use service::AppState;
use sse::{EventStream, StreamItem};

/// Headers every event-stream response starts with.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

/// Wraps `stream` in a `200` response. Any header in `additional_headers`
/// replaces the default with the same name.
pub fn sse_response(stream: EventStream, additional_headers: HeaderMap) -> Response {
    let mut headers = default_headers();
    headers.extend(additional_headers);

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = StatusCode::OK;
    *response.headers_mut() = headers;
    response
}

/// Streams `items` until the client disconnects or the server shuts down.
pub fn stream_events<I>(app_state: &AppState, items: I) -> Response
where
    I: IntoIterator,
    I::Item: Into<StreamItem>,
{
    let stream = EventStream::new(items).with_shutdown(app_state.stream_shutdown());
    sse_response(stream, HeaderMap::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use events::{Event, RemoveFragments};

    fn one_shot() -> EventStream {
        EventStream::new([Event::from(RemoveFragments::new("#a"))])
    }

    #[tokio::test]
    async fn test_default_headers() {
        let response = sse_response(one_shot(), HeaderMap::new());

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/event-stream");
        assert_eq!(response.headers()[CACHE_CONTROL], "no-cache");
        assert_eq!(response.headers()[CONNECTION], "keep-alive");
    }

    #[tokio::test]
    async fn test_additional_headers_override_defaults() {
        let mut extra = HeaderMap::new();
        extra.insert("custom-header", HeaderValue::from_static("value"));
        extra.insert(CONTENT_TYPE, HeaderValue::from_static("override"));

        let response = sse_response(one_shot(), extra);

        assert_eq!(response.headers()["custom-header"], "value");
        assert_eq!(response.headers()[CONTENT_TYPE], "override");
        assert_eq!(response.headers()[CACHE_CONTROL], "no-cache");
        assert_eq!(response.headers().get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[tokio::test]
    async fn test_one_shot_body_is_complete() {
        let response = sse_response(one_shot(), HeaderMap::new());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            &body[..],
            b"event: datastar-remove-fragments\ndata: selector #a\n\n"
        );
    }
}
