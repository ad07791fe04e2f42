//! HTML front end.

mod error;
pub mod pages;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::Core;

pub use error::PageError;

/// Route table:
/// - GET  /         form and history
/// - POST /shorten  form field `url`, redirects to `/`
pub fn router(core: Arc<Core>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/shorten", post(pages::shorten))
        .with_state(core)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt as _;
    use httpmock::prelude::*;
    use tower::ServiceExt as _;

    use super::*;
    use crate::{
        auth::{fake::StaticIdentity, TokenManager},
        cache::MemoryCache,
        shortener,
        transport::{AuthorizedClientFactory, ReqwestTransport},
    };

    fn app(server: &MockServer, identity: StaticIdentity) -> Router {
        let tokens = TokenManager::new(identity, MemoryCache::new());
        let http = reqwest::Client::new();
        let authorizer = AuthorizedClientFactory::new(
            tokens,
            http.clone(),
            Arc::new(ReqwestTransport::new(http)),
        );
        let client = shortener::Client {
            base_url: server.base_url(),
            ..shortener::Client::new(authorizer)
        };
        router(Arc::new(Core::new(client)))
    }

    fn token() -> StaticIdentity {
        StaticIdentity::token("abc123", Duration::from_secs(3600))
    }

    async fn body_text(resp: axum::response::Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn shorten_request(url: &str) -> Request<Body> {
        let form = serde_urlencoded::to_string([("url", url)]).unwrap();
        Request::builder()
            .method("POST")
            .uri("/shorten")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap()
    }

    #[tokio::test]
    async fn index_renders_history() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/url/history")
                    .header("authorization", "OAuth abc123");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"items":[{"id":"s1","longUrl":"http://x"}]}"#);
            })
            .await;

        let resp = app(&server, token())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let page = body_text(resp).await;
        assert!(page.contains("s1"));
        assert!(page.contains("http://x"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn shorten_redirects_home() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/url")
                    .header("authorization", "OAuth abc123")
                    .json_body(serde_json::json!({"longUrl": "http://x"}));
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"id":"s1","longUrl":"http://x"}"#);
            })
            .await;

        let resp = app(&server, token())
            .oneshot(shorten_request("http://x"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/")
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn shorten_api_error_is_500_without_redirect() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/url");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"error":{"code":400,"message":"bad"}}"#);
            })
            .await;

        let resp = app(&server, token())
            .oneshot(shorten_request("http://x"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.headers().get(header::LOCATION).is_none());
        let body = body_text(resp).await;
        assert!(body.starts_with("error posting url: "));
        assert!(body.contains("bad"));
    }

    #[tokio::test]
    async fn shorten_without_form_posts_empty_url() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/url")
                    .json_body(serde_json::json!({"longUrl": ""}));
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"error":{"code":400,"message":"Required"}}"#);
            })
            .await;

        let resp = app(&server, token())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/shorten")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.headers().get(header::LOCATION).is_none());
        let body = body_text(resp).await;
        assert!(body.starts_with("error posting url: "));
        assert!(body.contains("Required"));
        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn identity_failure_is_500() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.path("/url/history");
                then.status(200).body("{}");
            })
            .await;

        let resp = app(&server, StaticIdentity::failing("metadata down"))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(resp).await;
        assert!(body.contains("error creating authorized client"));
        assert!(body.contains("metadata down"));
        mock.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let server = MockServer::start_async().await;

        let resp = app(&server, token())
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
