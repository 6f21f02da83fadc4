//! End-to-end scenarios against a local mock server.
//!
//! Run with:
//!   cargo test --test api

use std::sync::Arc;

use cutter_api::net::{headers, signature, ErrorKind as NetErrorKind, TokenRefresher};
use cutter_api::rest::{EndPoint, SearchPostsBody};
use cutter_api::{
    Api, ApiClient, ClientConfig, Environment, FileCredentialStore, Keychain, LiveBackend,
    OAuthConfig, RefreshTokenProvider, Services,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn environment(uri: &str) -> Environment {
    Environment::new(uri, "api-key")
        .unwrap()
        .with_platform("ios")
        .with_locale("fr_FR")
}

fn keychain() -> Arc<Keychain> {
    Arc::new(
        Keychain::with_device_id("device-42")
            .with_access_token("a1")
            .with_refresh_token("r1"),
    )
}

fn live_api(uri: &str, keychain: Arc<Keychain>) -> ApiClient {
    let oauth = OAuthConfig::new(&format!("{}/oauth/token", uri), "mobile-app").unwrap();
    let refresher: Arc<dyn TokenRefresher> =
        Arc::new(RefreshTokenProvider::new(oauth, keychain.clone()));
    ApiClient::new(environment(uri), keychain, refresher, ClientConfig::default()).unwrap()
}

#[tokio::test]
async fn get_posts_is_a_signed_get_with_query_parameters() {
    let mock_server = MockServer::start().await;

    let url = format!("{}/posts?page=2&style=5", mock_server.uri());
    let expected_hmac = signature::sign(&signature::SignatureInput {
        url: &url,
        api_key: "api-key",
        platform: "ios",
        device_id: "device-42",
        parameters: None,
    })
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("page", "2"))
        .and(query_param("style", "5"))
        .and(header(headers::UUID, "device-42"))
        .and(header(headers::PLATFORM, "ios"))
        .and(header(headers::LOCALE, "fr_FR"))
        .and(header(headers::ACCESS_TOKEN, "a1"))
        .and(header(headers::HMAC, expected_hmac.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Linen", "styleId": 5}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = live_api(&mock_server.uri(), keychain())
        .get_posts(2, 5)
        .await
        .unwrap();

    assert_eq!(page.items[0].title, "Linen");
    assert!(!page.has_more_content_available);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("page=2&style=5"));
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn partial_content_flags_more_pages() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({"query": "denim", "page": 1})))
        .respond_with(ResponseTemplate::new(206).set_body_json(json!([
            {"id": 3, "title": "Denim on denim"}
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({"query": "denim", "page": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let api = live_api(&mock_server.uri(), keychain());

    let first = api.search_posts(1, SearchPostsBody::new("denim")).await.unwrap();
    assert!(first.has_more_content_available);

    let last = api.search_posts(2, SearchPostsBody::new("denim")).await.unwrap();
    assert!(!last.has_more_content_available);
}

#[tokio::test]
async fn delete_user_succeeds_on_no_content() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    live_api(&mock_server.uri(), keychain())
        .delete_user()
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn empty_success_body_is_no_data() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movies"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let err = live_api(&mock_server.uri(), keychain())
        .fetch_movies()
        .await
        .unwrap_err();

    assert!(matches!(err.net_kind(), Some(NetErrorKind::NoData)));
    assert_eq!(err.to_string(), "Response returned with no data to decode.");
}

#[tokio::test]
async fn expired_token_is_refreshed_once_and_persisted() {
    let mock_server = MockServer::start().await;
    let temp_dir = tempfile::TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header(headers::ACCESS_TOKEN, "a1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "a2",
            "refresh_token": "r2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header(headers::ACCESS_TOKEN, "a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = {
        let store = FileCredentialStore::open_at(temp_dir.path(), "default").unwrap();
        cutter_api::net::CredentialStore::set_access_token(&store, "a1".to_string());
        cutter_api::auth::RefreshTokenStore::set_refresh_token(&store, "r1".to_string());
        Arc::new(store)
    };

    let oauth = OAuthConfig::new(&format!("{}/oauth/token", mock_server.uri()), "mobile-app").unwrap();
    let api = ApiClient::new(
        environment(&mock_server.uri()),
        store.clone(),
        Arc::new(RefreshTokenProvider::new(oauth, store.clone())),
        ClientConfig::default(),
    )
    .unwrap();

    api.get_posts(1, 1).await.unwrap();

    let persisted = store.load("default").unwrap().unwrap();
    assert_eq!(persisted.access_token.as_deref(), Some("a2"));
    assert_eq!(persisted.refresh_token.as_deref(), Some("r2"));
}

#[tokio::test]
async fn failed_refresh_reaches_the_caller() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "refresh token revoked"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = live_api(&mock_server.uri(), keychain())
        .delete_user()
        .await
        .unwrap_err();

    assert!(err.is_auth_error());
    assert!(err.to_string().contains("invalid_grant"));
}

#[tokio::test]
async fn mocked_config_routes_to_mocked_server() {
    let real = MockServer::start().await;
    let mocked = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "title": "Alien"}])))
        .expect(1)
        .mount(&mocked)
        .await;

    let environment = environment(&real.uri())
        .with_mocked_server_url(&mocked.uri())
        .unwrap();
    let keychain = keychain();
    let oauth = OAuthConfig::new("https://auth.example.com/oauth/token", "mobile-app").unwrap();
    let api = ApiClient::new(
        environment,
        keychain.clone(),
        Arc::new(RefreshTokenProvider::new(oauth, keychain)),
        ClientConfig::builder().mocked(true).build(),
    )
    .unwrap();

    let movies = api.fetch_movies().await.unwrap();
    assert_eq!(movies[0].title, "Alien");
    assert!(real.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn mocked_api_argument_needs_no_server() {
    let keychain = keychain();
    let oauth = OAuthConfig::new("http://127.0.0.1:9/oauth/token", "mobile-app").unwrap();
    let live = LiveBackend {
        environment: environment("http://127.0.0.1:9"),
        credentials: keychain.clone(),
        refresher: Arc::new(RefreshTokenProvider::new(oauth, keychain)),
        config: ClientConfig::default(),
    };

    let services = Services::from_args(["app", "-mockedApi"], live.clone()).unwrap();
    let page = services.api().get_posts(1, 2).await.unwrap();
    assert_eq!(page.items.len(), 2);

    let services = Services::from_args(["app"], live).unwrap();
    let err = services.api().fetch_movies().await.unwrap_err();
    assert!(matches!(err.net_kind(), Some(NetErrorKind::Connectivity(_))));
}

#[tokio::test]
async fn background_request_can_be_cancelled() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movies"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let api = live_api(&mock_server.uri(), keychain());
    let (tx, rx) = tokio::sync::oneshot::channel();
    api.request_in_background(EndPoint::GetMovies, move |status| {
        let _ = tx.send(status);
    });
    api.cancel();

    assert!(rx.await.is_err());
}

#[tokio::test]
async fn concurrent_expired_requests_spend_the_refresh_token_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movies"))
        .and(header(headers::ACCESS_TOKEN, "a1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movies"))
        .and(header(headers::ACCESS_TOKEN, "a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("refresh_token=r1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "a2", "refresh_token": "r2"}))
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "refresh token already used"
        })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let api = live_api(&mock_server.uri(), keychain());
    let (a, b) = tokio::join!(api.fetch_movies(), api.fetch_movies());

    assert!(a.unwrap().is_empty());
    assert!(b.unwrap().is_empty());
}
