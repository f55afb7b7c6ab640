use pretty_assertions::assert_eq;
use serde_json::json;
use stashfill_engine::{Catalog, CatalogSettings, GraphqlCatalog, LookupError};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog_for(server: &MockServer, api_key: Option<&str>) -> GraphqlCatalog {
    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    let mut settings = CatalogSettings::new(base);
    settings.api_key = api_key.map(str::to_string);
    GraphqlCatalog::new(settings).unwrap()
}

#[tokio::test]
async fn find_scene_sends_api_key_and_returns_files() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("ApiKey", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "findScene": {
                    "id": "42",
                    "title": null,
                    "files": [{
                        "id": "9",
                        "basename": "scene.mp4",
                        "path": "/media/scene.mp4",
                        "format": "mp4",
                        "width": 1920,
                        "height": 1080,
                        "video_codec": "h264",
                        "audio_codec": "aac",
                        "duration": 3725.0,
                        "bit_rate": 8000000,
                        "frame_rate": 29.97
                    }]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let scene = catalog_for(&server, Some("secret"))
        .find_scene("42")
        .await
        .expect("scene found");
    assert_eq!(scene.id, "42");
    assert_eq!(scene.title, None);
    assert_eq!(scene.files.len(), 1);
    let file = &scene.files[0];
    assert_eq!(file.basename, "scene.mp4");
    assert_eq!((file.width, file.height), (1920, 1080));
    assert_eq!(file.video_codec.as_deref(), Some("h264"));
}

#[tokio::test]
async fn missing_scene_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"findScene": null}})),
        )
        .mount(&server)
        .await;

    let err = catalog_for(&server, None).find_scene("7").await.unwrap_err();
    assert_eq!(err, LookupError::NotFound("7".into()));
}

#[tokio::test]
async fn scene_without_files_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"findScene": {"id": "7", "title": "Empty", "files": []}}
        })))
        .mount(&server)
        .await;

    let err = catalog_for(&server, None).find_scene("7").await.unwrap_err();
    assert_eq!(err, LookupError::NoFiles("7".into()));
}

#[tokio::test]
async fn graphql_errors_are_invalid_responses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "not authorized"}]
        })))
        .mount(&server)
        .await;

    let err = catalog_for(&server, None).find_scene("7").await.unwrap_err();
    assert_eq!(err, LookupError::InvalidResponse("not authorized".into()));
}

#[tokio::test]
async fn http_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = catalog_for(&server, None).find_scene("7").await.unwrap_err();
    assert_eq!(err, LookupError::HttpStatus(401));
}
