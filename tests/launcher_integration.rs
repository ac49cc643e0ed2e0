//! Launch controller against a mocked `/start` endpoint.

use coach_launcher::session::{LaunchPhase, LaunchView, SessionLauncher, SessionResponse};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_start(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(template)
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn launch_shows_conversation() {
    let server = mock_start(ResponseTemplate::new(200).set_body_json(json!({
        "conversation_id": "c1",
        "conversation_url": "https://x/y",
        "status": "active",
    })))
    .await;

    let launcher = SessionLauncher::new(&server.uri()).unwrap();
    let mut view = LaunchView::default();
    launcher.launch(&mut view).await;

    assert_eq!(view.status(), "Session ready.");
    assert_eq!(view.frame_src(), "https://x/y");
    assert_eq!(view.link_href(), "https://x/y");
    assert!(view.is_link_visible());
    assert_eq!(view.phase(), LaunchPhase::Ready);
}

#[tokio::test]
async fn launch_shows_server_error_despite_status_code() {
    let server =
        mock_start(ResponseTemplate::new(500).set_body_json(json!({ "error": "bad" }))).await;

    let launcher = SessionLauncher::new(&server.uri()).unwrap();
    let mut view = LaunchView::default();
    launcher.launch(&mut view).await;

    assert_eq!(view.status(), "Error: bad");
    assert!(view.frame_src().is_empty());
    assert!(!view.is_link_visible());
}

#[tokio::test]
async fn launch_treats_non_json_as_unexpected() {
    let server = mock_start(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .await;

    let launcher = SessionLauncher::new(&server.uri()).unwrap();
    let mut view = LaunchView::default();
    launcher.launch(&mut view).await;

    assert_eq!(view.status(), "Unexpected error.");
    assert!(!view.is_link_visible());
    assert_eq!(view.phase(), LaunchPhase::Failed);
}

#[tokio::test]
async fn launch_treats_network_failure_as_unexpected() {
    // Grab a free port, then close it so the connection is refused.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let launcher = SessionLauncher::new(&uri).unwrap();
    let mut view = LaunchView::default();
    launcher.launch(&mut view).await;

    assert_eq!(view.status(), "Unexpected error.");
    assert!(!view.is_link_visible());
}

#[tokio::test]
async fn failed_relaunch_keeps_frame_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_url": "https://x/first",
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "quota" })))
        .mount(&server)
        .await;

    let launcher = SessionLauncher::new(&server.uri()).unwrap();
    let mut view = LaunchView::default();

    launcher.launch(&mut view).await;
    assert_eq!(view.frame_src(), "https://x/first");

    launcher.launch(&mut view).await;
    assert_eq!(view.status(), "Error: quota");
    assert!(view.frame_src().is_empty());
    assert!(!view.is_link_visible());
}

#[tokio::test]
async fn request_decodes_body() {
    let server = mock_start(ResponseTemplate::new(200).set_body_json(json!({
        "conversation_id": "c1",
        "conversation_url": "https://x/y",
        "status": "active",
    })))
    .await;

    let launcher = SessionLauncher::new(&server.uri()).unwrap();
    let response = launcher.request().await.unwrap();
    assert_eq!(response, SessionResponse::ready("c1", "https://x/y", "active"));
}

#[tokio::test]
async fn launch_classifies_bodies_by_error_truthiness() {
    let cases = [
        (json!({}), "Session ready.", ""),
        (json!({ "status": "active" }), "Session ready.", ""),
        (json!({ "error": "" }), "Session ready.", ""),
        (
            json!({ "conversation_url": "https://x/y", "error": "" }),
            "Session ready.",
            "https://x/y",
        ),
        (
            json!({ "conversation_url": "https://x/y", "error": null }),
            "Session ready.",
            "https://x/y",
        ),
        (json!({ "error": 42 }), "Error: 42", ""),
        (json!({ "error": false, "conversation_url": "u" }), "Session ready.", "u"),
    ];

    for (body, status, frame) in cases {
        let server = mock_start(ResponseTemplate::new(200).set_body_json(body.clone())).await;

        let launcher = SessionLauncher::new(&server.uri()).unwrap();
        let mut view = LaunchView::default();
        launcher.launch(&mut view).await;

        assert_eq!(view.status(), status, "body = {body}");
        assert_eq!(view.frame_src(), frame, "body = {body}");
    }
}
