#![allow(clippy::unwrap_used)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use std::{fs, sync::Arc};
use tempfile::TempDir;
use tower::ServiceExt;
use userbook::{
    api::{self, handlers::health::Health},
    service::AccountService,
    store::FileAccountStore,
};

const FORM: &str = "application/x-www-form-urlencoded";

struct TestApp {
    dir: TempDir,
    _www: Option<TempDir>,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        Self::build(None)
    }

    fn with_static(pages: &[(&str, &str)]) -> Self {
        let www = tempfile::tempdir().unwrap();
        for (name, body) in pages {
            fs::write(www.path().join(name), body).unwrap();
        }
        Self::build(Some(www))
    }

    fn build(www: Option<TempDir>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAccountStore::new(dir.path().join("users")).unwrap();
        let router = api::router(
            AccountService::new(Arc::new(store)),
            www.as_ref().map(TempDir::path),
        );
        Self {
            dir,
            _www: www,
            router,
        }
    }

    fn data_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("users")
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post(&self, uri: &str, body: &str) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, FORM)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

fn assert_redirect(response: &Response, page: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), Some(page));
}

#[tokio::test]
async fn register_and_login_flow() {
    let app = TestApp::new();

    let response = app
        .post("/regUser", "username=alice&password=p1&nickname=A&age=30")
        .await;
    assert_redirect(&response, "/reg_success.html");

    let response = app
        .post("/regUser", "username=alice&password=p2&nickname=B&age=31")
        .await;
    assert_redirect(&response, "/have_user.html");

    let response = app.post("/loginUser", "username=alice&password=p1").await;
    assert_redirect(&response, "/login_success.html");

    let response = app.post("/loginUser", "username=alice&password=wrong").await;
    assert_redirect(&response, "/login_fail.html");

    let response = app.post("/loginUser", "username=nobody&password=p1").await;
    assert_redirect(&response, "/login_fail.html");

    assert!(app.data_dir().join("alice.json").is_file());
}

#[tokio::test]
async fn query_string_forms() {
    let app = TestApp::new();

    let response = app
        .get("/regUser?username=bob&password=pw&nickname=Bobby&age=7")
        .await;
    assert_redirect(&response, "/reg_success.html");

    let response = app.get("/loginUser?username=bob&password=pw").await;
    assert_redirect(&response, "/login_success.html");
}

#[tokio::test]
async fn invalid_registration_fields() {
    let app = TestApp::new();

    for body in [
        "username=carol&password=p&nickname=C&age=12a",
        "username=carol&password=p&nickname=C&age=",
        "username=carol&password=p&nickname=C&age=-5",
        "username=carol&nickname=C&age=20",
        "username=+&password=p&nickname=C&age=20",
        "",
    ] {
        let response = app.post("/regUser", body).await;
        assert_redirect(&response, "/reg_info_error.html");
    }

    // nothing reached the disk
    assert_eq!(fs::read_dir(app.data_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn invalid_login_fields() {
    let app = TestApp::new();

    for body in ["username=carol", "password=p", "username=&password=p", ""] {
        let response = app.post("/loginUser", body).await;
        assert_redirect(&response, "/login_info_error.html");
    }
}

#[tokio::test]
async fn non_form_body_is_missing_fields() {
    let app = TestApp::new();

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/regUser")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"dan"}"#))
                .unwrap(),
        )
        .await;
    assert_redirect(&response, "/reg_info_error.html");
}

#[tokio::test]
async fn storage_failure_is_internal_error() {
    let app = TestApp::new();
    fs::remove_dir_all(app.data_dir()).unwrap();

    let response = app
        .post("/regUser", "username=erin&password=p&nickname=E&age=5")
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(location(&response), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_over_http() {
    const CALLERS: usize = 10;

    let app = Arc::new(TestApp::new());
    let mut tasks = Vec::with_capacity(CALLERS);
    for i in 0..CALLERS {
        let app = Arc::clone(&app);
        tasks.push(tokio::spawn(async move {
            let body = format!("username=frank&password=p{i}&nickname=F&age=40");
            let response = app.post("/regUser", &body).await;
            location(&response).map(ToString::to_string)
        }));
    }

    let mut created = 0;
    let mut duplicates = 0;
    for task in tasks {
        match task.await.unwrap().as_deref() {
            Some("/reg_success.html") => created += 1,
            Some("/have_user.html") => duplicates += 1,
            other => panic!("unexpected redirect: {other:?}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, CALLERS - 1);
}

#[tokio::test]
async fn health_reports_storage() {
    let app = TestApp::new();

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-app"));
    assert!(response.headers().contains_key("x-request-id"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: Health = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.name, env!("CARGO_PKG_NAME"));
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.build, userbook::GIT_COMMIT_HASH);
    assert_eq!(health.storage, "ok");

    fs::remove_dir_all(app.data_dir()).unwrap();
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: Health = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.storage, "error");
}

#[tokio::test]
async fn long_usernames_register_and_login() {
    let app = TestApp::new();
    let username = "%E7%94%A8".repeat(30);

    let response = app
        .post(
            "/regUser",
            &format!("username={username}&password=p1&nickname=L&age=3"),
        )
        .await;
    assert_redirect(&response, "/reg_success.html");

    let response = app
        .post(
            "/regUser",
            &format!("username={username}&password=p2&nickname=L&age=3"),
        )
        .await;
    assert_redirect(&response, "/have_user.html");

    let response = app
        .post("/loginUser", &format!("username={username}&password=p1"))
        .await;
    assert_redirect(&response, "/login_success.html");
}

#[tokio::test]
async fn unknown_path_without_static_dir() {
    let app = TestApp::new();
    let response = app.get("/reg_success.html").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_pages_are_served() {
    let app = TestApp::with_static(&[
        ("reg.html", "<form action=\"/regUser\"></form>"),
        ("reg_success.html", "registered"),
    ]);

    let response = app
        .post("/regUser", "username=gina&password=p&nickname=G&age=22")
        .await;
    assert_redirect(&response, "/reg_success.html");

    let response = app.get("/reg_success.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"registered");

    let response = app.get("/missing.html").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
