use super::*;
use crate::state::session::Session;
use crate::test_support::{Harness, bytes_response, json_response};

fn signed_in() -> Harness {
    Harness::with_session(&Session { user: None, access_token: Some("abc".to_owned()), refresh_token: None })
}

fn png() -> crate::net::transport::HttpResponse {
    bytes_response(200, "image/png", b"\x89PNG")
}

// =============================================================
// Contract
// =============================================================

#[tokio::test]
async fn valid_path_and_token_yield_object_url() {
    let h = signed_in();
    h.transport.push(png());
    let resource = h.context.avatar_resource();

    let url = resource.load(Some("me.png")).await;

    assert_eq!(url.as_deref(), Some("blob:test/1"));
    assert_eq!(resource.current_url(), url);
    assert_eq!(h.urls.live(), 1);
    let sent = h.transport.last_request().unwrap();
    assert_eq!(sent.url, "http://api.test/api/file/me.png");
    assert_eq!(sent.header("Authorization"), Some("Bearer abc"));
}

#[tokio::test]
async fn missing_path_resolves_none_without_request() {
    let h = signed_in();
    let resource = h.context.avatar_resource();

    assert_eq!(resource.load(None).await, None);
    assert_eq!(resource.load(Some("  ")).await, None);
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn missing_token_resolves_none_without_request() {
    let h = Harness::new();
    let resource = h.context.avatar_resource();

    assert_eq!(resource.load(Some("me.png")).await, None);
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn fetch_failure_resolves_none_without_handle() {
    let h = signed_in();
    h.transport.push(json_response(404, serde_json::json!({"message": "missing"})));
    let resource = h.context.avatar_resource();

    assert_eq!(resource.load(Some("gone.png")).await, None);
    assert_eq!(h.urls.created(), 0);
    assert_eq!(h.urls.live(), 0);
    assert_eq!(resource.current_url(), None);
}

#[tokio::test]
async fn network_failure_resolves_none() {
    let h = signed_in();
    h.transport.push_network_error("offline");
    let resource = h.context.avatar_resource();

    assert_eq!(resource.load(Some("me.png")).await, None);
    assert_eq!(h.urls.live(), 0);
}

#[tokio::test]
async fn object_url_failure_resolves_none() {
    let h = signed_in();
    h.transport.push(png());
    h.urls.fail_next();
    let resource = h.context.avatar_resource();

    assert_eq!(resource.load(Some("me.png")).await, None);
    assert_eq!(h.urls.live(), 0);
}

#[tokio::test]
async fn unauthorized_fetch_expires_session() {
    let h = signed_in();
    h.transport.push(json_response(401, serde_json::json!({})));
    let resource = h.context.avatar_resource();

    assert_eq!(resource.load(Some("me.png")).await, None);
    assert!(!h.context.vault.is_authenticated());
    assert_eq!(h.navigator.redirects(), vec!["/login".to_owned()]);
}

// =============================================================
// Release
// =============================================================

#[tokio::test]
async fn new_load_releases_previous_handle_first() {
    let h = signed_in();
    h.transport.push(png());
    h.transport.push(json_response(500, serde_json::json!({})));
    let resource = h.context.avatar_resource();

    assert!(resource.load(Some("a.png")).await.is_some());
    assert_eq!(resource.load(Some("b.png")).await, None);

    assert_eq!(h.urls.revoked(), vec!["blob:test/1".to_owned()]);
    assert_eq!(h.urls.live(), 0);
}

#[tokio::test]
async fn repeated_loads_keep_one_live_handle() {
    let h = signed_in();
    for _ in 0..3 {
        h.transport.push(png());
    }
    let resource = h.context.avatar_resource();

    for name in ["a.png", "b.png", "c.png"] {
        assert!(resource.load(Some(name)).await.is_some());
    }

    assert_eq!(h.urls.created(), 3);
    assert_eq!(h.urls.live(), 1);
    assert_eq!(resource.current_url().as_deref(), Some("blob:test/3"));
}

#[tokio::test]
async fn release_and_drop_revoke_current_handle() {
    let h = signed_in();
    h.transport.push(png());
    h.transport.push(png());

    let resource = h.context.avatar_resource();
    assert!(resource.load(Some("a.png")).await.is_some());
    resource.release();
    assert_eq!(h.urls.live(), 0);
    assert_eq!(resource.current_url(), None);

    assert!(resource.load(Some("b.png")).await.is_some());
    drop(resource);
    assert_eq!(h.urls.live(), 0);
}

#[tokio::test]
async fn superseded_load_never_creates_handle() {
    let h = signed_in();
    h.transport.push(png());
    h.transport.push(png());
    let _gate = h.transport.hold_next();
    let resource = h.context.avatar_resource();

    let first = resource.load(Some("slow.png"));
    let second = async {
        tokio::task::yield_now().await;
        resource.load(Some("fast.png")).await
    };
    let (first, second) = futures::join!(first, second);

    assert_eq!(first, None);
    assert!(second.is_some());
    assert_eq!(h.urls.created(), 1);
    assert_eq!(h.urls.live(), 1);
    assert_eq!(h.transport.request_count(), 2);
}
