mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use civic_client::{ClientError, TrackOutcome};
use civic_core::complaint::{
    Assignment, Category, ComplaintStatus, FeedQuery, FeedSort, ImageAttachment, NewComplaint,
};
use civic_core::tokens::TokenPair;
use civic_core::user::{Credentials, Registration};
use civic_testkit::Method;
use serde_json::json;

use common::{alice, complaint, setup};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_posts_credentials() {
    let (backend, client, _store) = setup(None).await;
    backend.on(
        Method::POST,
        "/auth/login/",
        200,
        json!({"user": alice(), "tokens": {"access": "A1", "refresh": "R1"}}),
    );

    let response = client
        .auth()
        .login(&Credentials::new("alice", "pw"))
        .await
        .unwrap();

    assert_eq!(response.user.username, "alice");
    assert_eq!(response.tokens, TokenPair::new("A1", "R1"));
    let sent = &backend.requests_to(Method::POST, "/auth/login/")[0];
    assert_eq!(sent.json(), Some(json!({"username": "alice", "password": "pw"})));
}

#[tokio::test]
async fn login_error_body_is_kept_verbatim() {
    let (backend, client, _store) = setup(None).await;
    backend.on(
        Method::POST,
        "/auth/login/",
        400,
        json!({"non_field_errors": ["Invalid username or password."]}),
    );

    let err = client
        .auth()
        .login(&Credentials::new("alice", "wrong"))
        .await
        .unwrap_err();

    assert_matches!(err, ClientError::Api { status: 400, .. });
    assert_eq!(err.message(), "Invalid username or password.");
}

#[tokio::test]
async fn login_with_blank_password_reaches_backend() {
    let (backend, client, _store) = setup(None).await;
    backend.on(
        Method::POST,
        "/auth/login/",
        400,
        json!({"password": ["This field may not be blank."]}),
    );

    let err = client
        .auth()
        .login(&Credentials::new("alice", ""))
        .await
        .unwrap_err();

    assert_matches!(err, ClientError::Api { status: 400, .. });
    assert_eq!(backend.count(Method::POST, "/auth/login/"), 1);
}

#[tokio::test]
async fn register_without_email_is_sent() {
    let (backend, client, _store) = setup(None).await;
    backend.on(
        Method::POST,
        "/auth/register/",
        201,
        json!({
            "user": {"id": 2, "username": "bob", "is_staff": false},
            "tokens": {"access": "A1", "refresh": "R1"}
        }),
    );
    let input = Registration {
        username: "bob".into(),
        email: String::new(),
        password: "secret1".into(),
        first_name: String::new(),
        last_name: String::new(),
    };

    let response = client.auth().register(&input).await.unwrap();

    assert_eq!(response.user.username, "bob");
    let sent = &backend.requests_to(Method::POST, "/auth/register/")[0];
    assert_eq!(sent.json().unwrap()["email"], json!(""));
}

#[tokio::test]
async fn register_is_validated_before_sending() {
    let (backend, client, _store) = setup(None).await;
    let input = Registration {
        username: "bob".into(),
        email: "bob@example.com".into(),
        password: "123".into(),
        first_name: "Bob".into(),
        last_name: "Stone".into(),
    };

    let err = client.auth().register(&input).await.unwrap_err();

    assert_matches!(err, ClientError::Validation(_));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn logout_posts_stored_refresh_token() {
    let (backend, client, _store) = setup(Some(TokenPair::new("A1", "R1"))).await;
    backend.on(Method::POST, "/auth/logout/", 200, json!({"message": "Logged out"}));

    client.auth().logout().await.unwrap();

    let sent = &backend.requests_to(Method::POST, "/auth/logout/")[0];
    assert_eq!(sent.json(), Some(json!({"refresh": "R1"})));
    assert_eq!(sent.authorization(), Some("Bearer A1"));
}

#[tokio::test]
async fn google_login_url_is_under_base() {
    let (backend, client, _store) = setup(None).await;
    assert_eq!(
        client.auth().google_login_url(),
        format!("{}/auth/google/", backend.base_url())
    );
}

// ---------------------------------------------------------------------------
// Complaints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn track_found() {
    let (backend, client, _store) = setup(None).await;
    backend.on(
        Method::GET,
        "/complaints/track/HA-2025-001/",
        200,
        complaint(12, "HA-2025-001"),
    );

    let outcome = client.complaints().track(" ha-2025-001 ").await.unwrap();

    let found = outcome.found().unwrap();
    assert_eq!(found.id, 12);
    assert_eq!(found.status, ComplaintStatus::Submitted);
}

#[tokio::test]
async fn track_missing_is_not_found_value() {
    let (backend, client, _store) = setup(None).await;
    backend.on(
        Method::GET,
        "/complaints/track/HA-2025-001/",
        404,
        json!({"error": "Complaint not found"}),
    );

    let outcome = client.complaints().track("HA-2025-001").await.unwrap();

    assert_eq!(outcome, TrackOutcome::NotFound);
}

#[tokio::test]
async fn track_rejects_unsafe_identifier_locally() {
    let (backend, client, _store) = setup(None).await;

    let err = client.complaints().track("../admin").await.unwrap_err();

    assert_matches!(err, ClientError::Validation(_));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn track_unusual_identifier_asks_backend() {
    let (backend, client, _store) = setup(None).await;

    let outcome = client.complaints().track("xyz_999").await.unwrap();

    assert_eq!(outcome, TrackOutcome::NotFound);
    assert_eq!(backend.count(Method::GET, "/complaints/track/XYZ_999/"), 1);
}

#[tokio::test]
async fn submit_sends_multipart_with_images() {
    let (backend, client, _store) = setup(Some(TokenPair::new("A1", "R1"))).await;
    let mut created = complaint(5, "HA-2025-005");
    created["message"] = json!("Complaint submitted successfully");
    backend.on(Method::POST, "/complaints/", 201, created);

    let input = NewComplaint::new(Category::Road, "Pothole", "Deep hole", "Main St")
        .with_coordinates(27.7, 85.3)
        .with_image(ImageAttachment::new("a.jpg", b"first".to_vec()))
        .with_image(ImageAttachment::new("b.png", b"second".to_vec()));

    let submitted = client.complaints().submit(&input).await.unwrap();
    assert_eq!(submitted.complaint.complaint_id, "HA-2025-005");
    assert_eq!(
        submitted.message.as_deref(),
        Some("Complaint submitted successfully")
    );

    let sent = &backend.requests_to(Method::POST, "/complaints/")[0];
    let content_type = sent.header("content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");

    let body = sent.body_text();
    assert!(body.contains("name=\"category\""));
    assert!(body.contains("road"));
    assert!(body.contains("name=\"latitude\""));
    assert!(body.contains("27.700000"));
    assert!(body.contains("name=\"image\"; filename=\"a.jpg\""));
    assert!(body.contains("name=\"images\"; filename=\"b.png\""));
    assert!(body.contains("first"));
    assert!(body.contains("second"));
}

#[tokio::test]
async fn submit_invalid_complaint_sends_nothing() {
    let (backend, client, _store) = setup(None).await;
    let input = NewComplaint::new(Category::Water, "Leak", "   ", "Ward 3");

    let err = client.complaints().submit(&input).await.unwrap_err();

    assert_matches!(err, ClientError::Validation(_));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn multipart_submission_is_rebuilt_on_replay() {
    let (backend, client, _store) = setup(Some(TokenPair::new("A1", "R1"))).await;
    backend
        .on(Method::POST, "/complaints/", 401, common::expired())
        .on(Method::POST, "/complaints/", 201, complaint(6, "HA-2025-006"));
    backend.on(Method::POST, "/auth/token/refresh/", 200, json!({"access": "A2"}));

    let input = NewComplaint::new(Category::Waste, "Bin", "Overflowing", "Park")
        .with_image(ImageAttachment::new("bin.jpg", b"jpegdata".to_vec()));
    client.complaints().submit(&input).await.unwrap();

    let attempts = backend.requests_to(Method::POST, "/complaints/");
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[1].authorization(), Some("Bearer A2"));
    assert!(attempts[1].body_text().contains("jpegdata"));
}

#[tokio::test]
async fn public_feed_sends_only_set_filters() {
    let (backend, client, _store) = setup(None).await;
    backend.on(
        Method::GET,
        "/complaints/public/",
        200,
        json!([complaint(1, "HA-2025-001"), complaint(2, "HA-2025-002")]),
    );

    let query = FeedQuery {
        category: Some(Category::Road),
        date_from: NaiveDate::from_ymd_opt(2025, 1, 1),
        status: Some(ComplaintStatus::InProgress),
        sort: Some(FeedSort::MostUpvoted),
        ..Default::default()
    };
    let feed = client.complaints().public_feed(&query).await.unwrap();
    assert_eq!(feed.len(), 2);

    let sent = &backend.requests_to(Method::GET, "/complaints/public/")[0];
    assert_eq!(sent.query_value("category"), Some("road"));
    assert_eq!(sent.query_value("date_from"), Some("2025-01-01"));
    assert_eq!(sent.query_value("status"), Some("In Progress"));
    assert_eq!(sent.query_value("sort"), Some("most_upvoted"));
    assert_eq!(sent.query_value("date_to"), None);
}

#[tokio::test]
async fn update_status_patches_detail() {
    let (backend, client, _store) = setup(Some(TokenPair::new("A1", "R1"))).await;
    let mut updated = complaint(3, "HA-2025-003");
    updated["status"] = json!("Resolved");
    backend.on(Method::PATCH, "/complaints/3/", 200, updated);

    let result = client
        .complaints()
        .update_status(3, ComplaintStatus::Resolved)
        .await
        .unwrap();

    assert_eq!(result.status, ComplaintStatus::Resolved);
    let sent = &backend.requests_to(Method::PATCH, "/complaints/3/")[0];
    assert_eq!(sent.json(), Some(json!({"status": "Resolved"})));
}

#[tokio::test]
async fn assign_sends_only_touched_fields() {
    let (backend, client, _store) = setup(Some(TokenPair::new("A1", "R1"))).await;
    backend.on(Method::POST, "/complaints/3/assign/", 200, complaint(3, "HA-2025-003"));

    let assignment = Assignment::default().department(Some(2)).officer(None);
    client.complaints().assign(3, &assignment).await.unwrap();

    let sent = &backend.requests_to(Method::POST, "/complaints/3/assign/")[0];
    assert_eq!(
        sent.json(),
        Some(json!({"assigned_department": 2, "assigned_to": null}))
    );
}

#[tokio::test]
async fn toggle_upvote_returns_new_count() {
    let (backend, client, _store) = setup(Some(TokenPair::new("A1", "R1"))).await;
    backend.on(
        Method::POST,
        "/complaints/9/upvote/",
        200,
        json!({"upvoted": true, "upvote_count": 5}),
    );

    let result = client.complaints().toggle_upvote(9).await.unwrap();

    assert!(result.upvoted);
    assert_eq!(result.upvote_count, 5);
}

// ---------------------------------------------------------------------------
// Departments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn department_officers() {
    let (backend, client, _store) = setup(Some(TokenPair::new("A1", "R1"))).await;
    backend.on(
        Method::GET,
        "/departments/2/admins/",
        200,
        json!([{"id": 9, "username": "ward5", "role": "ward_officer"}]),
    );

    let officers = client.departments().admins(2).await.unwrap();

    assert_eq!(officers.len(), 1);
    assert_eq!(officers[0].username, "ward5");
}
