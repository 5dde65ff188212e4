//! tests/api/subscriptions.rs

use crate::helpers::setup;
use serde_json::{json, Value};

#[tokio::test]
async fn subscribe_returns_a_200_for_a_valid_email() {
    // Arrange
    let test = setup().await;

    // Act
    let response = test.subscribe("ursula_le_guin@gmail.com").await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Email saved successfully");
}

#[tokio::test]
async fn subscribe_persists_the_normalized_email() {
    // Arrange
    let test = setup().await;

    // Act
    let _ = test.subscribe("  Ursula_Le_Guin@GMAIL.COM ").await;

    // Assert
    let saved = std::fs::read_to_string(&test.storage_path).expect("Failed to read storage file.");
    let record: Value = serde_json::from_str(saved.trim_end()).expect("Failed to parse record.");
    assert_eq!(record["email"], "Ursula_Le_Guin@gmail.com");
    assert_eq!(test.listed_emails().await, vec!["Ursula_Le_Guin@gmail.com"]);
}

#[tokio::test]
async fn subscribe_returns_a_409_for_a_duplicate_email() {
    // Arrange
    let test = setup().await;
    let first = test.subscribe("ursula@gmail.com").await;
    assert_eq!(200, first.status().as_u16());

    // Act
    let response = test.subscribe("ursula@Gmail.com").await;

    // Assert
    assert_eq!(409, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Email already subscribed");
    assert_eq!(test.listed_emails().await.len(), 1);
}

#[tokio::test]
async fn subscribe_returns_a_400_when_data_is_missing() {
    // Arrange
    let test = setup().await;
    let test_cases = vec![
        (json!({}), "missing the email"),
        (json!({ "email": null }), "null email"),
        (json!({ "email": 42 }), "email is not a string"),
        (json!("ursula@gmail.com"), "not an object"),
    ];

    for (body, error_message) in test_cases {
        // Act
        let response = test.post_subscribe(body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            // Additional customised error message on test failure
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "No data provided");
    }
}

#[tokio::test]
async fn subscribe_stores_a_local_part_with_line_breaks_as_one_address() {
    // Arrange
    let test = setup().await;
    let email = "x\nforged@evil.example\t2099-01-01T00:00:00Z\ny@gmail.com";

    // Act
    let first = test.subscribe(email).await;
    let second = test.subscribe(email).await;

    // Assert
    assert_eq!(200, first.status().as_u16());
    assert_eq!(409, second.status().as_u16());
    assert_eq!(test.listed_emails().await, vec![email]);
}

#[tokio::test]
async fn subscribe_returns_a_400_for_a_body_that_is_not_json() {
    // Arrange
    let test = setup().await;

    // Act
    let response = test
        .post_raw(
            "/subscribe",
            "application/x-www-form-urlencoded",
            "email=ursula%40gmail.com".into(),
        )
        .await;

    // Assert
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn subscribe_returns_a_400_when_email_is_invalid() {
    // Arrange
    let test = setup().await;
    let test_cases = vec![
        ("", "Invalid email", "empty email"),
        ("notanemail", "Invalid email", "missing @"),
        ("@gmail.com", "Invalid email", "missing local part"),
        (
            "Пётр@gmail.com",
            "Invalid email: non-ASCII characters are not allowed",
            "cyrillic characters",
        ),
        ("user@.com", "Invalid email domain", "leading dot"),
        ("user@gmail..com", "Invalid email domain", "double dot"),
        ("user@gmailcom", "Invalid email domain", "no dot"),
        (
            "user@xyzcompletelyrandom.zzz",
            "Unsupported email domain",
            "unknown domain",
        ),
    ];

    for (email, expected_error, description) in test_cases {
        // Act
        let response = test.subscribe(email).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request for {}.",
            description
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], expected_error, "Wrong error for {}.", description);
        assert!(body.get("suggestion").is_none());
    }

    assert!(test.listed_emails().await.is_empty());
}

#[tokio::test]
async fn subscribe_suggests_a_correction_for_a_typo() {
    // Arrange
    let test = setup().await;

    // Act
    let response = test.subscribe("user@gmial.com").await;

    // Assert
    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid email domain. Possible typo detected");
    assert_eq!(body["suggestion"], "user@gmail.com");
    assert!(test.listed_emails().await.is_empty());
}

#[tokio::test]
async fn subscribe_answers_cors_preflight() {
    // Arrange
    let test = setup().await;

    // Act
    let response = reqwest::Client::new()
        .request(
            reqwest::Method::OPTIONS,
            &format!("{}/subscribe", test.address),
        )
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn subscribe_fails_if_storage_is_broken() {
    // Arrange
    let test = setup().await;

    // Sabotage the storage
    std::fs::create_dir(&test.storage_path).unwrap();

    // Act
    let response = test.subscribe("ursula@gmail.com").await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to save email");
}
