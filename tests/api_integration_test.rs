mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{Part, TestApp};
use serde_json::json;

const PDF: &[u8] = b"%PDF-1.4 test";

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].is_number());

    let (status, body) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    let (status, _) = app.get("/health/live").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_and_get_products() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app.get("/api/products/loans").await;
    assert_eq!(status, StatusCode::OK);
    let fields = body["data"]["feedback_fields"].as_array().unwrap();
    assert_eq!(fields[0]["name"], "Outcome");
    assert_eq!(fields[0]["type"], "select");
    assert_eq!(fields[2]["max_file_size"], "1KB");

    let (status, body) = app.get("/api/products/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Product 'unknown' not found");
}

#[tokio::test]
async fn test_update_product_fields() {
    let app = TestApp::new().await;

    let put = |uri: &str, body: serde_json::Value| {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let fields = json!([
        {"name": "Notes", "type": "textarea", "max_length": 200},
        {"name": "Interest", "type": "checkbox", "options": ["Loan", "Savings"], "is_required": true}
    ]);
    let (status, body) = app.send(put("/api/products/leads/fields", fields)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["feedback_fields"][1]["options"], json!(["Loan", "Savings"]));

    let (_, body) = app.get("/api/products/leads").await;
    assert_eq!(body["data"]["feedback_fields"].as_array().unwrap().len(), 2);

    let invalid = json!([{"name": "Interest", "type": "checkbox"}]);
    let (status, body) = app.send(put("/api/products/leads/fields", invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field 'Interest' needs at least one option");

    let (status, _) = app.send(put("/api/products/nope/fields", json!([]))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_fields_are_normalized() {
    let app = TestApp::new().await;

    let fields = json!([
        {"name": "  Notes ", "type": "text", "options": ["stray"], "min_value": 3},
        {"name": "Proof", "type": "file", "allowed_extensions": [".PDF", " png", ""]},
        {"name": "Plan", "type": "select", "options": [" Gold", "Gold", "Silver "]}
    ]);
    let request = Request::builder()
        .method("PUT")
        .uri("/api/products/leads/fields")
        .header("Content-Type", "application/json")
        .body(Body::from(fields.to_string()))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);

    let stored = &body["data"]["feedback_fields"];
    assert_eq!(stored[0]["name"], "Notes");
    assert!(stored[0].get("options").is_none());
    assert!(stored[0].get("min_value").is_none());
    assert_eq!(stored[1]["allowed_extensions"], json!(["pdf", "png"]));
    assert_eq!(stored[2]["options"], json!(["Gold", "Silver"]));
}

#[tokio::test]
async fn test_completed_call_missing_required_field() {
    let app = TestApp::new().await;

    let (status, body) = app
        .multipart(
            "POST",
            "/api/products/loans/calls",
            &[
                Part::Text("contact", "Ada Lovelace"),
                Part::Text("status", "completed"),
                Part::Text("feedback", r#"{"Rating": 4}"#),
                Part::File {
                    name: "Proof",
                    file_name: "proof.pdf",
                    bytes: PDF,
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Required field 'Outcome' is missing");

    let (_, body) = app.get("/api/products/loans/calls").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_call_stores_empty_feedback() {
    let app = TestApp::new().await;

    let (status, body) = app
        .multipart(
            "POST",
            "/api/products/loans/calls",
            &[
                Part::Text("contact", "Ada Lovelace"),
                Part::Text("status", "failed"),
                Part::Text("feedback", r#"{"Rating": 42, "Colour": "blue"}"#),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "failed");
    assert_eq!(body["data"]["feedback"], json!({}));
}

#[tokio::test]
async fn test_disallowed_extension_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .multipart(
            "POST",
            "/api/products/loans/calls",
            &[
                Part::Text("contact", "Ada Lovelace"),
                Part::Text("status", "completed"),
                Part::Text("feedback", r#"{"Outcome": "Sold"}"#),
                Part::File {
                    name: "Proof",
                    file_name: "setup.exe",
                    bytes: b"MZ",
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "File extension 'exe' not allowed for 'Proof'. Allowed: pdf"
    );
}

#[tokio::test]
async fn test_constraint_violations_are_all_reported() {
    let app = TestApp::new().await;

    let (status, body) = app
        .multipart(
            "POST",
            "/api/products/loans/calls",
            &[
                Part::Text("contact", "Ada Lovelace"),
                Part::Text("feedback", r#"{"Outcome": "Maybe", "Rating": "9"}"#),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Field 'Outcome' must be one of: Sold, Declined"));
    assert!(error.contains("Field 'Rating' must be at most 5"));
}

#[tokio::test]
async fn test_update_keeps_stored_file() {
    let app = TestApp::new().await;

    let (status, body) = app
        .multipart(
            "POST",
            "/api/products/loans/calls",
            &[
                Part::Text("contact", "Ada Lovelace"),
                Part::Text("status", "completed"),
                Part::Text("feedback", r#"{"Outcome": "Sold", "Rating": "5"}"#),
                Part::File {
                    name: "Proof",
                    file_name: "proof.pdf",
                    bytes: PDF,
                },
            ],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let call = &body["data"];
    let call_id = call["id"].as_str().unwrap().to_string();
    assert_eq!(call["feedback"]["Rating"], 5);
    assert_eq!(call["feedback"]["Proof"]["file_name"], "proof.pdf");
    let file_url = call["feedback"]["Proof"]["file_url"].as_str().unwrap().to_string();
    assert!(file_url.starts_with(&format!("/uploads/calls/{}/proof/", call_id)));

    let (status, bytes) = app.get_bytes(&file_url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, PDF);

    let (status, body) = app
        .multipart(
            "PATCH",
            &format!("/api/calls/{}", call_id),
            &[
                Part::Text("status", "completed"),
                Part::Text("feedback", r#"{"Outcome": "Declined"}"#),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let feedback = &body["data"]["feedback"];
    assert_eq!(feedback["Outcome"], "Declined");
    assert!(feedback.get("Rating").is_none());
    assert_eq!(feedback["Proof"]["file_url"], file_url.as_str());
    assert_eq!(body["data"]["contact"], "Ada Lovelace");

    let (_, body) = app.get(&format!("/api/calls/{}", call_id)).await;
    assert_eq!(body["data"]["feedback"]["Outcome"], "Declined");
}

#[tokio::test]
async fn test_switching_to_busy_clears_feedback() {
    let app = TestApp::new().await;

    let (_, body) = app
        .multipart(
            "POST",
            "/api/products/leads/calls",
            &[
                Part::Text("contact", "Grace Hopper"),
                Part::Text("feedback", r#"{"Notes": "Call back tomorrow"}"#),
            ],
        )
        .await;
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["feedback"]["Notes"], "Call back tomorrow");
    let call_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .multipart(
            "PATCH",
            &format!("/api/calls/{}", call_id),
            &[Part::Text("status", "busy")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["feedback"], json!({}));
}

#[tokio::test]
async fn test_bad_requests() {
    let app = TestApp::new().await;

    let (status, body) = app
        .multipart(
            "POST",
            "/api/products/leads/calls",
            &[Part::Text("status", "completed")],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "contact is required");

    let (status, body) = app
        .multipart(
            "POST",
            "/api/products/leads/calls",
            &[
                Part::Text("contact", "Grace Hopper"),
                Part::Text("status", "voicemail"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid call status 'voicemail'");

    let (status, _) = app
        .multipart(
            "POST",
            "/api/products/unknown/calls",
            &[Part::Text("contact", "Grace Hopper")],
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .get("/api/calls/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_calls_are_listed_newest_first() {
    let app = TestApp::new().await;

    for contact in ["First", "Second"] {
        let (status, _) = app
            .multipart(
                "POST",
                "/api/products/leads/calls",
                &[Part::Text("contact", contact), Part::Text("status", "busy")],
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (status, body) = app.get("/api/products/leads/calls").await;
    assert_eq!(status, StatusCode::OK);
    let calls = body["data"].as_array().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0]["contact"], "Second");
}

#[tokio::test]
async fn test_replaced_and_dropped_uploads_are_removed() {
    let app = TestApp::new().await;

    let proof = |file_name: &'static str| Part::File {
        name: "Proof",
        file_name,
        bytes: PDF,
    };

    let (_, body) = app
        .multipart(
            "POST",
            "/api/products/loans/calls",
            &[
                Part::Text("contact", "Ada Lovelace"),
                Part::Text("feedback", r#"{"Outcome": "Sold"}"#),
                proof("first.pdf"),
            ],
        )
        .await;
    let call_id = body["data"]["id"].as_str().unwrap().to_string();
    let first_url = body["data"]["feedback"]["Proof"]["file_url"].as_str().unwrap().to_string();

    let (status, body) = app
        .multipart(
            "PATCH",
            &format!("/api/calls/{}", call_id),
            &[Part::Text("feedback", r#"{"Outcome": "Sold"}"#), proof("second.pdf")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let second_url = body["data"]["feedback"]["Proof"]["file_url"].as_str().unwrap().to_string();
    assert_ne!(first_url, second_url);

    let (status, _) = app.get_bytes(&first_url).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get_bytes(&second_url).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .multipart(
            "PATCH",
            &format!("/api/calls/{}", call_id),
            &[Part::Text("status", "failed")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get_bytes(&second_url).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
