use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use restaurant_grade::prediction::{prediction_router, GradePredictor, ModelBundle};
use restaurant_grade::report::read_csv_fields;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const MODEL: &str = include_str!("../../../models/restaurant_grade_model.json");

fn router() -> Router {
    let bundle = ModelBundle::from_json(MODEL).expect("sample artifact parses");
    let predictor = GradePredictor::from_bundle(bundle).expect("sample artifact loads");
    prediction_router(Arc::new(predictor))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads")
        .to_vec()
}

fn owner_request(score: i32) -> Value {
    json!({
        "role": "owner",
        "restaurant_name": "Corner Deli",
        "inspection_type": "Cycle Inspection / Initial Inspection",
        "critical_flag": "Critical",
        "violation_code": "06C",
        "score": score,
        "inspection_date": "2024-07-05"
    })
}

#[tokio::test]
async fn vocabulary_lists_choices_and_grades() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/api/v1/vocabulary")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert_eq!(
        body["critical_flag"],
        json!(["Critical", "Not Applicable", "Not Critical"])
    );
    assert_eq!(body["violation_code"].as_array().map(Vec::len), Some(7));
    assert_eq!(body["grades"], json!(["A", "B", "C", "N", "P", "Z"]));
}

#[tokio::test]
async fn predict_returns_role_guidance() {
    let response = router()
        .oneshot(post_json("/api/v1/predict", owner_request(18)))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert_eq!(body["role"], "Restaurant Owner");
    assert_eq!(body["predicted_grade"], "B");
    assert_eq!(body["inspection_day_of_week"], 4);
    assert_eq!(body["context"]["restaurant_name"], "Corner Deli");
    assert!(body["guidance"]
        .as_str()
        .is_some_and(|guidance| !guidance.is_empty()));
}

#[tokio::test]
async fn out_of_range_score_is_unprocessable() {
    let response = router()
        .oneshot(post_json("/api/v1/predict", owner_request(150)))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("150")));
}

#[tokio::test]
async fn csv_report_is_an_attachment() {
    let response = router()
        .oneshot(post_json("/api/v1/report/csv", owner_request(18)))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"owner_report.csv\""
    );

    let fields = read_csv_fields(body_bytes(response).await.as_slice()).expect("csv parses");
    assert_eq!(fields[0], ("Restaurant".to_string(), "Corner Deli".to_string()));
    assert_eq!(fields[1], ("Predicted Grade".to_string(), "B".to_string()));
}

#[tokio::test]
async fn pdf_report_is_a_pdf_document() {
    let request = json!({
        "role": "authority",
        "inspection_type": "Cycle Inspection / Re-inspection",
        "critical_flag": "Not Applicable",
        "violation_code": "10D",
        "score": 12,
        "inspection_date": "2024-07-01"
    });
    let response = router()
        .oneshot(post_json("/api/v1/report/pdf", request))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"authority_report.pdf\""
    );
    assert!(body_bytes(response).await.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn batch_returns_scored_csv() {
    let csv = "\
INSPECTION TYPE,CRITICAL FLAG,VIOLATION CODE,SCORE,inspection_year,inspection_month,inspection_day_of_week
Cycle Inspection / Initial Inspection,Critical,06C,18,2024,7,4
Cycle Inspection / Re-inspection,Not Applicable,10D,12,2024,7,0
";
    let response = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict/batch")
                .header(header::CONTENT_TYPE, "text/csv")
                .body(Body::from(csv))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"predicted_results.csv\""
    );

    let text = String::from_utf8(body_bytes(response).await).expect("utf-8 body");
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader.headers().expect("header row").clone();
    let grade_column = headers
        .iter()
        .position(|name| name == "Predicted Grade")
        .expect("grade column");
    let grades: Vec<String> = reader
        .records()
        .map(|record| record.expect("row parses")[grade_column].to_string())
        .collect();
    assert_eq!(grades, vec!["B", "A"]);
}

#[tokio::test]
async fn malformed_batch_is_a_bad_request() {
    let csv = "\
INSPECTION TYPE,CRITICAL FLAG,VIOLATION CODE,SCORE,inspection_year,inspection_month,inspection_day_of_week
Cycle Inspection / Initial Inspection,Critical,06C,eighteen,2024,7,4
";
    let response = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict/batch")
                .body(Body::from(csv))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_role_is_a_json_error() {
    let mut request = owner_request(18);
    request["role"] = json!("inspector");
    let response = router()
        .oneshot(post_json("/api/v1/predict", request))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let body: Value = serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("inspector")));
}

#[tokio::test]
async fn malformed_report_bodies_are_json_errors() {
    let missing_score = json!({
        "role": "customer",
        "inspection_type": "Cycle Inspection / Initial Inspection",
        "critical_flag": "Critical",
        "violation_code": "06C"
    });
    let response = router()
        .oneshot(post_json("/api/v1/report/csv", missing_score))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("score")));

    let response = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/report/pdf")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"role\": \"owner\","))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert!(body["error"].is_string());
}
