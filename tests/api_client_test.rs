//! Wire contract of the backend API client
//!
//! Raw operations must hand back whatever JSON the backend sends,
//! regardless of status. Typed operations decode and classify failures.

use datadash::config;
use datadash::infrastructure::api::{
    ApiClient, ApiError, ChatMessage, ColumnStats, ForecastRequest, ModelKind, ModelTraining,
    ReportFormat, UploadFile,
};
use datadash::DataContext;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dataset() -> DataContext {
    DataContext::new("abc", "f.csv")
}

#[tokio::test]
async fn test_get_returns_body_regardless_of_status() {
    let mock_server = MockServer::start().await;
    let client = ApiClient::new(mock_server.uri());

    for (status, endpoint) in [(200, "/ok"), (404, "/missing"), (500, "/broken")] {
        let body = json!({"status": status, "items": [1, 2, 3]});
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_json(body.clone()))
            .mount(&mock_server)
            .await;

        let got = client.get(endpoint).await.unwrap();
        assert_eq!(got, body, "status {status}");
    }
}

#[tokio::test]
async fn test_post_sends_json_body_and_header() {
    let mock_server = MockServer::start().await;
    let data = json!({"question": "why?", "context": null, "n": 3});

    Mock::given(method("POST"))
        .and(path("/api/ai/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(&data))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "nope"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri());
    let got = client.post("/api/ai/chat", &data).await.unwrap();
    assert_eq!(got, json!({"detail": "nope"}));
}

#[tokio::test]
async fn test_upload_sends_single_file_part() {
    // Base URL unset: the client targets the default backend
    let default_client = ApiClient::new(config::resolve_base_url(None, None, None));
    assert_eq!(
        default_client.url("/api/upload"),
        "http://localhost:8000/api/upload"
    );

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "123"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri());
    let file = UploadFile::new("data.csv", b"a,b\n1,2\n".to_vec());
    let got = client.upload_file("/api/upload", &file).await.unwrap();
    assert_eq!(got, json!({"id": "123"}));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    let content_type = request
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&request.body);
    assert_eq!(body.matches("Content-Disposition").count(), 1);
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="data.csv""#));
    assert!(body.contains("a,b\n1,2\n"));
}

#[tokio::test]
async fn test_non_json_body_is_invalid_json_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri());
    let err = client.get("/health").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidJson { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(502));

    let err = client.health().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidJson { .. }));
}

#[tokio::test]
async fn test_non_json_body_fails_post_and_upload() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(413).set_body_string("Request Entity Too Large"))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri());

    let err = client
        .post("/api/ai/chat", &json!({"question": "hi"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidJson { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(200));

    let file = UploadFile::new("big.csv", b"a\n1\n".to_vec());
    let err = client.upload_file("/api/upload", &file).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidJson { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(413));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = ApiClient::new(format!("http://127.0.0.1:{port}"));
    let err = client.get("/health").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_typed_operation_surfaces_backend_detail() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/eda/summary"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri());
    let err = client.eda_summary(&dataset()).await.unwrap_err();
    match err {
        ApiError::Backend { status, detail } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(detail, "boom");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_typed_operation_reports_schema_mismatch() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/risk/quality"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"score": "high"})))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri());
    let err = client.data_quality(&dataset()).await.unwrap_err();
    match err {
        ApiError::Decode { endpoint, .. } => assert_eq!(endpoint, "/api/risk/quality"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dataset_endpoints_send_context_as_query() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/eda/stats"))
        .and(query_param("file_id", "abc"))
        .and(query_param("filename", "f.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "price": {"type": "numeric", "mean": 2.0, "median": 2.0, "std": 1.0,
                      "min": 1.0, "max": 3.0, "q25": 1.5, "q75": 2.5},
            "region": {"type": "categorical", "unique": 2, "mode": "north"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri());
    let stats = client.column_stats(&dataset()).await.unwrap();
    assert_eq!(stats.len(), 2);
    assert!(matches!(stats["region"], ColumnStats::Categorical { unique: 2, .. }));
}

#[tokio::test]
async fn test_train_and_forecast_post_typed_bodies() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/model/train"))
        .and(query_param("file_id", "abc"))
        .and(body_json(json!({"target_column": "price", "model_type": "regression"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_type": "linear", "target": "price",
            "r_squared": 0.91, "rmse": 1.5, "mae": 1.1, "samples_trained": 80
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/forecast"))
        .and(body_json(json!({"date_column": "date", "value_column": "sales", "periods": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "forecast": [{"value": 10.0}, {"value": 11.0}],
            "method": "exponential_smoothing",
            "periods": 2
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri());
    let metrics = client
        .train_model(
            &dataset(),
            &ModelTraining {
                target_column: "price".to_string(),
                model_type: ModelKind::Regression,
                features: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(metrics.r_squared, Some(0.91));
    assert_eq!(metrics.samples_trained, Some(80));

    let forecast = client
        .forecast(
            &dataset(),
            &ForecastRequest {
                date_column: "date".to_string(),
                value_column: "sales".to_string(),
                periods: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(forecast.forecast.len(), 2);
    assert_eq!(forecast.method.as_deref(), Some("exponential_smoothing"));
}

#[tokio::test]
async fn test_risk_report_and_chat_endpoints() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/risk/analyze"))
        .and(query_param("contamination", "0.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "anomalies": [{"price": 999.0, "row_index": 7}],
            "total_anomalies": 1,
            "risk_score": 10.0,
            "summary": "Detected 1 anomalies (10.0% of data)"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/report/generate"))
        .and(query_param("format", "pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "report": null, "format": "pdf", "status": "error"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ai/chat"))
        .and(body_json(json!({"question": "what sells?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Widgets", "confidence": 0.9
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri());

    let risk = client.analyze_risk(&dataset(), 0.2).await.unwrap();
    assert_eq!(risk.total_anomalies, 1);
    assert_eq!(risk.anomalies[0]["row_index"], json!(7));

    let report = client
        .generate_report(&dataset(), ReportFormat::Pdf)
        .await
        .unwrap();
    assert_eq!(report.format, ReportFormat::Pdf);
    assert!(!report.succeeded());

    let answer = client
        .chat(&ChatMessage {
            question: "what sells?".to_string(),
            context: None,
        })
        .await
        .unwrap();
    assert_eq!(answer.answer, "Widgets");
    assert!(answer.sources.is_none());
}

#[tokio::test]
async fn test_upload_dataset_decodes_file_info() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "123",
            "filename": "data.csv",
            "size": 8,
            "rows": 1,
            "columns": 2,
            "column_names": ["a", "b"],
            "upload_time": "2024-03-01T12:30:45.000001"
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri());
    let file = UploadFile::new("data.csv", b"a,b\n1,2\n".to_vec());
    let info = client.upload_dataset(&file).await.unwrap();
    assert_eq!(info.id, "123");
    assert_eq!(info.column_names, vec!["a", "b"]);
    assert!(info.uploaded_at().is_some());
}

#[tokio::test]
async fn test_service_info_and_eda_views() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "AI Data Analytics API", "docs": "/docs", "health": "/health"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/eda/correlation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "a": {"a": 1.0, "b": -0.4},
            "b": {"a": -0.4, "b": 1.0}
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/eda/outliers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"a": [3, 17], "b": []})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/eda/charts"))
        .and(query_param("filename", "f.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "charts": [{"name": "a", "type": "histogram", "data": {"0-10": 4, "10-20": 1}}]
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri());

    let info = client.service_info().await.unwrap();
    assert_eq!(info.health, "/health");

    let matrix = client.correlation(&dataset()).await.unwrap();
    assert_eq!(matrix["a"]["b"], Some(-0.4));

    let outliers = client.outliers(&dataset()).await.unwrap();
    assert_eq!(outliers["a"], vec![3, 17]);
    assert!(outliers["b"].is_empty());

    let charts = client.charts(&dataset()).await.unwrap();
    assert_eq!(charts.charts[0].kind, "histogram");
    assert_eq!(charts.charts[0].data["0-10"], 4);
}
