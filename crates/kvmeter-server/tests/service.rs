use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use clap::Parser;
use http_body_util::BodyExt;
use kvmeter_common::KvmeterError;
use kvmeter_server::{Cli, build_app};
use tower::ServiceExt;

fn test_cli() -> Cli {
    Cli::parse_from(["kvmeter", "--api-delay-ms", "0", "--shards", "3"])
}

async fn request(router: &Router, method: Method, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn counter_line(metrics: &str) -> &str {
    metrics
        .lines()
        .find(|line| line.starts_with("api_request_count_total{"))
        .unwrap()
}

#[tokio::test]
async fn api_calls_show_up_in_metrics() {
    let app = build_app(&test_cli()).unwrap();

    let (status, body) = request(&app.router, Method::GET, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(counter_line(&body), "api_request_count_total{zone=\"app\"} 0");
    assert!(body.contains("# TYPE process_uptime_seconds gauge\n"));

    for _ in 0..5 {
        let (status, body) = request(&app.router, Method::GET, "/api").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "API request handled");
    }
    let (_, body) = request(&app.router, Method::GET, "/metrics").await;
    assert_eq!(counter_line(&body), "api_request_count_total{zone=\"app\"} 5");

    let handles = (0..10)
        .map(|_| {
            let router = app.router.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    request(&router, Method::GET, "/api").await;
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.await.unwrap();
    }

    let (_, body) = request(&app.router, Method::GET, "/metrics").await;
    assert_eq!(counter_line(&body), "api_request_count_total{zone=\"app\"} 1005");
    assert_eq!(app.api_counter.request_count(), 1005);
}

#[tokio::test]
async fn counter_is_exported_first_in_registration_order() {
    let app = build_app(&test_cli()).unwrap();
    let (_, body) = request(&app.router, Method::GET, "/metrics").await;

    let mut lines = body.lines();
    assert_eq!(
        lines.next(),
        Some("# HELP api_request_count_total Total number of API requests")
    );
    assert_eq!(lines.next(), Some("# TYPE api_request_count_total counter"));
    assert_eq!(lines.next(), Some("api_request_count_total{zone=\"app\"} 0"));
    assert_eq!(lines.next(), Some("# HELP process_uptime_seconds Process uptime in seconds"));
}

#[tokio::test]
async fn key_value_round_trip_through_http() {
    let app = build_app(&test_cli()).unwrap();

    let (status, _) = request(&app.router, Method::POST, "/set/user/alice").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(&app.router, Method::GET, "/get/user").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"value":"alice"}"#);

    let (status, _) = request(&app.router, Method::GET, "/get/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn namespace_with_quotes_is_a_valid_label_value() {
    let cli = Cli::parse_from(["kvmeter", "--metric-namespace", "eu-west \"1\""]);
    assert!(build_app(&cli).is_ok());
}

#[test]
fn zero_shards_fail_before_serving() {
    let cli = Cli::parse_from(["kvmeter", "--shards", "0"]);
    assert!(matches!(
        build_app(&cli).err(),
        Some(KvmeterError::InvalidArgument(_))
    ));
}
