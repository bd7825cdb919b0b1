// Fetch module tests.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::ProbeOptions;
use crate::error_handling::{InfoType, ProbeError, ProcessingStats, WarningType};
use crate::fetch::{run_target, ProcessingContext};
use crate::initialization::{init_client, init_crypto_provider};
use crate::models::Target;

fn context(options: ProbeOptions) -> ProcessingContext {
    init_crypto_provider();
    let client = init_client(&options).expect("client");
    ProcessingContext::new(client, Arc::new(options), Arc::new(ProcessingStats::new()))
}

fn fast_options() -> ProbeOptions {
    ProbeOptions {
        timeout_seconds: 2,
        retry_initial_delay_ms: 1,
        randomize_user_agent: false,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_run_target_follows_redirect_chain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/middle"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/middle"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/end", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/end"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&server)
        .await;

    let ctx = context(fast_options());
    let target = Target::new(format!("{}/start", server.uri()));
    let result = run_target(&ctx, &target, &CancellationToken::new()).await;

    assert_eq!(result.status_code, 200);
    assert_eq!(result.redirects, 2);
    assert_eq!(result.attempts, 3);
    assert_eq!(result.url, format!("{}/end", server.uri()));
    assert_eq!(result.content_length, 4);
    assert!(result.body.is_empty(), "save cap defaults to zero");
    assert!(result.is_success());
    assert_eq!(ctx.stats.get_info_count(InfoType::HttpRedirect), 1);
    assert_eq!(ctx.stats.get_info_count(InfoType::MultipleRedirects), 1);
}

#[tokio::test]
async fn test_run_target_redirect_limit_keeps_last_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/again"))
        .mount(&server)
        .await;

    let ctx = context(ProbeOptions {
        max_redirects: 2,
        ..fast_options()
    });
    let target = Target::new(server.uri());
    let result = run_target(&ctx, &target, &CancellationToken::new()).await;

    assert_eq!(result.status_code, 302);
    assert_eq!(result.redirects, 2);
    assert_eq!(result.attempts, 3);
    assert!(result.error.is_empty());
    assert_eq!(ctx.stats.get_info_count(InfoType::RedirectLimitReached), 1);
}

#[tokio::test]
async fn test_run_target_without_follow_reports_redirect_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/elsewhere"))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(ProbeOptions {
        follow_redirects: false,
        ..fast_options()
    });
    let result = run_target(&ctx, &Target::new(server.uri()), &CancellationToken::new()).await;

    assert_eq!(result.status_code, 301);
    assert_eq!(result.redirects, 0);
}

#[tokio::test]
async fn test_run_target_missing_location_is_final() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let ctx = context(fast_options());
    let result = run_target(&ctx, &Target::new(server.uri()), &CancellationToken::new()).await;

    assert_eq!(result.status_code, 302);
    assert_eq!(
        ctx.stats.get_warning_count(WarningType::MissingLocationHeader),
        1
    );
}

#[tokio::test]
async fn test_run_target_falls_through_methods() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;

    let ctx = context(ProbeOptions {
        methods: vec!["HEAD".to_string(), "GET".to_string()],
        ..fast_options()
    });
    let result = run_target(&ctx, &Target::new(server.uri()), &CancellationToken::new()).await;

    // Any response ends the search, even a non-2xx one
    assert_eq!(result.method, "HEAD");
    assert_eq!(result.status_code, 405);
}

#[tokio::test]
async fn test_run_target_saves_body_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello world"))
        .mount(&server)
        .await;

    let ctx = context(ProbeOptions {
        max_response_bytes_to_save: 5,
        ..fast_options()
    });
    let result = run_target(&ctx, &Target::new(server.uri()), &CancellationToken::new()).await;

    assert_eq!(result.body, "hello");
    assert_eq!(result.content_length, 11);
}

#[tokio::test]
async fn test_run_target_rejects_non_http_scheme() {
    let ctx = context(fast_options());
    let target = Target {
        input: "ftp://example.com/file".to_string(),
        url: "ftp://example.com/file".to_string(),
    };
    let result = run_target(&ctx, &target, &CancellationToken::new()).await;

    assert_eq!(result.status_code, 0);
    assert_eq!(result.attempts, 0);
    assert!(matches!(result.err, Some(ProbeError::UnsupportedUrl { .. })));
    assert_eq!(result.error, "Invalid URL");
}

#[tokio::test]
async fn test_run_target_cancelled_before_start() {
    let ctx = context(fast_options());
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = run_target(&ctx, &Target::new("http://127.0.0.1:9"), &cancel).await;

    assert_eq!(result.status_code, 0);
    assert!(matches!(result.err, Some(ProbeError::Cancelled)));
    assert_eq!(result.error, "Probe cancelled");
}
