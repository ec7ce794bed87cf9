//! Contract Test: Bulk Policy Operations
//!
//! This test drives the four bulk operations against a local mock server.
//!
//! Constraints verified:
//! - Method, path, headers and JSON body match the API
//! - 202 with no body is a success carrying status and content type
//! - 5XX is retried; an exhausted budget surfaces the last status as an error
//! - 4XX is final on the first attempt and its body is captured
//! - Credentials are resolved per call; resolution failures send nothing
//! - Timeouts and cancellation abort the call

mod common;

use common::*;
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xshield_core::{BackoffStrategy, Context, Credentials, Error, RetryConfig, Security, SecuritySource};
use xshield_sdk::models::{NamedNetworkBulkRequest, NamedNetworkReference, TemplateBulkRequest, TemplateReference};
use xshield_sdk::{Options, SdkConfiguration, XshieldSdk};

fn named_networks() -> NamedNetworkBulkRequest {
    NamedNetworkBulkRequest::new(
        POLICY_ID,
        vec![NamedNetworkReference::new("nn-1"), NamedNetworkReference::new("nn-2")],
    )
}

fn templates() -> TemplateBulkRequest {
    TemplateBulkRequest::new(POLICY_ID, vec![TemplateReference::new("t-1")])
}

#[tokio::test]
async fn named_network_apply_sends_put_with_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(NAMED_NETWORKS_PATH))
        .and(header("authorization", "Bearer test-api-key"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!([
            { "namedNetworkId": "nn-1" },
            { "namedNetworkId": "nn-2" }
        ])))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let res = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_named_network_apply(&Context::background(), named_networks(), Options::new())
        .await
        .expect("202 is a success");

    assert_eq!(res.status_code, 202);
    assert_eq!(res.raw_response.status().as_u16(), 202);
}

#[tokio::test]
async fn named_network_un_apply_sends_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(NAMED_NETWORKS_PATH))
        .and(body_json(json!([
            { "namedNetworkId": "nn-1" },
            { "namedNetworkId": "nn-2" }
        ])))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let res = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_named_network_un_apply(&Context::background(), named_networks(), Options::new())
        .await
        .expect("202 is a success");

    assert_eq!(res.status_code, 202);
}

#[tokio::test]
async fn template_apply_and_un_apply_hit_templates_path() {
    let server = MockServer::start().await;
    for verb in ["PUT", "DELETE"] {
        Mock::given(method(verb))
            .and(path(TEMPLATES_PATH))
            .and(body_json(json!([{ "templateId": "t-1" }])))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;
    }

    let ops = sdk(&server.uri()).tag_based_policies();
    let ctx = Context::background();

    let applied = ops
        .tag_based_policy_bulk_template_apply(&ctx, templates(), Options::new())
        .await
        .expect("apply succeeds");
    let removed = ops
        .tag_based_policy_bulk_template_un_apply(&ctx, templates(), Options::new())
        .await
        .expect("un-apply succeeds");

    assert_eq!(applied.status_code, 202);
    assert_eq!(removed.status_code, 202);
}

#[tokio::test]
async fn content_type_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let res = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(&Context::background(), templates(), Options::new())
        .await
        .expect("200 is a success");

    assert_eq!(res.status_code, 200);
    assert_eq!(res.content_type, "application/json");
}

#[tokio::test]
async fn absent_body_sends_no_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(TEMPLATES_PATH))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let request = TemplateBulkRequest {
        tagbasedpolicy_id: POLICY_ID.to_string(),
        request_body: None,
    };
    sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_template_un_apply(&Context::background(), request, Options::new())
        .await
        .expect("success");

    let received = server.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("content-type").is_none());
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn server_error_then_success_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(NAMED_NETWORKS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(NAMED_NETWORKS_PATH))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let res = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_named_network_apply(&Context::background(), named_networks(), Options::new())
        .await
        .expect("second attempt succeeds");

    assert_eq!(res.status_code, 202);

    // Every attempt carries the full body.
    let received = server.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].body, received[1].body);
}

#[tokio::test]
async fn persistent_server_error_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(NAMED_NETWORKS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&server)
        .await;

    let err = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_named_network_apply(&Context::background(), named_networks(), Options::new())
        .await
        .expect_err("500 must fail once retries are spent");

    assert_eq!(err.status_code(), Some(500));
    assert!(err.to_string().contains("500"));
    assert!(matches!(err, Error::UnexpectedStatus { ref body, .. } if body == "internal failure"));

    let received = server.received_requests().await.expect("recording enabled");
    assert!(received.len() >= 2, "5XX must be retried");
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"policy not found"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let err = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(&Context::background(), templates(), Options::new())
        .await
        .expect_err("404 is an error");

    assert_eq!(err.status_code(), Some(404));
    assert!(matches!(err, Error::UnexpectedStatus { ref body, .. } if body.contains("policy not found")));
}

#[tokio::test]
async fn truncated_error_body_is_reported() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        // Promise 100 bytes, send 7, then close the write side.
        let _ = socket
            .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 100\r\n\r\npartial")
            .await;
        let _ = socket.shutdown().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let err = sdk(&format!("http://{}", addr))
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(&Context::background(), templates(), Options::new())
        .await
        .expect_err("404 is an error");

    assert_eq!(err.status_code(), Some(404));
    assert!(
        matches!(err, Error::UnexpectedStatus { ref body, .. } if body.starts_with("<unreadable response body")),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn per_call_retry_policy_overrides_client_policy() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let err = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(
            &Context::background(),
            templates(),
            Options::new().with_retries(RetryConfig::disabled()),
        )
        .await
        .expect_err("502 is an error");

    assert_eq!(err.status_code(), Some(502));
}

#[tokio::test]
async fn invalid_per_call_retry_policy_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let bad = RetryConfig::backoff(
        BackoffStrategy::new(
            Duration::from_millis(5),
            Duration::from_millis(20),
            -2.0,
            Duration::from_secs(1),
        ),
        true,
    );
    let err = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(&Context::background(), templates(), Options::new().with_retries(bad))
        .await
        .expect_err("negative exponent is rejected");

    assert!(matches!(err, Error::Config(_)));
    let received = server.received_requests().await.expect("recording enabled");
    assert!(received.is_empty());
}

#[tokio::test]
async fn caller_headers_win() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .and(header("user-agent", "custom-agent/1.0"))
        .and(header("x-request-id", "req-1"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let options = Options::new()
        .with_header("User-Agent", "custom-agent/1.0")
        .with_header("X-Request-Id", "req-1");
    let res = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(&Context::background(), templates(), options)
        .await
        .expect("success");

    assert_eq!(res.status_code, 202);
}

#[tokio::test]
async fn per_call_server_url_overrides_configuration() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let res = sdk(DEAD_SERVER)
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(
            &Context::background(),
            templates(),
            Options::new().with_server_url(server.uri()),
        )
        .await
        .expect("request goes to the per-call server");

    assert_eq!(res.status_code, 202);
}

#[tokio::test]
async fn credential_server_url_reroutes_request() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .and(header("authorization", "Bearer test-api-key"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let creds = Credentials::new(API_KEY).with_server_url(server.uri());
    let res = sdk_with_security(DEAD_SERVER, Security::ConfigProvider(creds))
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(&Context::background(), templates(), Options::new())
        .await
        .expect("request goes to the credential's server");

    assert_eq!(res.status_code, 202);
}

#[tokio::test]
async fn opaque_security_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    sdk_with_security(&server.uri(), Security::Opaque)
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(&Context::background(), templates(), Options::new())
        .await
        .expect("success");

    let received = server.received_requests().await.expect("recording enabled");
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn security_failure_sends_nothing() {
    let server = MockServer::start().await;

    let source = |_ctx: Context| async { Err::<Security, _>(Error::security("credentials unavailable")) };
    let configuration = SdkConfiguration::new(client_config(&server.uri()))
        .expect("valid configuration")
        .with_security(source);

    let err = XshieldSdk::new(configuration)
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(&Context::background(), templates(), Options::new())
        .await
        .expect_err("resolution failure aborts the call");

    assert!(matches!(err, Error::Security(_)));
    let received = server.received_requests().await.expect("recording enabled");
    assert!(received.is_empty());
}

#[tokio::test]
async fn security_is_resolved_per_call() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    #[async_trait::async_trait]
    impl SecuritySource for Counting {
        async fn resolve(&self, _ctx: &Context) -> xshield_core::Result<Security> {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Security::ConfigProvider(Credentials::new(format!("key-{}", n))))
        }
    }

    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let calls = Arc::new(AtomicUsize::new(0));
    let configuration = SdkConfiguration::new(client_config(&server.uri()))
        .expect("valid configuration")
        .with_security(Counting(Arc::clone(&calls)));
    let ops = XshieldSdk::new(configuration).tag_based_policies();
    let ctx = Context::background();

    for _ in 0..2 {
        ops.tag_based_policy_bulk_template_apply(&ctx, templates(), Options::new())
            .await
            .expect("success");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let received = server.received_requests().await.expect("recording enabled");
    assert_eq!(received[0].headers.get("authorization").unwrap(), "Bearer key-0");
    assert_eq!(received[1].headers.get("authorization").unwrap(), "Bearer key-1");
}

#[tokio::test]
async fn missing_policy_id_sends_nothing() {
    let server = MockServer::start().await;

    let err = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_named_network_apply(
            &Context::background(),
            NamedNetworkBulkRequest::new("", vec![]),
            Options::new(),
        )
        .await
        .expect_err("empty id is rejected");

    assert!(matches!(err, Error::MissingPathParam(_)));
    let received = server.received_requests().await.expect("recording enabled");
    assert!(received.is_empty());
}

#[tokio::test]
async fn timeout_aborts_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .respond_with(ResponseTemplate::new(202).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let err = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(
            &Context::background(),
            templates(),
            Options::new().with_timeout(Duration::from_millis(100)),
        )
        .await
        .expect_err("timeout fires");

    assert!(matches!(err, Error::DeadlineExceeded));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn unbounded_timeout_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let res = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(
            &Context::background(),
            templates(),
            Options::new().with_timeout(Duration::MAX),
        )
        .await
        .expect("call succeeds");

    assert_eq!(res.status_code, 202);
}

#[tokio::test]
async fn cancellation_aborts_call() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TEMPLATES_PATH))
        .respond_with(ResponseTemplate::new(202).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let ctx = Context::with_token(token.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let err = sdk(&server.uri())
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(&ctx, templates(), Options::new())
        .await
        .expect_err("cancellation aborts");

    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn connection_error_without_retries_is_transport_error() {
    let err = sdk(DEAD_SERVER)
        .tag_based_policies()
        .tag_based_policy_bulk_template_apply(
            &Context::background(),
            templates(),
            Options::new().with_retries(RetryConfig::disabled()),
        )
        .await
        .expect_err("nothing listens there");

    assert!(err.is_connection_error());
}
