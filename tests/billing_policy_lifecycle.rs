//! Integration tests for the billing policy lifecycle against a mock
//! server, including the provisioning wait after create and update.

mod common;

use cloudplane::api::ApiError;
use cloudplane::licensing::{
    BillingInstrument, BillingPolicyCreate, BillingPolicyUpdate, LicensingError,
};
use cloudplane::lro::Deadline;
use common::{billing_policy_body, init_tracing, licensing_client, test_deadline};
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POLICY_ID: &str = "00000000-0000-0000-0000-000000000001";

fn policy_id() -> Uuid {
    POLICY_ID.parse().unwrap()
}

fn create_request() -> BillingPolicyCreate {
    BillingPolicyCreate {
        name: "payg-policy".to_string(),
        location: "europe".to_string(),
        billing_instrument: BillingInstrument {
            id: None,
            resource_group: "rg-billing".to_string(),
            subscription_id: "sub-1".to_string(),
        },
    }
}

#[tokio::test]
async fn test_create_waits_for_provisioning_to_settle() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/licensing/billingPolicies"))
        .and(query_param("api-version", "2022-03-01-preview"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(billing_policy_body(POLICY_ID, "Provisioning")),
        )
        .expect(1)
        .mount(&server)
        .await;
    // Two pending polls, then the policy settles.
    Mock::given(method("GET"))
        .and(path(format!("/licensing/billingPolicies/{POLICY_ID}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(billing_policy_body(POLICY_ID, "Provisioning")),
        )
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/licensing/billingPolicies/{POLICY_ID}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(billing_policy_body(POLICY_ID, "Enabled")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = licensing_client(&server);
    let policy = client
        .create_billing_policy(&test_deadline(), &create_request())
        .await
        .unwrap();

    assert_eq!(policy.id, policy_id());
    assert_eq!(policy.status, "Enabled");
}

#[tokio::test]
async fn test_create_returning_terminal_status_skips_polling() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/licensing/billingPolicies"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(billing_policy_body(POLICY_ID, "Enabled")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/licensing/billingPolicies/{POLICY_ID}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = licensing_client(&server);
    let policy = client
        .create_billing_policy(&test_deadline(), &create_request())
        .await
        .unwrap();

    assert_eq!(policy.status, "Enabled");
}

#[tokio::test]
async fn test_get_missing_policy_is_not_found() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/licensing/billingPolicies/{POLICY_ID}")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = licensing_client(&server);
    let err = client
        .billing_policy(&test_deadline(), policy_id())
        .await
        .unwrap_err();

    assert!(matches!(&err, LicensingError::NotFound(id) if *id == policy_id()));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_list_policies() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/licensing/billingPolicies"))
        .and(query_param("api-version", "2022-03-01-preview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [billing_policy_body(POLICY_ID, "Enabled")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = licensing_client(&server);
    let policies = client.billing_policies(&test_deadline()).await.unwrap();

    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].id, policy_id());
}

#[tokio::test]
async fn test_update_waits_for_the_new_status() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/licensing/billingPolicies/{POLICY_ID}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(billing_policy_body(POLICY_ID, "Provisioning")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/licensing/billingPolicies/{POLICY_ID}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(billing_policy_body(POLICY_ID, "Disabled")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = licensing_client(&server);
    let update = BillingPolicyUpdate {
        status: Some("Disabled".to_string()),
        ..Default::default()
    };
    let policy = client
        .update_billing_policy(&test_deadline(), policy_id(), &update)
        .await
        .unwrap();

    assert_eq!(policy.status, "Disabled");
}

#[tokio::test]
async fn test_delete_policy() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/licensing/billingPolicies/{POLICY_ID}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = licensing_client(&server);
    client
        .delete_billing_policy(&test_deadline(), policy_id())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_environments_for_policy() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/licensing/billingPolicies/{POLICY_ID}/environments"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [
                {"environmentId": "env-1"},
                {"environmentId": "env-2"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = licensing_client(&server);
    let environments = client
        .environments_for_policy(&test_deadline(), policy_id())
        .await
        .unwrap();

    assert_eq!(environments, vec!["env-1", "env-2"]);
}

#[tokio::test]
async fn test_add_environments() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/licensing/billingPolicies/{POLICY_ID}/environments/add"
        )))
        .and(wiremock::matchers::body_partial_json(serde_json::json!({
            "environmentIds": ["env-1"]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = licensing_client(&server);
    client
        .add_environments(&test_deadline(), policy_id(), &["env-1".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_add_no_environments_sends_nothing() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = licensing_client(&server);
    client
        .add_environments(&test_deadline(), policy_id(), &[])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_deadline_expires_while_waiting_for_provisioning() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/licensing/billingPolicies"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(billing_policy_body(POLICY_ID, "Provisioning")),
        )
        .mount(&server)
        .await;
    // Never settles.
    Mock::given(method("GET"))
        .and(path(format!("/licensing/billingPolicies/{POLICY_ID}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(billing_policy_body(POLICY_ID, "Provisioning")),
        )
        .mount(&server)
        .await;

    let client = licensing_client(&server);
    let deadline = Deadline::after(Duration::from_millis(200));
    let err = client
        .create_billing_policy(&deadline, &create_request())
        .await
        .unwrap_err();

    // Expiry can be seen by the poller or by the transport, depending
    // on which check runs first.
    assert!(matches!(
        err,
        LicensingError::DeadlineExceeded(_) | LicensingError::Api(ApiError::DeadlineExceeded)
    ));
    assert!(err.is_retryable());
}
