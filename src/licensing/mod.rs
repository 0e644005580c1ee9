//! Billing policy management.
//!
//! Billing policies are provisioned asynchronously: create and update
//! return the policy immediately with a provisioning status, and the
//! client polls the policy until it settles on `Enabled` or `Disabled`.
//! Only those two statuses are terminal; everything else the service
//! reports (`Provisioning`, and any status added later) is treated as
//! in flight.

mod dto;
mod error;


pub use dto::{BillingInstrument, BillingPolicy, BillingPolicyCreate, BillingPolicyUpdate};
pub use error::LicensingError;

use crate::api::ApiClient;
use crate::lro::{self, Deadline, PollError, StatusClass, Terminal};
use dto::{BillingPolicyList, PolicyEnvironmentList, PolicyEnvironments};
use reqwest::{Method, StatusCode};
use uuid::Uuid;

const API_VERSION: &str = "2022-03-01-preview";
const BASE_PATH: &str = "licensing/billingPolicies";

/// Statuses at which a policy has finished provisioning.
const TERMINAL_STATUSES: [&str; 2] = ["Enabled", "Disabled"];

/// Client for the billing policy service.
#[derive(Debug, Clone)]
pub struct LicensingClient {
    api: ApiClient,
}

impl LicensingClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn url(&self, segments: &[&str]) -> String {
        let base = self.api.config().service_url.trim_end_matches('/');
        let mut url = format!("{base}/{BASE_PATH}");
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url.push_str("?api-version=");
        url.push_str(API_VERSION);
        url
    }

    /// List all billing policies in the tenant.
    pub async fn billing_policies(
        &self,
        deadline: &Deadline,
    ) -> Result<Vec<BillingPolicy>, LicensingError> {
        let response = self
            .api
            .execute::<()>(
                deadline,
                Method::GET,
                &self.url(&[]),
                None,
                None,
                &[StatusCode::OK],
            )
            .await?;
        let list: BillingPolicyList = response.decode()?;
        Ok(list.value)
    }

    /// Fetch a single billing policy by id.
    pub async fn billing_policy(
        &self,
        deadline: &Deadline,
        id: Uuid,
    ) -> Result<BillingPolicy, LicensingError> {
        let result = self
            .api
            .execute::<()>(
                deadline,
                Method::GET,
                &self.url(&[&id.to_string()]),
                None,
                None,
                &[StatusCode::OK],
            )
            .await;
        match result {
            Ok(response) => Ok(response.decode()?),
            Err(e) if e.status() == Some(404) => Err(LicensingError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Create a billing policy and wait for it to finish provisioning.
    pub async fn create_billing_policy(
        &self,
        deadline: &Deadline,
        policy: &BillingPolicyCreate,
    ) -> Result<BillingPolicy, LicensingError> {
        let response = self
            .api
            .execute(
                deadline,
                Method::POST,
                &self.url(&[]),
                None,
                Some(policy),
                &[StatusCode::CREATED],
            )
            .await?;
        let created: BillingPolicy = response.decode()?;
        tracing::info!(policy_id = %created.id, status = %created.status, "Billing policy created");
        self.wait_for_terminal_status(deadline, created).await
    }

    /// Update a billing policy and wait for it to settle again.
    pub async fn update_billing_policy(
        &self,
        deadline: &Deadline,
        id: Uuid,
        update: &BillingPolicyUpdate,
    ) -> Result<BillingPolicy, LicensingError> {
        let response = self
            .api
            .execute(
                deadline,
                Method::PUT,
                &self.url(&[&id.to_string()]),
                None,
                Some(update),
                &[StatusCode::OK],
            )
            .await?;
        let updated: BillingPolicy = response.decode()?;
        self.wait_for_terminal_status(deadline, updated).await
    }

    /// Delete a billing policy.
    pub async fn delete_billing_policy(
        &self,
        deadline: &Deadline,
        id: Uuid,
    ) -> Result<(), LicensingError> {
        self.api
            .execute::<()>(
                deadline,
                Method::DELETE,
                &self.url(&[&id.to_string()]),
                None,
                None,
                &[StatusCode::NO_CONTENT],
            )
            .await?;
        tracing::info!(policy_id = %id, "Billing policy deleted");
        Ok(())
    }

    /// List the ids of environments linked to a policy.
    pub async fn environments_for_policy(
        &self,
        deadline: &Deadline,
        id: Uuid,
    ) -> Result<Vec<String>, LicensingError> {
        let result = self
            .api
            .execute::<()>(
                deadline,
                Method::GET,
                &self.url(&[&id.to_string(), "environments"]),
                None,
                None,
                &[StatusCode::OK],
            )
            .await;
        match result {
            Ok(response) => {
                let list: PolicyEnvironmentList = response.decode()?;
                Ok(list.value.into_iter().map(|e| e.environment_id).collect())
            }
            Err(e) if e.status() == Some(404) => Err(LicensingError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Link environments to a policy. A no-op for an empty list.
    pub async fn add_environments(
        &self,
        deadline: &Deadline,
        id: Uuid,
        environment_ids: &[String],
    ) -> Result<(), LicensingError> {
        self.change_environments(deadline, id, "add", environment_ids)
            .await
    }

    /// Unlink environments from a policy. A no-op for an empty list.
    pub async fn remove_environments(
        &self,
        deadline: &Deadline,
        id: Uuid,
        environment_ids: &[String],
    ) -> Result<(), LicensingError> {
        self.change_environments(deadline, id, "remove", environment_ids)
            .await
    }

    async fn change_environments(
        &self,
        deadline: &Deadline,
        id: Uuid,
        action: &str,
        environment_ids: &[String],
    ) -> Result<(), LicensingError> {
        if environment_ids.is_empty() {
            return Ok(());
        }
        self.api
            .execute(
                deadline,
                Method::POST,
                &self.url(&[&id.to_string(), "environments", action]),
                None,
                Some(&PolicyEnvironments { environment_ids }),
                &[StatusCode::OK],
            )
            .await?;
        tracing::info!(
            policy_id = %id,
            action,
            count = environment_ids.len(),
            "Billing policy environments changed"
        );
        Ok(())
    }

    /// Poll a policy until it reaches `Enabled` or `Disabled`.
    ///
    /// Returns immediately when the given snapshot is already terminal.
    async fn wait_for_terminal_status(
        &self,
        deadline: &Deadline,
        policy: BillingPolicy,
    ) -> Result<BillingPolicy, LicensingError> {
        if policy_status_class(&policy) != StatusClass::Pending {
            return Ok(policy);
        }

        let id = policy.id;
        let fetch = || self.billing_policy(deadline, id);
        let terminal = lro::poll_until_terminal(
            deadline,
            self.api.config().api.poll_interval(),
            fetch,
            policy_status_class,
        )
        .await
        .map_err(|e| match e {
            PollError::Fetch(e) => e,
            PollError::DeadlineExceeded => LicensingError::DeadlineExceeded(id),
            PollError::Cancelled => LicensingError::Cancelled(id),
        })?;

        match terminal {
            Terminal::Succeeded(policy) | Terminal::Failed(policy) => Ok(policy),
        }
    }
}

/// Classify a policy snapshot for the poller.
fn policy_status_class(policy: &BillingPolicy) -> StatusClass {
    if TERMINAL_STATUSES.contains(&policy.status.as_str()) {
        StatusClass::Succeeded
    } else {
        StatusClass::Pending
    }
}
