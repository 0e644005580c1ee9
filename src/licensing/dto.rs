//! Wire types for the billing policy service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A billing policy as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPolicy {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type", default)]
    pub tenant_type: Option<String>,
    pub status: String,
    pub location: String,
    pub billing_instrument: BillingInstrument,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified_on: Option<DateTime<Utc>>,
}

/// The Azure subscription backing a billing policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingInstrument {
    #[serde(default)]
    pub id: Option<String>,
    pub resource_group: String,
    pub subscription_id: String,
}

/// Fields accepted when creating a billing policy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPolicyCreate {
    pub name: String,
    pub location: String,
    pub billing_instrument: BillingInstrument,
}

/// Fields accepted when updating a billing policy; unset fields are
/// left unchanged by the service.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPolicyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BillingPolicyList {
    pub value: Vec<BillingPolicy>,
}

/// Request body for adding or removing environments on a policy.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PolicyEnvironments<'a> {
    pub environment_ids: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct PolicyEnvironmentList {
    pub value: Vec<PolicyEnvironment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PolicyEnvironment {
    pub environment_id: String,
}
