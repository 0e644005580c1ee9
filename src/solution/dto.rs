//! Wire types for the environment data API.
//!
//! Three naming conventions coexist on this wire: the solution entity
//! itself uses lowercase OData attribute names, the staging and import
//! actions use PascalCase, and component parameters carry an
//! `@odata.type` discriminator. The renames below pin each one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) const CONNECTION_REFERENCE_TYPE: &str = "Microsoft.Dynamics.CRM.connectionreference";
pub(crate) const ENVIRONMENT_VARIABLE_TYPE: &str = "Microsoft.Dynamics.CRM.environmentvariablevalue";

/// An installed solution.
#[derive(Debug, Clone, Deserialize)]
pub struct Solution {
    #[serde(rename = "solutionid")]
    pub id: Uuid,
    #[serde(rename = "uniquename")]
    pub unique_name: String,
    #[serde(rename = "friendlyname")]
    pub display_name: String,
    #[serde(rename = "ismanaged")]
    pub is_managed: bool,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(rename = "createdon", default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(rename = "modifiedon", default)]
    pub modified_on: Option<DateTime<Utc>>,
    #[serde(rename = "installedon", default)]
    pub installed_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SolutionList {
    pub value: Vec<Solution>,
}

// ============================================================================
// Staging
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct StageSolutionRequest {
    #[serde(rename = "CustomizationFile")]
    pub customization_file: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StageSolutionResponse {
    #[serde(rename = "StageSolutionResults")]
    pub results: StageSolutionResults,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StageSolutionResults {
    #[serde(rename = "StageSolutionUploadId")]
    pub upload_id: Uuid,
    #[serde(rename = "StageSolutionStatus")]
    pub status: String,
    #[serde(rename = "SolutionValidationResults", default)]
    pub validation_results: Vec<ValidationResult>,
    #[serde(rename = "MissingDependencies", default)]
    pub missing_dependencies: Vec<MissingDependency>,
    #[serde(rename = "SolutionDetails")]
    pub solution_details: SolutionDetails,
}

/// One validation finding from staging.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidationResult {
    #[serde(default)]
    pub solution_validation_result_type: String,
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub additional_info: String,
    #[serde(default)]
    pub message: String,
}

/// One unresolved dependency reported by staging.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MissingDependency {
    pub component_type: String,
    pub component_display_name: String,
    pub component_schema_name: String,
    pub component_parent_display_name: String,
    pub component_parent_schema_name: String,
    pub component_id: String,
    pub required_component_type: String,
    pub required_component_display_name: String,
    pub required_component_schema_name: String,
    pub required_component_parent_display_name: String,
    pub required_component_parent_schema_name: String,
    pub required_component_id: String,
    pub required_solution_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SolutionDetails {
    pub solution_unique_name: String,
    #[serde(default)]
    pub solution_friendly_name: String,
    #[serde(default)]
    pub solution_version: String,
}

// ============================================================================
// Import
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ImportSolutionRequest {
    pub publish_workflows: bool,
    pub overwrite_unmanaged_customizations: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_parameters: Option<Vec<ComponentParameter>>,
    pub solution_parameters: SolutionParameters,
}

#[derive(Debug, Serialize)]
pub(crate) struct SolutionParameters {
    #[serde(rename = "StageSolutionUploadId")]
    pub stage_solution_upload_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImportSolutionResponse {
    #[serde(rename = "ImportJobKey")]
    pub import_job_key: Uuid,
    #[serde(rename = "AsyncOperationId")]
    pub async_operation_id: Uuid,
}

/// A snapshot of the async import operation.
#[derive(Debug, Deserialize)]
pub(crate) struct AsyncOperationStatus {
    #[serde(rename = "asyncoperationid", default)]
    pub async_operation_id: Option<Uuid>,
    #[serde(rename = "createdon", default)]
    pub created_on: Option<String>,
    #[serde(rename = "completedon", default)]
    pub completed_on: Option<String>,
}

impl AsyncOperationStatus {
    /// The operation is complete once a completion timestamp appears.
    pub fn is_complete(&self) -> bool {
        self.completed_on.as_deref().is_some_and(|v| !v.is_empty())
    }
}

// ============================================================================
// Post-import validation
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ImportValidationResponse {
    #[serde(rename = "SolutionOperationResult")]
    pub result: SolutionOperationResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SolutionOperationResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub warning_messages: Vec<String>,
    #[serde(default)]
    pub error_messages: Vec<String>,
}

// ============================================================================
// Component parameters
// ============================================================================

/// A component override applied during import, discriminated on the
/// wire by `@odata.type`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ComponentParameter {
    ConnectionReference(ConnectionReferenceParameter),
    EnvironmentVariable(EnvironmentVariableParameter),
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionReferenceParameter {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    #[serde(rename = "connectionreferencelogicalname")]
    pub logical_name: String,
    #[serde(rename = "connectionreferencedisplayname")]
    pub display_name: String,
    #[serde(rename = "connectionid")]
    pub connection_id: String,
    #[serde(rename = "connectorid")]
    pub connector_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentVariableParameter {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    #[serde(rename = "schemaname")]
    pub schema_name: String,
    pub value: String,
}
