//! Deployment settings and their translation to import parameters.

use super::dto::{
    ComponentParameter, ConnectionReferenceParameter, EnvironmentVariableParameter,
    CONNECTION_REFERENCE_TYPE, ENVIRONMENT_VARIABLE_TYPE,
};
use super::SolutionError;
use serde::Deserialize;

/// Per-environment deployment settings, as authored in a settings file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SolutionSettings {
    #[serde(rename = "environmentvariables")]
    pub environment_variables: Vec<EnvironmentVariableSetting>,
    #[serde(rename = "connectionreferences")]
    pub connection_references: Vec<ConnectionReferenceSetting>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentVariableSetting {
    #[serde(rename = "schemaname")]
    pub schema_name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionReferenceSetting {
    #[serde(rename = "logicalname")]
    pub logical_name: String,
    #[serde(rename = "connectionid")]
    pub connection_id: String,
    #[serde(rename = "connectorid")]
    pub connector_id: String,
}

impl SolutionSettings {
    /// Parse a settings file.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SolutionError> {
        serde_json::from_slice(bytes).map_err(|e| SolutionError::Settings(e.to_string()))
    }

    /// Translate the settings into import component parameters.
    ///
    /// Connection references come first, then environment variables.
    /// Variables with an empty value are dropped rather than sent: the
    /// service rejects empty overrides. Returns `None` when nothing
    /// survives translation.
    pub(crate) fn component_parameters(&self) -> Option<Vec<ComponentParameter>> {
        let mut parameters = Vec::new();

        for reference in &self.connection_references {
            parameters.push(ComponentParameter::ConnectionReference(
                ConnectionReferenceParameter {
                    odata_type: CONNECTION_REFERENCE_TYPE.to_string(),
                    logical_name: reference.logical_name.clone(),
                    display_name: String::new(),
                    connection_id: reference.connection_id.clone(),
                    connector_id: reference.connector_id.clone(),
                    description: String::new(),
                },
            ));
        }

        for variable in &self.environment_variables {
            if variable.value.is_empty() {
                continue;
            }
            parameters.push(ComponentParameter::EnvironmentVariable(
                EnvironmentVariableParameter {
                    odata_type: ENVIRONMENT_VARIABLE_TYPE.to_string(),
                    schema_name: variable.schema_name.clone(),
                    value: variable.value.clone(),
                },
            ));
        }

        if parameters.is_empty() {
            None
        } else {
            Some(parameters)
        }
    }
}
