//! Solution import and management against an environment's data API.
//!
//! Import runs as a staged pipeline: the solution archive is staged for
//! server-side validation, the staged upload is committed as an
//! asynchronous import, the async operation is polled to completion,
//! the import job's result is validated, and the installed solution is
//! resolved by its unique name. Each phase must fully succeed before
//! the next starts; a rejection carries everything the service
//! reported about it.

mod dto;
mod error;
mod settings;


pub use dto::{ComponentParameter, MissingDependency, Solution, ValidationResult};
pub use error::SolutionError;
pub use settings::{ConnectionReferenceSetting, EnvironmentVariableSetting, SolutionSettings};

use crate::api::ApiClient;
use crate::lro::{self, Deadline, StatusClass, Terminal};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dto::{
    AsyncOperationStatus, ImportSolutionRequest, ImportSolutionResponse, ImportValidationResponse,
    SolutionList, SolutionParameters, StageSolutionRequest, StageSolutionResponse,
};
use reqwest::{Method, StatusCode, Url};
use uuid::Uuid;

const DATA_API: &str = "api/data/v9.2";
const VALIDATION_API: &str = "api/data/v9.0";

/// Client for solution operations in one or more environments.
#[derive(Debug, Clone)]
pub struct SolutionClient {
    api: ApiClient,
}

impl SolutionClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn data_url(&self, environment_url: &str, path: &str) -> String {
        format!(
            "{}/{DATA_API}/{path}",
            environment_url.trim_end_matches('/')
        )
    }

    /// Import a solution archive into an environment.
    ///
    /// Runs the full staged pipeline and returns the installed solution.
    /// `settings` supplies per-environment component overrides applied
    /// at commit time.
    pub async fn import(
        &self,
        deadline: &Deadline,
        environment_url: &str,
        content: &[u8],
        settings: Option<&SolutionSettings>,
    ) -> Result<Solution, SolutionError> {
        if content.is_empty() {
            return Err(SolutionError::EmptyContent);
        }

        let staged = self.stage(deadline, environment_url, content).await?;
        let unique_name = staged.solution_details.solution_unique_name.clone();
        tracing::info!(
            unique_name = %unique_name,
            upload_id = %staged.upload_id,
            "Solution staged"
        );

        let committed = self
            .commit(deadline, environment_url, staged.upload_id, settings)
            .await?;
        tracing::info!(
            unique_name = %unique_name,
            operation_id = %committed.async_operation_id,
            job_key = %committed.import_job_key,
            "Solution import submitted"
        );

        self.wait_for_completion(deadline, environment_url, committed.async_operation_id)
            .await?;
        self.validate(deadline, environment_url, committed.import_job_key)
            .await?;

        let solution = self
            .solution_by_unique_name(deadline, environment_url, &unique_name)
            .await?;
        tracing::info!(
            unique_name = %unique_name,
            solution_id = %solution.id,
            "Solution import complete"
        );
        Ok(solution)
    }

    /// Stage the archive for validation; a non-passing status is a
    /// rejection carrying every reported finding.
    async fn stage(
        &self,
        deadline: &Deadline,
        environment_url: &str,
        content: &[u8],
    ) -> Result<dto::StageSolutionResults, SolutionError> {
        let request = StageSolutionRequest {
            customization_file: BASE64.encode(content),
        };
        let response = self
            .api
            .execute(
                deadline,
                Method::POST,
                &self.data_url(environment_url, "StageSolution"),
                None,
                Some(&request),
                &[StatusCode::OK],
            )
            .await?;
        let staged: StageSolutionResponse = response.decode()?;
        let results = staged.results;

        if results.status != "Passed" {
            return Err(SolutionError::StageRejected {
                status: results.status,
                missing_dependencies: results.missing_dependencies,
                validation_results: results.validation_results,
            });
        }
        Ok(results)
    }

    async fn commit(
        &self,
        deadline: &Deadline,
        environment_url: &str,
        upload_id: Uuid,
        settings: Option<&SolutionSettings>,
    ) -> Result<ImportSolutionResponse, SolutionError> {
        let request = ImportSolutionRequest {
            publish_workflows: true,
            overwrite_unmanaged_customizations: false,
            component_parameters: settings.and_then(|s| s.component_parameters()),
            solution_parameters: SolutionParameters {
                stage_solution_upload_id: upload_id,
            },
        };
        let response = self
            .api
            .execute(
                deadline,
                Method::POST,
                &self.data_url(environment_url, "ImportSolutionAsync"),
                None,
                Some(&request),
                &[StatusCode::OK],
            )
            .await?;
        Ok(response.decode()?)
    }

    /// Poll the async operation until its completion timestamp appears.
    async fn wait_for_completion(
        &self,
        deadline: &Deadline,
        environment_url: &str,
        operation_id: Uuid,
    ) -> Result<(), SolutionError> {
        let url = self.data_url(
            environment_url,
            &format!("asyncoperations({operation_id})"),
        );
        let url = url.as_str();
        let fetch = || async move {
            let response = self
                .api
                .execute::<()>(deadline, Method::GET, url, None, None, &[StatusCode::OK])
                .await?;
            response.decode::<AsyncOperationStatus>()
        };
        let classify = |status: &AsyncOperationStatus| {
            if status.is_complete() {
                StatusClass::Succeeded
            } else {
                StatusClass::Pending
            }
        };

        let terminal = lro::poll_until_terminal(
            deadline,
            self.api.config().api.poll_interval(),
            fetch,
            classify,
        )
        .await?;
        match terminal {
            Terminal::Succeeded(_) | Terminal::Failed(_) => Ok(()),
        }
    }

    /// Check the import job's result; warnings are logged, errors fail
    /// the import with every message the service produced.
    async fn validate(
        &self,
        deadline: &Deadline,
        environment_url: &str,
        job_key: Uuid,
    ) -> Result<(), SolutionError> {
        let url = format!(
            "{}/{VALIDATION_API}/RetrieveSolutionImportResult(ImportJobId={job_key})",
            environment_url.trim_end_matches('/')
        );
        let response = self
            .api
            .execute::<()>(deadline, Method::GET, &url, None, None, &[StatusCode::OK])
            .await?;
        let validation: ImportValidationResponse = response.decode()?;
        let result = validation.result;

        for warning in &result.warning_messages {
            tracing::warn!(job_key = %job_key, warning = %warning, "Solution import warning");
        }
        if result.status != "Passed" {
            return Err(SolutionError::ImportValidationFailed {
                status: result.status,
                error_messages: result.error_messages,
            });
        }
        Ok(())
    }

    /// List visible solutions, newest first.
    pub async fn solutions(
        &self,
        deadline: &Deadline,
        environment_url: &str,
    ) -> Result<Vec<Solution>, SolutionError> {
        self.query_solutions(deadline, environment_url, None).await
    }

    /// Resolve a solution by its unique name.
    ///
    /// An empty result is a hard error: after a successful import the
    /// solution must exist, so absence means the lookup key is wrong.
    pub async fn solution_by_unique_name(
        &self,
        deadline: &Deadline,
        environment_url: &str,
        unique_name: &str,
    ) -> Result<Solution, SolutionError> {
        let filter = format!("uniquename eq '{unique_name}'");
        let mut found = self
            .query_solutions(deadline, environment_url, Some(&filter))
            .await?;
        if found.is_empty() {
            return Err(SolutionError::NotFound(unique_name.to_string()));
        }
        Ok(found.swap_remove(0))
    }

    /// Resolve a solution by id.
    pub async fn solution_by_id(
        &self,
        deadline: &Deadline,
        environment_url: &str,
        id: Uuid,
    ) -> Result<Solution, SolutionError> {
        let filter = format!("solutionid eq {id}");
        let mut found = self
            .query_solutions(deadline, environment_url, Some(&filter))
            .await?;
        if found.is_empty() {
            return Err(SolutionError::NotFound(id.to_string()));
        }
        Ok(found.swap_remove(0))
    }

    /// Uninstall a solution.
    pub async fn delete_solution(
        &self,
        deadline: &Deadline,
        environment_url: &str,
        id: Uuid,
    ) -> Result<(), SolutionError> {
        self.api
            .execute::<()>(
                deadline,
                Method::DELETE,
                &self.data_url(environment_url, &format!("solutions({id})")),
                None,
                None,
                &[StatusCode::NO_CONTENT],
            )
            .await?;
        tracing::info!(solution_id = %id, "Solution deleted");
        Ok(())
    }

    async fn query_solutions(
        &self,
        deadline: &Deadline,
        environment_url: &str,
        filter: Option<&str>,
    ) -> Result<Vec<Solution>, SolutionError> {
        let base = self.data_url(environment_url, "solutions");
        let mut url = Url::parse(&base).map_err(|e| {
            SolutionError::Api(crate::api::ApiError::InvalidUrl {
                url: base.clone(),
                reason: e.to_string(),
            })
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("$expand", "publisherid");
            match filter {
                Some(filter) => query.append_pair("$filter", filter),
                None => query.append_pair("$filter", "(isvisible eq true)"),
            };
            query.append_pair("$orderby", "createdon desc");
        }

        let response = self
            .api
            .execute::<()>(
                deadline,
                Method::GET,
                url.as_str(),
                None,
                None,
                &[StatusCode::OK],
            )
            .await?;
        let list: SolutionList = response.decode()?;
        Ok(list.value)
    }
}
