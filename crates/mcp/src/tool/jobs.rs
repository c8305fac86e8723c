use std::borrow::Cow;
use std::sync::Arc;

use harvest::{HarvestClient, JobFilters};
use rmcp::model::ToolAnnotations;
use schemars::JsonSchema;
use serde_json::Value;

use super::{Tool, read_only_annotations};

pub(crate) struct ListJobs(pub(crate) Arc<HarvestClient>);

impl Tool for ListJobs {
    type Parameters = JobFilters;

    fn name() -> &'static str {
        "list_jobs"
    }

    fn description(&self) -> Cow<'_, str> {
        "Lists jobs in Greenhouse, with optional status and creation-date filters. \
         Results are paginated; pass per_page (max 500) and page to walk through them."
            .into()
    }

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    async fn call(&self, filters: Self::Parameters) -> harvest::Result<Value> {
        self.0.list_jobs(&filters).await
    }
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
pub(crate) struct GetJobRequest {
    /// The ID of the job to retrieve.
    pub job_id: i64,
}

pub(crate) struct GetJob(pub(crate) Arc<HarvestClient>);

impl Tool for GetJob {
    type Parameters = GetJobRequest;

    fn name() -> &'static str {
        "get_job"
    }

    fn description(&self) -> Cow<'_, str> {
        "Gets a single job with its full details, including departments, offices and hiring team.".into()
    }

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    async fn call(&self, request: Self::Parameters) -> harvest::Result<Value> {
        self.0.get_job(request.job_id).await
    }
}
