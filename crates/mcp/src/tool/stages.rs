use std::borrow::Cow;
use std::sync::Arc;

use harvest::{HarvestClient, JobStageFilters};
use rmcp::model::ToolAnnotations;
use schemars::JsonSchema;
use serde_json::Value;

use super::{Tool, read_only_annotations};

pub(crate) struct ListJobStages(pub(crate) Arc<HarvestClient>);

impl Tool for ListJobStages {
    type Parameters = JobStageFilters;

    fn name() -> &'static str {
        "list_job_stages"
    }

    fn description(&self) -> Cow<'_, str> {
        "Lists hiring pipeline stages, either across all jobs or for one job when job_id \
         is given. Useful for finding stage IDs before advancing an application."
            .into()
    }

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    async fn call(&self, filters: Self::Parameters) -> harvest::Result<Value> {
        self.0.list_job_stages(&filters).await
    }
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
pub(crate) struct GetJobStageRequest {
    /// The ID of the job stage to retrieve.
    pub stage_id: i64,
}

pub(crate) struct GetJobStage(pub(crate) Arc<HarvestClient>);

impl Tool for GetJobStage {
    type Parameters = GetJobStageRequest;

    fn name() -> &'static str {
        "get_job_stage"
    }

    fn description(&self) -> Cow<'_, str> {
        "Gets a single job stage with its interviews and configuration.".into()
    }

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    async fn call(&self, request: Self::Parameters) -> harvest::Result<Value> {
        self.0.get_job_stage(request.stage_id).await
    }
}
