mod applications;
mod candidates;
mod jobs;
mod organization;
mod stages;

use std::borrow::Cow;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use harvest::HarvestClient;
use rmcp::model::{CallToolResult, Content, ErrorCode, ErrorData, JsonObject, ToolAnnotations};
use schemars::{JsonSchema, schema_for};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) use applications::{
    AddApplicationNote, AdvanceApplication, GetApplication, ListApplications, RejectApplication,
};
pub(crate) use candidates::{
    AddCandidateNote, CreateCandidate, GetCandidate, ListCandidates, UpdateCandidate,
};
pub(crate) use jobs::{GetJob, ListJobs};
pub(crate) use organization::{ListDepartments, ListOffices, ListUsers};
pub(crate) use stages::{GetJobStage, ListJobStages};

/// The full tool surface, in the order it is listed to clients.
pub(crate) fn all(client: Arc<HarvestClient>) -> Vec<Box<dyn RmcpTool>> {
    vec![
        Box::new(ListJobs(client.clone())),
        Box::new(GetJob(client.clone())),
        Box::new(ListCandidates(client.clone())),
        Box::new(GetCandidate(client.clone())),
        Box::new(CreateCandidate(client.clone())),
        Box::new(UpdateCandidate(client.clone())),
        Box::new(AddCandidateNote(client.clone())),
        Box::new(ListApplications(client.clone())),
        Box::new(GetApplication(client.clone())),
        Box::new(AdvanceApplication(client.clone())),
        Box::new(RejectApplication(client.clone())),
        Box::new(AddApplicationNote(client.clone())),
        Box::new(ListJobStages(client.clone())),
        Box::new(GetJobStage(client.clone())),
        Box::new(ListDepartments(client.clone())),
        Box::new(ListOffices(client.clone())),
        Box::new(ListUsers(client)),
    ]
}

pub(crate) trait Tool: Send + Sync + 'static {
    type Parameters: DeserializeOwned + JsonSchema;

    fn name() -> &'static str;
    fn description(&self) -> Cow<'_, str>;
    fn annotations(&self) -> ToolAnnotations;

    fn call(
        &self,
        parameters: Self::Parameters,
    ) -> impl Future<Output = harvest::Result<Value>> + Send;
}

pub(crate) trait RmcpTool: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn to_tool(&self) -> rmcp::model::Tool;

    fn call(&self, parameters: Option<JsonObject>) -> BoxFuture<'_, Result<CallToolResult, ErrorData>>;
}

impl<T: Tool> RmcpTool for T {
    fn name(&self) -> &str {
        T::name()
    }

    fn to_tool(&self) -> rmcp::model::Tool {
        let Value::Object(schema) = serde_json::to_value(schema_for!(<T as Tool>::Parameters))
            .unwrap_or_default()
        else {
            unreachable!("parameter schemas are objects")
        };

        rmcp::model::Tool::new(self.name().to_string(), self.description().into_owned(), schema)
            .annotate(self.annotations())
    }

    fn call(&self, parameters: Option<JsonObject>) -> BoxFuture<'_, Result<CallToolResult, ErrorData>> {
        Box::pin(async move {
            let parameters: T::Parameters =
                serde_json::from_value(Value::Object(parameters.unwrap_or_default()))
                    .map_err(|err| ErrorData::new(ErrorCode::INVALID_PARAMS, err.to_string(), None))?;

            match Tool::call(self, parameters).await {
                Ok(value) => {
                    let content = Content::json(value).map_err(|err| {
                        ErrorData::new(ErrorCode::INTERNAL_ERROR, err.to_string(), None)
                    })?;

                    Ok(CallToolResult::success(vec![content]))
                }
                // Terminal errors carry the operation name so callers can act on them.
                Err(err) => {
                    let code = match &err {
                        harvest::HarvestError::InvalidParameters(_) => ErrorCode::INVALID_PARAMS,
                        _ => ErrorCode::INTERNAL_ERROR,
                    };

                    Err(ErrorData::new(code, format!("{}: {err}", T::name()), None))
                }
            }
        })
    }
}

/// Annotations shared by all read-only listing and fetch tools.
fn read_only_annotations() -> ToolAnnotations {
    ToolAnnotations::new()
        .read_only(true)
        .idempotent(true)
        .destructive(false)
        .open_world(false)
}

/// Annotations shared by tools that write to the remote system.
fn mutating_annotations() -> ToolAnnotations {
    ToolAnnotations::new()
        .read_only(false)
        .destructive(false)
        .open_world(false)
}
