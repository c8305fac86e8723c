use std::borrow::Cow;
use std::sync::Arc;

use harvest::{ApplicationFilters, HarvestClient, NoteVisibility};
use rmcp::model::ToolAnnotations;
use schemars::JsonSchema;
use serde_json::Value;

use super::{Tool, mutating_annotations, read_only_annotations};

pub(crate) struct ListApplications(pub(crate) Arc<HarvestClient>);

impl Tool for ListApplications {
    type Parameters = ApplicationFilters;

    fn name() -> &'static str {
        "list_applications"
    }

    fn description(&self) -> Cow<'_, str> {
        "Lists applications in Greenhouse. Filter by job, candidate, status or creation \
         date; results are paginated."
            .into()
    }

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    async fn call(&self, filters: Self::Parameters) -> harvest::Result<Value> {
        self.0.list_applications(&filters).await
    }
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
pub(crate) struct GetApplicationRequest {
    /// The ID of the application to retrieve.
    pub application_id: i64,
}

pub(crate) struct GetApplication(pub(crate) Arc<HarvestClient>);

impl Tool for GetApplication {
    type Parameters = GetApplicationRequest;

    fn name() -> &'static str {
        "get_application"
    }

    fn description(&self) -> Cow<'_, str> {
        "Gets a single application, including its current stage, status and source.".into()
    }

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    async fn call(&self, request: Self::Parameters) -> harvest::Result<Value> {
        self.0.get_application(request.application_id).await
    }
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
pub(crate) struct AdvanceApplicationRequest {
    /// The ID of the application to advance.
    pub application_id: i64,
    /// The application's current stage ID; must match the remote state.
    pub from_stage_id: i64,
    /// Target stage ID. When omitted, the application advances to the next
    /// configured stage of its pipeline.
    #[serde(default)]
    pub to_stage_id: Option<i64>,
}

pub(crate) struct AdvanceApplication(pub(crate) Arc<HarvestClient>);

impl Tool for AdvanceApplication {
    type Parameters = AdvanceApplicationRequest;

    fn name() -> &'static str {
        "advance_application"
    }

    fn description(&self) -> Cow<'_, str> {
        "Advances an application through the hiring pipeline, either to the next configured \
         stage or to an explicit target stage."
            .into()
    }

    fn annotations(&self) -> ToolAnnotations {
        mutating_annotations()
    }

    async fn call(&self, request: Self::Parameters) -> harvest::Result<Value> {
        log::debug!("Advancing application {}", request.application_id);

        self.0
            .advance_application(request.application_id, request.from_stage_id, request.to_stage_id)
            .await
    }
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
pub(crate) struct RejectApplicationRequest {
    /// The ID of the application to reject.
    pub application_id: i64,
    /// The ID of the rejection reason configured in Greenhouse.
    #[serde(default)]
    pub rejection_reason_id: Option<i64>,
    /// Free-text notes about the rejection.
    #[serde(default)]
    pub notes: Option<String>,
}

pub(crate) struct RejectApplication(pub(crate) Arc<HarvestClient>);

impl Tool for RejectApplication {
    type Parameters = RejectApplicationRequest;

    fn name() -> &'static str {
        "reject_application"
    }

    fn description(&self) -> Cow<'_, str> {
        "Rejects an application, optionally recording a rejection reason and notes.".into()
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new()
            .read_only(false)
            .destructive(true)
            .open_world(false)
    }

    async fn call(&self, request: Self::Parameters) -> harvest::Result<Value> {
        log::debug!("Rejecting application {}", request.application_id);

        self.0
            .reject_application(
                request.application_id,
                request.rejection_reason_id,
                request.notes.as_deref(),
            )
            .await
    }
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
pub(crate) struct AddApplicationNoteRequest {
    /// The ID of the application to annotate.
    pub application_id: i64,
    /// The note content.
    pub note: String,
    /// Who can see the note: admin_only, private (default) or public.
    #[serde(default)]
    pub visibility: NoteVisibility,
}

pub(crate) struct AddApplicationNote(pub(crate) Arc<HarvestClient>);

impl Tool for AddApplicationNote {
    type Parameters = AddApplicationNoteRequest;

    fn name() -> &'static str {
        "add_note_to_application"
    }

    fn description(&self) -> Cow<'_, str> {
        "Adds a note to an application.".into()
    }

    fn annotations(&self) -> ToolAnnotations {
        mutating_annotations()
    }

    async fn call(&self, request: Self::Parameters) -> harvest::Result<Value> {
        self.0
            .add_application_note(request.application_id, &request.note, request.visibility)
            .await
    }
}
