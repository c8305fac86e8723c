use std::borrow::Cow;
use std::sync::Arc;

use harvest::{CandidateFilters, CandidateUpdate, HarvestClient, NewCandidate, NoteVisibility};
use rmcp::model::ToolAnnotations;
use schemars::JsonSchema;
use serde_json::Value;

use super::{Tool, mutating_annotations, read_only_annotations};

pub(crate) struct ListCandidates(pub(crate) Arc<HarvestClient>);

impl Tool for ListCandidates {
    type Parameters = CandidateFilters;

    fn name() -> &'static str {
        "list_candidates"
    }

    fn description(&self) -> Cow<'_, str> {
        "Lists candidates in Greenhouse. Filter by email, specific candidate IDs, or \
         creation date; results are paginated."
            .into()
    }

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    async fn call(&self, filters: Self::Parameters) -> harvest::Result<Value> {
        self.0.list_candidates(&filters).await
    }
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
pub(crate) struct GetCandidateRequest {
    /// The ID of the candidate to retrieve.
    pub candidate_id: i64,
}

pub(crate) struct GetCandidate(pub(crate) Arc<HarvestClient>);

impl Tool for GetCandidate {
    type Parameters = GetCandidateRequest;

    fn name() -> &'static str {
        "get_candidate"
    }

    fn description(&self) -> Cow<'_, str> {
        "Gets a single candidate with full details: contact information, applications, tags \
         and custom fields."
            .into()
    }

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    async fn call(&self, request: Self::Parameters) -> harvest::Result<Value> {
        self.0.get_candidate(request.candidate_id).await
    }
}

pub(crate) struct CreateCandidate(pub(crate) Arc<HarvestClient>);

impl Tool for CreateCandidate {
    type Parameters = NewCandidate;

    fn name() -> &'static str {
        "create_candidate"
    }

    fn description(&self) -> Cow<'_, str> {
        "Creates a new candidate in Greenhouse. Requires first and last name; email, phone, \
         company, title and tags are optional."
            .into()
    }

    fn annotations(&self) -> ToolAnnotations {
        mutating_annotations()
    }

    async fn call(&self, candidate: Self::Parameters) -> harvest::Result<Value> {
        log::debug!("Creating candidate {} {}", candidate.first_name, candidate.last_name);
        self.0.create_candidate(&candidate).await
    }
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
pub(crate) struct UpdateCandidateRequest {
    /// The ID of the candidate to update.
    pub candidate_id: i64,
    /// The fields to change; anything omitted is left untouched.
    #[serde(flatten)]
    pub update: CandidateUpdate,
}

pub(crate) struct UpdateCandidate(pub(crate) Arc<HarvestClient>);

impl Tool for UpdateCandidate {
    type Parameters = UpdateCandidateRequest;

    fn name() -> &'static str {
        "update_candidate"
    }

    fn description(&self) -> Cow<'_, str> {
        "Updates an existing candidate. Only the provided fields are changed.".into()
    }

    fn annotations(&self) -> ToolAnnotations {
        mutating_annotations()
    }

    async fn call(&self, request: Self::Parameters) -> harvest::Result<Value> {
        self.0.update_candidate(request.candidate_id, &request.update).await
    }
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
pub(crate) struct AddCandidateNoteRequest {
    /// The ID of the candidate to annotate.
    pub candidate_id: i64,
    /// The note content.
    pub note: String,
    /// Who can see the note: admin_only, private (default) or public.
    #[serde(default)]
    pub visibility: NoteVisibility,
}

pub(crate) struct AddCandidateNote(pub(crate) Arc<HarvestClient>);

impl Tool for AddCandidateNote {
    type Parameters = AddCandidateNoteRequest;

    fn name() -> &'static str {
        "add_note_to_candidate"
    }

    fn description(&self) -> Cow<'_, str> {
        "Adds a note to a candidate's activity feed.".into()
    }

    fn annotations(&self) -> ToolAnnotations {
        mutating_annotations()
    }

    async fn call(&self, request: Self::Parameters) -> harvest::Result<Value> {
        self.0
            .add_candidate_note(request.candidate_id, &request.note, request.visibility)
            .await
    }
}
