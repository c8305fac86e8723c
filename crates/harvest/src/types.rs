//! Wire-shaped parameter types for Harvest endpoints.
//!
//! These derive both `Deserialize` and `JsonSchema` so the MCP tool layer can
//! expose them directly as tool parameter schemas; the client turns them into
//! query pairs or JSON bodies.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

/// Pagination controls shared by all list endpoints.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Pagination {
    /// Number of results per page (max 500).
    pub per_page: u32,
    /// Page number to retrieve, starting at 1.
    pub page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { per_page: 50, page: 1 }
    }
}

impl Pagination {
    pub(crate) fn push_query(&self, query: &mut Vec<(&'static str, String)>) {
        query.push(("per_page", self.per_page.to_string()));
        query.push(("page", self.page.to_string()));
    }
}

/// Filters for listing jobs.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct JobFilters {
    /// Pagination controls.
    #[serde(flatten)]
    pub pagination: Pagination,
    /// Filter by job status: open, closed, or draft.
    pub status: Option<String>,
    /// ISO 8601 timestamp; only return jobs created after it.
    pub created_after: Option<String>,
    /// ISO 8601 timestamp; only return jobs created before it.
    pub created_before: Option<String>,
}

impl JobFilters {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        self.pagination.push_query(&mut query);

        if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        if let Some(created_after) = &self.created_after {
            query.push(("created_after", created_after.clone()));
        }
        if let Some(created_before) = &self.created_before {
            query.push(("created_before", created_before.clone()));
        }

        query
    }
}

/// Filters for listing candidates.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CandidateFilters {
    /// Pagination controls.
    #[serde(flatten)]
    pub pagination: Pagination,
    /// Filter by candidate email address.
    pub email: Option<String>,
    /// Return only these candidate IDs.
    pub candidate_ids: Option<Vec<i64>>,
    /// ISO 8601 timestamp; only return candidates created after it.
    pub created_after: Option<String>,
    /// ISO 8601 timestamp; only return candidates created before it.
    pub created_before: Option<String>,
}

impl CandidateFilters {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        self.pagination.push_query(&mut query);

        if let Some(email) = &self.email {
            query.push(("email", email.clone()));
        }
        if let Some(ids) = &self.candidate_ids {
            let joined = ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
            query.push(("candidate_ids", joined));
        }
        if let Some(created_after) = &self.created_after {
            query.push(("created_after", created_after.clone()));
        }
        if let Some(created_before) = &self.created_before {
            query.push(("created_before", created_before.clone()));
        }

        query
    }
}

/// Filters for listing applications.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ApplicationFilters {
    /// Pagination controls.
    #[serde(flatten)]
    pub pagination: Pagination,
    /// Filter by the job applied to.
    pub job_id: Option<i64>,
    /// Filter by the applying candidate.
    pub candidate_id: Option<i64>,
    /// Filter by application status (active, rejected, hired).
    pub status: Option<String>,
    /// ISO 8601 timestamp; only return applications created after it.
    pub created_after: Option<String>,
    /// ISO 8601 timestamp; only return applications created before it.
    pub created_before: Option<String>,
}

impl ApplicationFilters {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        self.pagination.push_query(&mut query);

        if let Some(job_id) = self.job_id {
            query.push(("job_id", job_id.to_string()));
        }
        if let Some(candidate_id) = self.candidate_id {
            query.push(("candidate_id", candidate_id.to_string()));
        }
        if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        if let Some(created_after) = &self.created_after {
            query.push(("created_after", created_after.clone()));
        }
        if let Some(created_before) = &self.created_before {
            query.push(("created_before", created_before.clone()));
        }

        query
    }
}

/// Filters for listing job stages.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct JobStageFilters {
    /// Pagination controls.
    #[serde(flatten)]
    pub pagination: Pagination,
    /// Restrict to the pipeline stages of one job.
    pub job_id: Option<i64>,
    /// ISO 8601 timestamp; only return stages created after it.
    pub created_after: Option<String>,
    /// ISO 8601 timestamp; only return stages created before it.
    pub created_before: Option<String>,
}

impl JobStageFilters {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        self.pagination.push_query(&mut query);

        if let Some(created_after) = &self.created_after {
            query.push(("created_after", created_after.clone()));
        }
        if let Some(created_before) = &self.created_before {
            query.push(("created_before", created_before.clone()));
        }

        query
    }
}

/// Filters for listing users.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UserFilters {
    /// Pagination controls.
    #[serde(flatten)]
    pub pagination: Pagination,
    /// Filter by user email address.
    pub email: Option<String>,
}

impl UserFilters {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        self.pagination.push_query(&mut query);

        if let Some(email) = &self.email {
            query.push(("email", email.clone()));
        }

        query
    }
}

/// Visibility of a note in the activity feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoteVisibility {
    /// Visible to site admins only.
    AdminOnly,
    /// Visible to users with access to the candidate.
    #[default]
    Private,
    /// Visible to everyone.
    Public,
}

impl NoteVisibility {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::AdminOnly => "admin_only",
            Self::Private => "private",
            Self::Public => "public",
        }
    }
}

/// Fields for creating a candidate.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NewCandidate {
    /// The candidate's first name.
    pub first_name: String,
    /// The candidate's last name.
    pub last_name: String,
    /// Personal email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Mobile phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Current company.
    #[serde(default)]
    pub company: Option<String>,
    /// Current job title.
    #[serde(default)]
    pub title: Option<String>,
    /// Tags to apply to the candidate.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl NewCandidate {
    pub(crate) fn body(&self) -> Value {
        let mut body = json!({
            "first_name": self.first_name,
            "last_name": self.last_name,
        });

        append_contact_fields(
            &mut body,
            self.email.as_deref(),
            self.phone.as_deref(),
            self.company.as_deref(),
            self.title.as_deref(),
            self.tags.as_deref(),
        );

        body
    }
}

/// Fields for updating a candidate. Only the provided fields are sent.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CandidateUpdate {
    /// Updated first name.
    pub first_name: Option<String>,
    /// Updated last name.
    pub last_name: Option<String>,
    /// Updated personal email address.
    pub email: Option<String>,
    /// Updated mobile phone number.
    pub phone: Option<String>,
    /// Updated company.
    pub company: Option<String>,
    /// Updated job title.
    pub title: Option<String>,
    /// Updated list of tags.
    pub tags: Option<Vec<String>>,
}

impl CandidateUpdate {
    pub(crate) fn body(&self) -> Value {
        let mut body = json!({});

        if let Some(first_name) = &self.first_name {
            body["first_name"] = json!(first_name);
        }
        if let Some(last_name) = &self.last_name {
            body["last_name"] = json!(last_name);
        }

        append_contact_fields(
            &mut body,
            self.email.as_deref(),
            self.phone.as_deref(),
            self.company.as_deref(),
            self.title.as_deref(),
            self.tags.as_deref(),
        );

        body
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.title.is_none()
            && self.tags.is_none()
    }
}

// Harvest expects contact details as typed address lists.
fn append_contact_fields(
    body: &mut Value,
    email: Option<&str>,
    phone: Option<&str>,
    company: Option<&str>,
    title: Option<&str>,
    tags: Option<&[String]>,
) {
    if let Some(email) = email {
        body["email_addresses"] = json!([{ "value": email, "type": "personal" }]);
    }
    if let Some(phone) = phone {
        body["phone_numbers"] = json!([{ "value": phone, "type": "mobile" }]);
    }
    if let Some(company) = company {
        body["company"] = json!(company);
    }
    if let Some(title) = title {
        body["title"] = json!(title);
    }
    if let Some(tags) = tags {
        body["tags"] = json!(tags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let filters: JobFilters = serde_json::from_value(json!({})).unwrap();

        assert_eq!(
            filters.query(),
            vec![("per_page", "50".to_string()), ("page", "1".to_string())]
        );
    }

    #[test]
    fn candidate_ids_join_comma_separated() {
        let filters: CandidateFilters = serde_json::from_value(json!({
            "candidate_ids": [1, 2, 3]
        }))
        .unwrap();

        let query = filters.query();
        assert!(query.contains(&("candidate_ids", "1,2,3".to_string())));
    }

    #[test]
    fn new_candidate_body_shapes_contact_fields() {
        let candidate: NewCandidate = serde_json::from_value(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone": "555-0100",
            "tags": ["engineering"]
        }))
        .unwrap();

        assert_eq!(
            candidate.body(),
            json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email_addresses": [{ "value": "ada@example.com", "type": "personal" }],
                "phone_numbers": [{ "value": "555-0100", "type": "mobile" }],
                "tags": ["engineering"]
            })
        );
    }

    #[test]
    fn update_only_sends_provided_fields() {
        let update: CandidateUpdate = serde_json::from_value(json!({
            "title": "Staff Engineer"
        }))
        .unwrap();

        assert_eq!(update.body(), json!({ "title": "Staff Engineer" }));
        assert!(!update.is_empty());
        assert!(CandidateUpdate::default().is_empty());
    }

    #[test]
    fn note_visibility_wire_values() {
        assert_eq!(NoteVisibility::AdminOnly.as_str(), "admin_only");

        let visibility: NoteVisibility = serde_json::from_value(json!("public")).unwrap();
        assert_eq!(visibility, NoteVisibility::Public);
    }
}
