use std::borrow::Cow;
use std::sync::Arc;

use harvest::{HarvestClient, Pagination, UserFilters};
use rmcp::model::ToolAnnotations;
use serde_json::Value;

use super::{Tool, read_only_annotations};

pub(crate) struct ListDepartments(pub(crate) Arc<HarvestClient>);

impl Tool for ListDepartments {
    type Parameters = Pagination;

    fn name() -> &'static str {
        "list_departments"
    }

    fn description(&self) -> Cow<'_, str> {
        "Lists the organization's departments.".into()
    }

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    async fn call(&self, pagination: Self::Parameters) -> harvest::Result<Value> {
        self.0.list_departments(&pagination).await
    }
}

pub(crate) struct ListOffices(pub(crate) Arc<HarvestClient>);

impl Tool for ListOffices {
    type Parameters = Pagination;

    fn name() -> &'static str {
        "list_offices"
    }

    fn description(&self) -> Cow<'_, str> {
        "Lists the organization's offices.".into()
    }

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    async fn call(&self, pagination: Self::Parameters) -> harvest::Result<Value> {
        self.0.list_offices(&pagination).await
    }
}

pub(crate) struct ListUsers(pub(crate) Arc<HarvestClient>);

impl Tool for ListUsers {
    type Parameters = UserFilters;

    fn name() -> &'static str {
        "list_users"
    }

    fn description(&self) -> Cow<'_, str> {
        "Lists Greenhouse users, optionally filtered by email address.".into()
    }

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    async fn call(&self, filters: Self::Parameters) -> harvest::Result<Value> {
        self.0.list_users(&filters).await
    }
}
