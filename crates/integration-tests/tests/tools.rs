//! End-to-end tests of the tool surface against a mock Harvest API.

use indoc::formatdoc;
use integration_tests::{McpTestClient, TestServer, json_content, mock::MockHarvest};
use serde_json::json;

async fn start(mock: &MockHarvest) -> McpTestClient {
    let config = formatdoc! {r#"
        [harvest]
        api_key = "test-key"
        base_url = "{base_url}"
        request_timeout = "5s"
        max_retries = 3
    "#, base_url = mock.base_url()};

    TestServer::start(&config).await.mcp_client().await
}

#[tokio::test(flavor = "multi_thread")]
async fn lists_the_full_tool_surface() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let mut names: Vec<_> = mcp
        .list_tools()
        .await
        .tools
        .into_iter()
        .map(|tool| tool.name.to_string())
        .collect();

    names.sort();

    insta::assert_debug_snapshot!(names, @r#"
    [
        "add_note_to_application",
        "add_note_to_candidate",
        "advance_application",
        "create_candidate",
        "get_application",
        "get_candidate",
        "get_job",
        "get_job_stage",
        "list_applications",
        "list_candidates",
        "list_departments",
        "list_job_stages",
        "list_jobs",
        "list_offices",
        "list_users",
        "reject_application",
        "update_candidate",
    ]
    "#);

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn server_info_names_the_remote() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let info = mcp.get_server_info();
    assert_eq!(info.server_info.name, "Greenhouse Harvest");
    assert!(info.instructions.as_deref().unwrap_or_default().contains("Greenhouse"));

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn list_jobs_passes_the_remote_payload_through() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let result = mcp.call_tool("list_jobs", json!({ "status": "open" })).await;
    let jobs = json_content(&result);

    assert_eq!(jobs[0]["id"], 1001);
    assert_eq!(jobs[0]["name"], "Staff Engineer");
    assert_eq!(jobs.as_array().unwrap().len(), 2);

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn create_then_get_candidate_round_trip() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let created = mcp
        .call_tool(
            "create_candidate",
            json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "tags": ["engineering"]
            }),
        )
        .await;

    let created = json_content(&created);
    let id = created["id"].as_i64().unwrap();

    let fetched = mcp.call_tool("get_candidate", json!({ "candidate_id": id })).await;
    let fetched = json_content(&fetched);

    assert_eq!(fetched["id"], id);
    assert_eq!(fetched["first_name"], "Ada");
    assert_eq!(fetched["last_name"], "Lovelace");
    assert_eq!(fetched["email_addresses"][0]["value"], "ada@example.com");
    assert_eq!(fetched["tags"][0], "engineering");

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn update_candidate_changes_only_provided_fields() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let created = mcp
        .call_tool(
            "create_candidate",
            json!({ "first_name": "Grace", "last_name": "Hopper", "title": "Engineer" }),
        )
        .await;

    let id = json_content(&created)["id"].as_i64().unwrap();

    let updated = mcp
        .call_tool(
            "update_candidate",
            json!({ "candidate_id": id, "title": "Rear Admiral" }),
        )
        .await;

    let updated = json_content(&updated);
    assert_eq!(updated["title"], "Rear Admiral");
    assert_eq!(updated["first_name"], "Grace");

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn advance_without_target_moves_to_the_next_stage() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let result = mcp
        .call_tool(
            "advance_application",
            json!({ "application_id": 11111, "from_stage_id": 2001 }),
        )
        .await;

    let application = json_content(&result);
    assert_eq!(application["id"], 11111);
    assert_eq!(application["current_stage"]["id"], 2002);

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn advance_honors_an_explicit_target_stage() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let result = mcp
        .call_tool(
            "advance_application",
            json!({ "application_id": 11111, "from_stage_id": 2001, "to_stage_id": 2003 }),
        )
        .await;

    assert_eq!(json_content(&result)["current_stage"]["id"], 2003);

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn reject_application_reflects_status_and_reason() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let result = mcp
        .call_tool(
            "reject_application",
            json!({ "application_id": 67890, "rejection_reason_id": 8, "notes": "culture fit" }),
        )
        .await;

    let application = json_content(&result);
    assert_eq!(application["id"], 67890);
    assert_eq!(application["status"], "rejected");
    assert_eq!(application["rejection_reason"]["id"], 8);
    assert_eq!(application["rejection_details"]["notes"], "culture fit");

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn notes_carry_body_and_visibility() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let result = mcp
        .call_tool(
            "add_note_to_candidate",
            json!({ "candidate_id": 9000, "note": "Strong systems background", "visibility": "admin_only" }),
        )
        .await;

    let note = json_content(&result);
    assert_eq!(note["body"], "Strong systems background");
    assert_eq!(note["visibility"], "admin_only");

    let result = mcp
        .call_tool(
            "add_note_to_application",
            json!({ "application_id": 11111, "note": "Moved after debrief" }),
        )
        .await;

    // Visibility defaults to private.
    assert_eq!(json_content(&result)["visibility"], "private");

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn job_stages_listing_and_lookup() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let scoped = mcp.call_tool("list_job_stages", json!({ "job_id": 1001 })).await;
    let scoped = json_content(&scoped);
    assert_eq!(scoped.as_array().unwrap().len(), 3);
    assert_eq!(scoped[0]["job_id"], 1001);

    let global = mcp.call_tool("list_job_stages", json!({})).await;
    assert_eq!(json_content(&global).as_array().unwrap().len(), 2);

    let stage = mcp.call_tool("get_job_stage", json!({ "stage_id": 2002 })).await;
    assert_eq!(json_content(&stage)["id"], 2002);

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn org_listings_return_remote_data() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let departments = mcp.call_tool("list_departments", json!({})).await;
    assert_eq!(json_content(&departments)[0]["name"], "Engineering");

    let offices = mcp.call_tool("list_offices", json!({ "per_page": 10, "page": 2 })).await;
    assert_eq!(json_content(&offices)[1]["name"], "New York");

    let users = mcp
        .call_tool("list_users", json!({ "email": "recruiter@example.com" }))
        .await;
    assert_eq!(json_content(&users)[0]["id"], 42);

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_note_is_rejected_without_a_remote_call() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let error = mcp
        .call_tool_expect_error(
            "add_note_to_candidate",
            json!({ "candidate_id": 9000, "note": "   " }),
        )
        .await;

    assert!(error.to_string().contains("note must not be empty"));
    assert_eq!(mock.hit_count(), 0);

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_tool_is_reported() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let error = mcp.call_tool_expect_error("fire_everyone", json!({})).await;
    assert!(error.to_string().contains("Unknown tool"));

    mcp.disconnect().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_required_parameter_is_an_invalid_params_error() {
    let mock = MockHarvest::start().await;
    let mcp = start(&mock).await;

    let error = mcp.call_tool_expect_error("get_job", json!({})).await;
    assert!(error.to_string().contains("job_id"));
    assert_eq!(mock.hit_count(), 0);

    mcp.disconnect().await;
}
