//! Resource orchestration against a scripted server: list normalization,
//! create-then-refetch, delete confirmation, and slot independence.

mod common;

use std::sync::Arc;

use cvmatch::api::ApiClient;
use cvmatch::resources::{Confirmation, ResourceOrchestrator};
use cvmatch::types::NewJobDescription;

use common::{analysis_record_json, job_json, resume_json, MockServer, Route};

fn orchestrator_for(server: &MockServer) -> ResourceOrchestrator {
    let api = Arc::new(ApiClient::new(server.base_url(), 5).unwrap());
    ResourceOrchestrator::new(api)
}

#[tokio::test]
async fn list_accepts_bare_and_paginated_shapes() {
    let bare = format!("[{}]", resume_json(1, "a.pdf"));
    let paginated = format!(
        r#"{{"count": 1, "next": null, "previous": null, "results": [{}]}}"#,
        job_json(2, "Engineer")
    );
    let server = MockServer::start(vec![
        Route::new("GET", "/api/resumes/").respond(200, &bare),
        Route::new("GET", "/api/job-descriptions/").respond(200, &paginated),
    ])
    .await;
    let mut resources = orchestrator_for(&server);

    resources.fetch_resumes().await;
    resources.fetch_jobs().await;

    assert_eq!(resources.resumes.items.len(), 1);
    assert_eq!(resources.resumes.items[0].original_filename, "a.pdf");
    assert_eq!(resources.jobs.items.len(), 1);
    assert_eq!(resources.jobs.items[0].title, "Engineer");
}

#[tokio::test]
async fn create_job_refetches_and_surfaces_server_assigned_id() {
    let created = job_json(42, "Senior Engineer");
    let listed = format!("[{}]", created);
    let server = MockServer::start(vec![
        Route::new("POST", "/api/job-descriptions/").respond(201, &created),
        Route::new("GET", "/api/job-descriptions/").respond(200, &listed),
    ])
    .await;
    let mut resources = orchestrator_for(&server);

    let job = NewJobDescription {
        title: "Senior Engineer".to_string(),
        company: None,
        description: "Rust".to_string(),
    };
    assert!(resources.create_job(&job).await);

    // The submitted payload had no id; the listed entry does.
    let requests = server.requests();
    let create_body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert!(create_body.get("id").is_none());
    assert_eq!(resources.jobs.items.len(), 1);
    assert_eq!(resources.jobs.items[0].id, 42);
}

#[tokio::test]
async fn create_job_failure_keeps_previous_list() {
    let listed = format!("[{}]", job_json(1, "Old job"));
    let server = MockServer::start(vec![
        Route::new("GET", "/api/job-descriptions/").respond(200, &listed),
        Route::new("POST", "/api/job-descriptions/").respond(400, r#"{"title": ["required"]}"#),
    ])
    .await;
    let mut resources = orchestrator_for(&server);
    resources.fetch_jobs().await;

    let job = NewJobDescription {
        title: String::new(),
        company: None,
        description: "Rust".to_string(),
    };
    assert!(!resources.create_job(&job).await);

    assert_eq!(resources.jobs.error.as_deref(), Some("Failed to save job description"));
    assert_eq!(resources.jobs.items.len(), 1);
    assert_eq!(resources.jobs.items[0].title, "Old job");
}

#[tokio::test]
async fn upload_resume_sends_multipart_file_field() {
    let created = resume_json(7, "resume.pdf");
    let listed = format!("[{}]", created);
    let server = MockServer::start(vec![
        Route::new("POST", "/api/resumes/").respond(201, &created),
        Route::new("GET", "/api/resumes/").respond(200, &listed),
    ])
    .await;
    let mut resources = orchestrator_for(&server);

    let uploaded = resources
        .upload_resume("resume.pdf", b"%PDF-1.4 fake content".to_vec())
        .await;
    assert!(uploaded);
    assert_eq!(resources.resumes.items.len(), 1);
    assert_eq!(resources.resumes.items[0].id, 7);

    let requests = server.requests();
    let upload = &requests[0];
    assert!(upload
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("multipart/form-data"));
    assert!(upload.body.contains("name=\"file\""));
    assert!(upload.body.contains("filename=\"resume.pdf\""));
    assert!(upload.body.contains("%PDF-1.4 fake content"));
}

#[tokio::test]
async fn upload_failure_surfaces_server_file_error() {
    let server = MockServer::start(vec![Route::new("POST", "/api/resumes/")
        .respond(400, r#"{"file": ["Only PDF and DOCX files are allowed"]}"#)])
    .await;
    let mut resources = orchestrator_for(&server);

    let uploaded = resources.upload_resume("notes.txt", b"hello".to_vec()).await;
    assert!(!uploaded);
    assert_eq!(
        resources.resumes.error.as_deref(),
        Some("Only PDF and DOCX files are allowed")
    );
    assert!(resources.resumes.items.is_empty());
}

#[tokio::test]
async fn delete_without_confirmation_issues_no_request() {
    let server = MockServer::start(vec![]).await;
    let mut resources = orchestrator_for(&server);

    assert!(!resources.delete_resume(5, Confirmation::Declined).await);
    assert!(!resources.delete_job(5, Confirmation::Declined).await);
    assert_eq!(server.request_count(), 0);
}

#[tokio::test]
async fn confirmed_delete_hits_the_id_path_and_refetches() {
    let server = MockServer::start(vec![
        Route::new("DELETE", "/api/resumes/5/").respond(204, ""),
        Route::new("GET", "/api/resumes/").respond(200, "[]"),
    ])
    .await;
    let mut resources = orchestrator_for(&server);

    assert!(resources.delete_resume(5, Confirmation::Confirmed).await);
    let requests = server.requests();
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/api/resumes/5/");
    assert_eq!(requests[1].method, "GET");
}

#[tokio::test]
async fn failed_analyses_fetch_leaves_other_slots_alone() {
    let listed = format!("[{}]", resume_json(1, "a.pdf"));
    let server = MockServer::start(vec![
        Route::new("GET", "/api/resumes/").respond(200, &listed),
        Route::new("GET", "/api/analyses/").respond(500, r#"{"detail": "boom"}"#),
    ])
    .await;
    let mut resources = orchestrator_for(&server);

    resources.fetch_resumes().await;
    resources.fetch_analyses().await;

    assert_eq!(
        resources.analyses.error.as_deref(),
        Some("Failed to load analysis history")
    );
    assert!(resources.analyses.items.is_empty());
    // The resume slot is untouched by the failure next door.
    assert!(resources.resumes.error.is_none());
    assert_eq!(resources.resumes.items.len(), 1);
    assert!(resources.jobs.error.is_none());
}

#[tokio::test]
async fn analyses_list_parses_history_records() {
    let listed = format!("[{}]", analysis_record_json(12, 3, 7, 82));
    let server =
        MockServer::start(vec![Route::new("GET", "/api/analyses/").respond(200, &listed)]).await;
    let mut resources = orchestrator_for(&server);

    resources.fetch_analyses().await;
    assert_eq!(resources.analyses.items.len(), 1);
    let record = &resources.analyses.items[0];
    assert_eq!(record.id, 12);
    assert_eq!(record.report.ats_score, 82);
    assert_eq!(record.resume.id, 3);
    assert_eq!(record.job_description.id, 7);
}
