// src/resources.rs
//! Coordinated fetch/create/delete for the three server-side collections.
//! Each resource type has its own loading/error/items slot, so a failure on
//! one collection never blocks or clears another.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::{ApiClient, ApiError};
use crate::types::{
    AnalysisRecord, DashboardStats, JobDescription, ListResponse, NewJobDescription, Resume,
};

pub(crate) const RESUMES_ENDPOINT: &str = "/api/resumes/";
pub(crate) const JOB_DESCRIPTIONS_ENDPOINT: &str = "/api/job-descriptions/";
const ANALYSES_ENDPOINT: &str = "/api/analyses/";
const DASHBOARD_STATS_ENDPOINT: &str = "/api/dashboard/stats/";

const UPLOAD_FIELD: &str = "file";

/// View state of one collection. On failure the previous items stay put;
/// only the message changes.
#[derive(Debug)]
pub struct ResourceState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T> ResourceState<T> {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn succeed(&mut self, items: Vec<T>) {
        self.loading = false;
        self.items = items;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }
}

/// Deletion is destructive, so the orchestrator demands an explicit answer
/// from whatever UI asked the user. `Declined` never reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// Fetch a collection, accepting either a bare array or a paginated
/// envelope.
pub(crate) async fn fetch_list<T>(api: &ApiClient, endpoint: &str) -> Result<Vec<T>, ApiError>
where
    T: DeserializeOwned,
{
    api.get::<ListResponse<T>>(endpoint)
        .await
        .map(ListResponse::into_items)
}

pub struct ResourceOrchestrator {
    api: Arc<ApiClient>,
    pub resumes: ResourceState<Resume>,
    pub jobs: ResourceState<JobDescription>,
    pub analyses: ResourceState<AnalysisRecord>,
}

impl ResourceOrchestrator {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            resumes: ResourceState::default(),
            jobs: ResourceState::default(),
            analyses: ResourceState::default(),
        }
    }

    pub async fn fetch_resumes(&mut self) {
        self.resumes.begin();
        match fetch_list::<Resume>(&self.api, RESUMES_ENDPOINT).await {
            Ok(items) => self.resumes.succeed(items),
            Err(e) => {
                error!("Error fetching resumes: {}", e);
                self.resumes.fail("Failed to load resumes");
            }
        }
    }

    /// Upload is create specialized for binary content: multipart `file`
    /// field, no local type/size validation. On success the list is
    /// refetched so the caller sees the server-assigned id and timestamps
    /// instead of an echo of the payload.
    pub async fn upload_resume(&mut self, file_name: &str, bytes: Vec<u8>) -> bool {
        self.resumes.begin();
        match self
            .api
            .post_multipart::<Resume>(RESUMES_ENDPOINT, UPLOAD_FIELD, file_name, bytes)
            .await
        {
            Ok(created) => {
                info!("Uploaded resume {} as id {}", file_name, created.id);
                self.fetch_resumes().await;
                true
            }
            Err(e) => {
                error!("Error uploading resume: {}", e);
                let message = e
                    .field_message(UPLOAD_FIELD)
                    .unwrap_or_else(|| "Failed to upload resume".to_string());
                self.resumes.fail(message);
                false
            }
        }
    }

    pub async fn delete_resume(&mut self, id: i64, confirmation: Confirmation) -> bool {
        if confirmation != Confirmation::Confirmed {
            return false;
        }
        match self
            .api
            .delete(&format!("{}{}/", RESUMES_ENDPOINT, id))
            .await
        {
            Ok(()) => {
                self.fetch_resumes().await;
                true
            }
            Err(e) => {
                error!("Error deleting resume {}: {}", id, e);
                self.resumes.fail("Failed to delete resume");
                false
            }
        }
    }

    pub async fn fetch_jobs(&mut self) {
        self.jobs.begin();
        match fetch_list::<JobDescription>(&self.api, JOB_DESCRIPTIONS_ENDPOINT).await {
            Ok(items) => self.jobs.succeed(items),
            Err(e) => {
                error!("Error fetching job descriptions: {}", e);
                self.jobs.fail("Failed to load job descriptions");
            }
        }
    }

    pub async fn create_job(&mut self, job: &NewJobDescription) -> bool {
        self.jobs.begin();
        match self
            .api
            .post_json::<_, JobDescription>(JOB_DESCRIPTIONS_ENDPOINT, job)
            .await
        {
            Ok(created) => {
                info!("Saved job description '{}' as id {}", created.title, created.id);
                self.fetch_jobs().await;
                true
            }
            Err(e) => {
                error!("Error saving job description: {}", e);
                self.jobs.fail("Failed to save job description");
                false
            }
        }
    }

    pub async fn delete_job(&mut self, id: i64, confirmation: Confirmation) -> bool {
        if confirmation != Confirmation::Confirmed {
            return false;
        }
        match self
            .api
            .delete(&format!("{}{}/", JOB_DESCRIPTIONS_ENDPOINT, id))
            .await
        {
            Ok(()) => {
                self.fetch_jobs().await;
                true
            }
            Err(e) => {
                error!("Error deleting job description {}: {}", id, e);
                self.jobs.fail("Failed to delete job description");
                false
            }
        }
    }

    /// Analysis history is list-only on the client: records are created
    /// through the analysis workflow and the server keeps them immutable.
    pub async fn fetch_analyses(&mut self) {
        self.analyses.begin();
        match fetch_list::<AnalysisRecord>(&self.api, ANALYSES_ENDPOINT).await {
            Ok(items) => self.analyses.succeed(items),
            Err(e) => {
                error!("Error fetching analyses: {}", e);
                self.analyses.fail("Failed to load analysis history");
            }
        }
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.api.get::<DashboardStats>(DASHBOARD_STATS_ENDPOINT).await
    }
}
