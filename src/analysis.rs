// src/analysis.rs
//! The analysis submission state machine: pick a resume and a job
//! description, submit the pair, land on a frozen result or an error.

use std::sync::Arc;
use tracing::{error, info};

use crate::api::ApiClient;
use crate::resources::{fetch_list, ResourceState, JOB_DESCRIPTIONS_ENDPOINT, RESUMES_ENDPOINT};
use crate::types::{AnalysisRecord, AnalyzeRequest, JobDescription, Resume};

const ANALYZE_ENDPOINT: &str = "/api/analyze/";

const SELECTION_ERROR: &str = "Please select both a resume and job description";
const SUBMIT_FALLBACK: &str = "Failed to analyze resume";

#[derive(Debug)]
pub enum AnalysisPhase {
    Idle,
    Submitting,
    /// Frozen snapshot of the response payload; never refetched.
    Complete(AnalysisRecord),
    Failed(String),
}

pub struct AnalysisWorkflow {
    api: Arc<ApiClient>,
    pub resumes: ResourceState<Resume>,
    pub jobs: ResourceState<JobDescription>,
    selected_resume: Option<i64>,
    selected_job: Option<i64>,
    phase: AnalysisPhase,
}

impl AnalysisWorkflow {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            resumes: ResourceState::default(),
            jobs: ResourceState::default(),
            selected_resume: None,
            selected_job: None,
            phase: AnalysisPhase::Idle,
        }
    }

    pub fn phase(&self) -> &AnalysisPhase {
        &self.phase
    }

    pub fn selection(&self) -> (Option<i64>, Option<i64>) {
        (self.selected_resume, self.selected_job)
    }

    pub fn select_resume(&mut self, id: Option<i64>) {
        self.selected_resume = id;
    }

    pub fn select_job(&mut self, id: Option<i64>) {
        self.selected_job = id;
    }

    /// Workflow entry: both option lists load concurrently; each failure
    /// lands only in its own slot.
    pub async fn load_choices(&mut self) {
        self.resumes.begin();
        self.jobs.begin();

        let (resumes, jobs) = tokio::join!(
            fetch_list::<Resume>(&self.api, RESUMES_ENDPOINT),
            fetch_list::<JobDescription>(&self.api, JOB_DESCRIPTIONS_ENDPOINT),
        );

        match resumes {
            Ok(items) => self.resumes.succeed(items),
            Err(e) => {
                error!("Error fetching resumes: {}", e);
                self.resumes.fail("Failed to load resumes");
            }
        }
        match jobs {
            Ok(items) => self.jobs.succeed(items),
            Err(e) => {
                error!("Error fetching job descriptions: {}", e);
                self.jobs.fail("Failed to load job descriptions");
            }
        }
    }

    /// Submit the selected pair. An incomplete selection fails locally
    /// before any request goes out. While a submission is in flight the
    /// workflow is exclusively borrowed, so resubmission cannot race it.
    pub async fn submit(&mut self) {
        let (Some(resume_id), Some(job_id)) = (self.selected_resume, self.selected_job) else {
            self.phase = AnalysisPhase::Failed(SELECTION_ERROR.to_string());
            return;
        };

        self.phase = AnalysisPhase::Submitting;
        let request = AnalyzeRequest {
            resume_id,
            job_description_id: job_id,
        };
        match self
            .api
            .post_json::<_, AnalysisRecord>(ANALYZE_ENDPOINT, &request)
            .await
        {
            Ok(record) => {
                info!(
                    "Analysis {} scored {} for resume {}",
                    record.id, record.report.ats_score, resume_id
                );
                self.phase = AnalysisPhase::Complete(record);
            }
            Err(e) => {
                error!("Error submitting analysis: {}", e);
                let message = e.detail().unwrap_or_else(|| SUBMIT_FALLBACK.to_string());
                self.phase = AnalysisPhase::Failed(message);
            }
        }
    }

    /// "New analysis": drop the result and the selection, back to a fresh
    /// idle state.
    pub fn reset(&mut self) {
        self.selected_resume = None;
        self.selected_job = None;
        self.phase = AnalysisPhase::Idle;
    }
}
