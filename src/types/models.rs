// src/types/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account profile as returned by the auth endpoints. Replaced wholesale on
/// every profile fetch, never mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
}

/// Uploaded resume. The server assigns id, file_type and uploaded_at; the
/// client only ever creates (multipart upload), lists and deletes these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: i64,
    pub original_filename: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescription {
    pub id: i64,
    pub title: String,
    pub company: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a job description. Server fills in id/created_at.
#[derive(Debug, Clone, Serialize)]
pub struct NewJobDescription {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub description: String,
}

/// The scoring payload shared by a fresh analysis response and a history
/// entry. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub ats_score: u8,
    pub extracted_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommendations: String,
}

/// A stored analysis: the report plus snapshots of the resume and job
/// description it was computed from. Deleting either source later does not
/// retract this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub resume: Resume,
    pub job_description: JobDescription,
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardStats {
    pub total_resumes: u64,
    pub total_jobs: u64,
    pub total_analyses: u64,
    pub average_ats_score: f64,
    pub recent_analyses: Vec<AnalysisRecord>,
}
