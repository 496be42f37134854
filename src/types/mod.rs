// src/types/mod.rs
//! Wire types shared across the client: resource models and endpoint
//! request/response shapes.

pub mod models;
pub mod response;

pub use models::{
    AnalysisRecord, AnalysisReport, DashboardStats, JobDescription, NewJobDescription, Resume, User,
};
pub use response::{AnalyzeRequest, AuthResponse, ListResponse, TokenPair};
