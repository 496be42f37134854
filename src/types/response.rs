// src/types/response.rs
use serde::{Deserialize, Serialize};

use crate::types::models::User;

/// Access/refresh credential pair issued by login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Success shape of both auth endpoints.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub tokens: TokenPair,
    pub user: User,
}

/// Request body for the analyze endpoint. Ids are the server's integer
/// identifiers.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub resume_id: i64,
    pub job_description_id: i64,
}

/// List endpoints answer with either a bare array or a paginated envelope.
/// Normalized here so callers only ever see the items.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Paginated { results } => results,
            ListResponse::Bare(items) => items,
        }
    }
}
