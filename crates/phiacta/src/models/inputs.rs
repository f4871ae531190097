//! Request bodies and query filters sent to the Phiacta API.

use serde::{Deserialize, Serialize};

use super::{ClaimType, Verdict};
use crate::error::{AppError, AppResult};

/// Body of `POST /v1/claims`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewClaim {
    pub content: String,

    pub claim_type: ClaimType,

    /// Namespace name; omitted from the body when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl NewClaim {
    /// Build a claim submission, dropping a blank namespace.
    #[must_use]
    pub fn new(content: impl Into<String>, claim_type: ClaimType, namespace: Option<String>) -> Self {
        Self {
            content: content.into(),
            claim_type,
            namespace: namespace.filter(|ns| !ns.trim().is_empty()),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.content.trim().is_empty() {
            return Err(AppError::validation("content", "cannot be empty"));
        }
        if !ClaimType::SUBMITTABLE.contains(&self.claim_type) {
            return Err(AppError::validation("claim_type", "unsupported claim type"));
        }
        Ok(())
    }
}

/// Body of `POST /v1/claims/{id}/reviews`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub verdict: Verdict,

    /// Reviewer confidence in `[0, 1]`.
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Trimmed comment; blank comments are sent as `null`.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Confidence preselected for new reviews.
#[must_use]
pub fn default_confidence() -> f64 {
    0.8
}

impl Default for NewReview {
    fn default() -> Self {
        Self { verdict: Verdict::default(), confidence: default_confidence(), comment: None }
    }
}

impl NewReview {
    #[must_use]
    pub fn new(verdict: Verdict, confidence: f64, comment: Option<&str>) -> Self {
        let comment = comment.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string);
        Self { verdict, confidence, comment }
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(AppError::validation("confidence", "must be between 0 and 1"));
        }
        Ok(())
    }
}

/// Body of `POST /v1/claims/{id}/verify`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationSubmission {
    pub code_content: String,
    pub runner_type: String,
}

impl VerificationSubmission {
    pub fn validate(&self) -> AppResult<()> {
        if self.code_content.trim().is_empty() {
            return Err(AppError::validation("code_content", "cannot be empty"));
        }
        if self.runner_type.trim().is_empty() {
            return Err(AppError::validation("runner_type", "cannot be empty"));
        }
        Ok(())
    }
}

/// Body of `POST /v1/auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.email.trim().is_empty() {
            return Err(AppError::validation("email", "cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(AppError::validation("password", "cannot be empty"));
        }
        Ok(())
    }
}

/// Body of `POST /v1/auth/register`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name", "cannot be empty"));
        }
        LoginRequest { email: self.email.clone(), password: self.password.clone() }.validate()
    }
}

/// Optional filters for `GET /v1/claims`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimFilters {
    pub namespace_id: Option<String>,
    pub claim_type: Option<ClaimType>,
}

impl ClaimFilters {
    /// Query parameters for the non-empty filters.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(ns) = self.namespace_id.as_deref().filter(|ns| !ns.is_empty()) {
            params.push(("namespace_id".to_string(), ns.to_string()));
        }
        if let Some(kind) = &self.claim_type {
            params.push(("claim_type".to_string(), kind.as_str().to_string()));
        }
        params
    }
}
