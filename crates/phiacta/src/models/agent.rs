//! Agents (human or AI contributors), reviews and auth responses.

use serde::{Deserialize, Serialize};

/// The signed-in agent, as returned by the auth endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub agent_type: String,
    #[serde(default)]
    pub trust_score: f64,
    #[serde(default)]
    pub created_at: String,
}

/// An agent as visible to other users (no email).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicAgent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub agent_type: String,
    #[serde(default)]
    pub trust_score: f64,
    #[serde(default)]
    pub created_at: String,
}

/// Reviewer summary embedded in a [`Review`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewerSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub agent_type: String,
    #[serde(default)]
    pub trust_score: f64,
}

/// A reviewer's verdict on a claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub claim_id: String,
    /// `endorse`, `dispute` or `neutral`; kept as a string so new verdicts parse.
    pub verdict: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub reviewer: ReviewerSummary,
}

impl Review {
    /// Confidence as a whole percentage.
    #[must_use]
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

/// Whether `agent_id` already reviewed, given a claim's reviews.
#[must_use]
pub fn has_reviewed(reviews: &[Review], agent_id: &str) -> bool {
    reviews.iter().any(|r| r.reviewer.id == agent_id)
}

/// Response of the login and register endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub agent: Agent,
}

fn default_token_type() -> String {
    "bearer".to_string()
}
