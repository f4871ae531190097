//! Claim data models matching the Phiacta API schema.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ClaimType, verification_badge};

/// Free-form attributes attached to most records.
pub type Attrs = HashMap<String, serde_json::Value>;

/// A scientific claim: assertion, theorem, proof, and so on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,

    /// Stable identity shared by every version of this claim.
    #[serde(default)]
    pub lineage_id: String,

    #[serde(default)]
    pub version: i64,

    /// Markdown body, possibly containing `$...$` / `$$...$$` math.
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub claim_type: ClaimType,

    #[serde(default)]
    pub namespace_id: String,

    #[serde(default)]
    pub created_by: String,

    /// Machine-checkable statement (e.g. Lean), if any.
    #[serde(default)]
    pub formal_content: Option<String>,

    /// Claim this version replaces.
    #[serde(default)]
    pub supersedes: Option<String>,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub attrs: Attrs,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,

    #[serde(default)]
    pub verification_level: Option<String>,

    #[serde(default)]
    pub verification_status: Option<String>,
}

impl Claim {
    /// Verification badge text, if the claim has any verification data.
    #[must_use]
    pub fn verification_badge(&self) -> Option<String> {
        verification_badge(self.verification_level.as_deref(), self.verification_status.as_deref())
    }

    /// First eight characters of the id, for compact listings.
    #[must_use]
    pub fn short_id(&self) -> &str {
        short_id(&self.id)
    }
}

/// First eight characters of an id (whole id when shorter).
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(end, _)| &id[..end])
}

/// Typed edge between two claims.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relation {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub relation_type: String,
    #[serde(default)]
    pub strength: f64,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub source_provenance: Option<String>,
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Relation {
    /// The claim on the other end of this relation, seen from `claim_id`.
    #[must_use]
    pub fn other_end(&self, claim_id: &str) -> &str {
        if self.source_id == claim_id { &self.target_id } else { &self.source_id }
    }

    /// Whether `claim_id` is the source of this relation.
    #[must_use]
    pub fn is_outgoing_from(&self, claim_id: &str) -> bool {
        self.source_id == claim_id
    }
}

/// Aggregated review signal for a claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfidenceStatus {
    pub claim_id: String,
    #[serde(default)]
    pub lineage_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub claim_type: ClaimType,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub review_count: u64,
    #[serde(default)]
    pub avg_endorsement_confidence: Option<f64>,
    #[serde(default)]
    pub endorsement_count: u64,
    #[serde(default)]
    pub dispute_count: u64,
    #[serde(default)]
    pub epistemic_status: String,
}

/// Properties of a relation type in the claim graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeTypeInfo {
    #[serde(default)]
    pub is_transitive: bool,
    #[serde(default)]
    pub is_symmetric: bool,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub inverse_name: String,
}

/// A claim adjacent to another in the graph layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Neighbor {
    pub relation_id: String,
    pub neighbor_id: String,
    pub relation_type: String,
    #[serde(default)]
    pub strength: f64,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub edge_type_info: EdgeTypeInfo,
}

/// Response of the graph neighbors endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeighborsResponse {
    pub claim_id: String,
    #[serde(default)]
    pub neighbors: Vec<Neighbor>,
}

/// Code-verification state of a claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationStatus {
    pub claim_id: String,
    #[serde(default)]
    pub verification_level: Option<String>,
    #[serde(default)]
    pub verification_status: Option<String>,
    #[serde(default)]
    pub verification_result: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub verification_code: Option<String>,
    #[serde(default)]
    pub verification_runner_type: Option<String>,
}

impl VerificationStatus {
    #[must_use]
    pub fn badge(&self) -> Option<String> {
        verification_badge(self.verification_level.as_deref(), self.verification_status.as_deref())
    }
}

/// A submitted source document (paper, dataset, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub external_ref: Option<String>,
    #[serde(default)]
    pub content_hash: Option<String>,
    #[serde(default)]
    pub submitted_by: String,
    #[serde(default)]
    pub submitted_at: String,
    #[serde(default)]
    pub attrs: Attrs,
}

impl Source {
    /// Get the title, falling back to "Untitled source".
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled source")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_minimal_json() {
        let claim: Claim = serde_json::from_value(serde_json::json!({"id": "abc"})).unwrap();
        assert_eq!(claim.id, "abc");
        assert_eq!(claim.claim_type, ClaimType::Assertion);
        assert!(claim.verification_badge().is_none());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_relation_other_end() {
        let rel = Relation {
            source_id: "a".into(),
            target_id: "b".into(),
            ..Default::default()
        };
        assert_eq!(rel.other_end("a"), "b");
        assert_eq!(rel.other_end("b"), "a");
        assert!(rel.is_outgoing_from("a"));
    }
}
