//! Compact JSON output for scripting.

use serde_json::{Value, json};

use crate::markdown::truncate_preserving_math;
use crate::models::{Claim, PaginatedResponse, Review, SearchResponse, Source};
use crate::namespace::NamespaceNode;

/// Create a compact claim representation for JSON output.
///
/// `preview_chars` bounds the `content` field with the math-safe truncator;
/// `None` keeps the full body.
#[must_use]
pub fn compact_claim(claim: &Claim, preview_chars: Option<usize>) -> Value {
    let content = match preview_chars {
        Some(max) => truncate_preserving_math(&claim.content, max),
        None => claim.content.as_str().into(),
    };

    let mut obj = json!({
        "id": claim.id,
        "type": claim.claim_type.as_str(),
        "version": claim.version,
        "content": content,
    });

    if !claim.namespace_id.is_empty() {
        obj["namespace"] = json!(claim.namespace_id);
    }
    if !claim.status.is_empty() {
        obj["status"] = json!(claim.status);
    }
    if let Some(badge) = claim.verification_badge() {
        obj["verification"] = json!(badge);
    }
    if let Some(prev) = &claim.supersedes {
        obj["supersedes"] = json!(prev);
    }
    if !claim.created_at.is_empty() {
        obj["created"] = json!(claim.created_at);
    }

    obj
}

/// Compact review: verdict, confidence, reviewer name, optional comment.
#[must_use]
pub fn compact_review(review: &Review) -> Value {
    let mut obj = json!({
        "verdict": review.verdict,
        "confidence": review.confidence,
        "reviewer": review.reviewer.name,
    });
    if let Some(comment) = &review.comment {
        obj["comment"] = json!(comment);
    }
    obj
}

#[must_use]
pub fn compact_source(source: &Source) -> Value {
    let mut obj = json!({
        "id": source.id,
        "type": source.source_type,
        "title": source.title_or_default(),
    });
    if let Some(reference) = &source.external_ref {
        obj["ref"] = json!(reference);
    }
    obj
}

/// Page of claims with pagination metadata.
#[must_use]
pub fn format_claims_json(page: &PaginatedResponse<Claim>, preview_chars: usize) -> Value {
    json!({
        "total": page.total,
        "page": page.page(),
        "pages": page.total_pages(),
        "claims": page.items.iter().map(|c| compact_claim(c, Some(preview_chars))).collect::<Vec<_>>(),
    })
}

#[must_use]
pub fn format_search_json(results: &SearchResponse, preview_chars: usize) -> Value {
    json!({
        "query": results.query,
        "total": results.total,
        "results": results
            .results
            .iter()
            .map(|hit| {
                let mut obj = compact_claim(&hit.claim, Some(preview_chars));
                obj["rank"] = json!(hit.rank);
                obj
            })
            .collect::<Vec<_>>(),
    })
}

#[must_use]
pub fn format_sources_json(page: &PaginatedResponse<Source>) -> Value {
    json!({
        "total": page.total,
        "page": page.page(),
        "pages": page.total_pages(),
        "sources": page.items.iter().map(compact_source).collect::<Vec<_>>(),
    })
}

/// Namespace tree as a flat list carrying depth.
#[must_use]
pub fn format_namespace_tree_json(nodes: &[NamespaceNode<'_>]) -> Value {
    Value::Array(
        nodes
            .iter()
            .map(|node| {
                json!({
                    "id": node.namespace.id,
                    "name": node.namespace.name,
                    "parent": node.namespace.parent_id,
                    "depth": node.depth,
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClaimType;

    #[test]
    fn test_compact_claim() {
        let claim = Claim {
            id: "abc123".to_string(),
            version: 2,
            content: "Let $x$ be".to_string(),
            claim_type: ClaimType::Theorem,
            verification_level: Some("L6_FORMALLY_PROVEN".to_string()),
            ..Default::default()
        };

        let compact = compact_claim(&claim, None);

        assert_eq!(compact["id"], "abc123");
        assert_eq!(compact["type"], "theorem");
        assert_eq!(compact["version"], 2);
        assert_eq!(compact["content"], "Let $x$ be");
        assert_eq!(compact["verification"], "Formally Proven");
        assert!(compact.get("namespace").is_none());
    }

    #[test]
    fn test_compact_claim_preview_is_math_safe() {
        let claim = Claim { content: "Value $x + y$".to_string(), ..Default::default() };
        assert_eq!(compact_claim(&claim, Some(9))["content"], "Value...");
    }
}
