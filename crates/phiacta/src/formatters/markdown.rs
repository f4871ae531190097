//! Markdown output formatting.

use crate::markdown::compact_preview;
use crate::models::{
    Claim, ConfidenceStatus, NeighborsResponse, PaginatedResponse, PublicAgent, Relation, Review,
    SearchResponse, Source, VerificationStatus, short_id,
};
use crate::namespace::NamespaceNode;

use super::format_date;

/// Format a page of claims as Markdown cards.
#[must_use]
pub fn format_claims_markdown(page: &PaginatedResponse<Claim>, preview_chars: usize) -> String {
    if page.items.is_empty() {
        return "No claims found.".to_string();
    }

    let mut output = format!("# Claims ({} total)\n\n", page.total);

    for claim in &page.items {
        output.push_str(&format_claim_card(claim, preview_chars));
        output.push_str("\n---\n\n");
    }

    output.push_str(&format_pagination(page));
    output
}

/// Format one claim as a compact card.
///
/// The preview never ends inside a math span, so it renders cleanly.
#[must_use]
pub fn format_claim_card(claim: &Claim, preview_chars: usize) -> String {
    let mut output = String::new();

    let mut header = vec![format!("`{}`", claim.claim_type), format!("`{}`", claim.short_id())];
    if let Some(badge) = claim.verification_badge() {
        header.push(format!("**{badge}**"));
    }
    if !claim.status.is_empty() {
        header.push(claim.status.clone());
    }
    output.push_str(&format!("{}\n\n", header.join(" | ")));

    output.push_str(&compact_preview(&claim.content, preview_chars));
    output.push_str("\n\n");

    let mut meta = vec![format!("v{}", claim.version)];
    if !claim.created_at.is_empty() {
        meta.push(format_date(&claim.created_at));
    }
    output.push_str(&format!("_{}_\n", meta.join(" · ")));

    output
}

/// Pagination footer ("Page X of Y").
#[must_use]
pub fn format_pagination<T>(page: &PaginatedResponse<T>) -> String {
    let mut parts = vec![format!("Page {} of {}", page.page(), page.total_pages())];
    if page.has_previous() {
        parts.push(format!("`--page {}` for previous", page.page() - 1));
    }
    if page.has_next() {
        parts.push(format!("`--page {}` for next", page.page() + 1));
    }
    format!("{}\n", parts.join(" · "))
}

/// Everything shown on a claim's detail view.
#[derive(Debug, Clone, Default)]
pub struct ClaimDetail {
    pub claim: Claim,
    pub relations: Vec<Relation>,
    pub confidence: Option<ConfidenceStatus>,
    pub verification: Option<VerificationStatus>,
    pub neighbors: Option<NeighborsResponse>,
    pub reviews: Vec<Review>,
    pub author: Option<PublicAgent>,
}

fn format_author(author: &PublicAgent) -> String {
    let mut line = format!("**By**: {}", author.name);
    if !author.agent_type.is_empty() {
        line.push_str(&format!(" · {}", author.agent_type));
    }
    line.push_str(&format!(" (trust {:.0}%)", author.trust_score * 100.0));
    line
}

/// Format the full detail view of a claim.
#[must_use]
pub fn format_claim_detail_markdown(detail: &ClaimDetail) -> String {
    let claim = &detail.claim;
    let mut output = format!("# {} `{}`\n\n", capitalize(claim.claim_type.as_str()), claim.id);

    let mut meta = vec![format!("**Version**: {}", claim.version)];
    if let Some(author) = &detail.author {
        meta.push(format_author(author));
    } else if !claim.created_by.is_empty() {
        meta.push(format!("**By**: `{}`", short_id(&claim.created_by)));
    }
    if !claim.status.is_empty() {
        meta.push(format!("**Status**: {}", claim.status));
    }
    if !claim.created_at.is_empty() {
        meta.push(format!("**Created**: {}", format_date(&claim.created_at)));
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    if let Some(prev) = &claim.supersedes {
        output.push_str(&format!("**Supersedes**: `{prev}`\n\n"));
    }

    // Full content, not truncated
    output.push_str(&claim.content);
    output.push_str("\n\n");

    if let Some(formal) = claim.formal_content.as_deref().filter(|f| !f.trim().is_empty()) {
        output.push_str(&format!("## Formal statement\n\n```\n{formal}\n```\n\n"));
    }

    let badge = detail
        .verification
        .as_ref()
        .and_then(VerificationStatus::badge)
        .or_else(|| claim.verification_badge());
    if let Some(badge) = badge {
        output.push_str(&format!("## Verification\n\n**{badge}**"));
        if let Some(runner) =
            detail.verification.as_ref().and_then(|v| v.verification_runner_type.as_deref())
        {
            output.push_str(&format!(" (runner: {runner})"));
        }
        output.push_str("\n\n");
    }

    if let Some(confidence) = &detail.confidence {
        output.push_str(&format_confidence(confidence));
    }

    if !detail.relations.is_empty() {
        output.push_str(&format!("## Relations ({})\n\n", detail.relations.len()));
        for relation in &detail.relations {
            let arrow = if relation.is_outgoing_from(&claim.id) { "→" } else { "←" };
            output.push_str(&format!(
                "- {arrow} **{}** `{}` (strength {:.2})\n",
                relation.relation_type,
                relation.other_end(&claim.id),
                relation.strength
            ));
        }
        output.push('\n');
    }

    if let Some(neighbors) = detail.neighbors.as_ref().filter(|n| !n.neighbors.is_empty()) {
        output.push_str(&format!("## Graph neighbors ({})\n\n", neighbors.neighbors.len()));
        for n in &neighbors.neighbors {
            output.push_str(&format!(
                "- {} **{}** `{}`\n",
                n.direction, n.relation_type, n.neighbor_id
            ));
        }
        output.push('\n');
    }

    output.push_str(&format_reviews_markdown(&detail.reviews));
    output
}

fn format_confidence(confidence: &ConfidenceStatus) -> String {
    let mut output = String::from("## Confidence\n\n");

    let mut parts = vec![
        format!("**Reviews**: {}", confidence.review_count),
        format!("**Endorsements**: {}", confidence.endorsement_count),
        format!("**Disputes**: {}", confidence.dispute_count),
    ];
    if let Some(avg) = confidence.avg_endorsement_confidence {
        parts.push(format!("**Avg. confidence**: {:.0}%", avg * 100.0));
    }
    output.push_str(&format!("{}\n\n", parts.join(" | ")));

    if !confidence.epistemic_status.is_empty() {
        output.push_str(&format!("**Epistemic status**: {}\n\n", confidence.epistemic_status));
    }

    output
}

/// Format a claim's reviews.
#[must_use]
pub fn format_reviews_markdown(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return "## Reviews\n\nNo reviews yet.\n".to_string();
    }

    let mut output = format!("## Reviews ({})\n\n", reviews.len());
    for review in reviews {
        output.push_str(&format!(
            "- **{}** ({}% confidence) by {}",
            review.verdict,
            review.confidence_percent(),
            review.reviewer.name
        ));
        if !review.created_at.is_empty() {
            output.push_str(&format!(", {}", format_date(&review.created_at)));
        }
        output.push('\n');
        if let Some(comment) = &review.comment {
            output.push_str(&format!("  > {}\n", comment.replace('\n', "\n  > ")));
        }
    }

    output
}

/// Format search results as Markdown cards.
#[must_use]
pub fn format_search_markdown(results: &SearchResponse, preview_chars: usize) -> String {
    if results.results.is_empty() {
        return format!("No claims match \"{}\".", results.query);
    }

    let mut output =
        format!("# Search: \"{}\" ({} results)\n\n", results.query, results.total);
    for (i, hit) in results.results.iter().enumerate() {
        output.push_str(&format!("### {}.\n\n", i + 1));
        output.push_str(&format_claim_card(&hit.claim, preview_chars));
        output.push_str("\n---\n\n");
    }

    output
}

/// Format the namespace tree, indented by depth.
#[must_use]
pub fn format_namespace_tree_markdown(nodes: &[NamespaceNode<'_>]) -> String {
    if nodes.is_empty() {
        return "No namespaces found.".to_string();
    }

    let mut output = format!("# Namespaces ({})\n\n", nodes.len());
    for node in nodes {
        let indent = "  ".repeat(node.depth);
        output.push_str(&format!("{indent}- **{}** `{}`", node.namespace.name, node.namespace.id));
        if let Some(desc) = node.namespace.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(&format!(": {desc}"));
        }
        output.push('\n');
    }

    output
}

/// Format a page of sources.
#[must_use]
pub fn format_sources_markdown(page: &PaginatedResponse<Source>) -> String {
    if page.items.is_empty() {
        return "No sources found.".to_string();
    }

    let mut output = format!("# Sources ({} total)\n\n", page.total);
    for source in &page.items {
        output.push_str(&format!("- **{}** ({})", source.title_or_default(), source.source_type));
        if let Some(reference) = &source.external_ref {
            output.push_str(&format!(" `{reference}`"));
        }
        if !source.submitted_at.is_empty() {
            output.push_str(&format!(", {}", format_date(&source.submitted_at)));
        }
        output.push('\n');
    }
    output.push('\n');
    output.push_str(&format_pagination(page));

    output
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}
