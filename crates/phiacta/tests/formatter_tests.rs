//! Formatter tests for markdown and JSON output.
//!
//! Tests output correctness and the math-safe previews in listings.

use phiacta::formatters::{
    self, ClaimDetail, format_claim_card, format_claim_detail_markdown, format_claims_markdown,
    format_namespace_tree_markdown, format_pagination, format_reviews_markdown,
    format_search_markdown, format_sources_markdown,
};
use phiacta::models::{
    Claim, ClaimType, ConfidenceStatus, Namespace, PaginatedResponse, PublicAgent, Relation,
    Review, ReviewerSummary, SearchResponse, SearchResultItem, Source,
};
use phiacta::namespace::build_namespace_tree;
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn make_claim(id: &str, content: &str) -> Claim {
    Claim {
        id: id.to_string(),
        version: 1,
        content: content.to_string(),
        claim_type: ClaimType::Theorem,
        status: "active".to_string(),
        created_at: "2024-03-01T12:30:00Z".to_string(),
        ..Default::default()
    }
}

fn make_review(verdict: &str, confidence: f64, comment: Option<&str>) -> Review {
    Review {
        id: "r1".to_string(),
        claim_id: "c1".to_string(),
        verdict: verdict.to_string(),
        confidence,
        comment: comment.map(str::to_string),
        reviewer: ReviewerSummary { name: "Ada".to_string(), ..Default::default() },
        ..Default::default()
    }
}

fn page_of<T>(items: Vec<T>, total: u64, limit: u64, offset: u64) -> PaginatedResponse<T> {
    PaginatedResponse { items, total, limit, offset }
}

// =============================================================================
// Claim cards
// =============================================================================

#[test]
fn test_card_preview_never_splits_math() {
    let content = format!("{} $$\\int_0^1 f(x)\\,dx$$ tail", "B".repeat(30));
    let card = format_claim_card(&make_claim("0123456789abcdef", &content), 35);

    assert!(card.contains(&format!("{}...", "B".repeat(30))));
    assert!(!card.contains("$$"));
}

#[test]
fn test_card_header_and_meta() {
    let mut claim = make_claim("0123456789abcdef", "Every even number is a sum of two primes.");
    claim.verification_level = Some("L2_EXECUTION_VERIFIED".to_string());
    claim.verification_status = Some("failed".to_string());

    let card = format_claim_card(&claim, 200);

    assert!(card.starts_with("`theorem` | `01234567` | **Execution Verified (Failed)** | active"));
    assert!(card.contains("Every even number is a sum of two primes."));
    assert!(card.contains("_v1 · 2024-03-01 12:30_"));
}

#[test]
fn test_card_flattens_block_markup() {
    let card = format_claim_card(&make_claim("c1", "## Lemma\n\n> quoted [link](http://x)"), 200);
    assert!(card.contains("Lemma quoted link"));
}

#[test]
fn test_claims_empty() {
    assert_eq!(format_claims_markdown(&PaginatedResponse::default(), 200), "No claims found.");
}

#[test]
fn test_claims_listing_with_pagination() {
    let page = page_of(vec![make_claim("c1", "one"), make_claim("c2", "two")], 45, 20, 20);
    let output = format_claims_markdown(&page, 200);

    assert!(output.starts_with("# Claims (45 total)"));
    assert_eq!(output.matches("---").count(), 2);
    assert!(output.contains("Page 2 of 3"));
    assert!(output.contains("`--page 1` for previous"));
    assert!(output.contains("`--page 3` for next"));
}

#[test]
fn test_pagination_single_page() {
    let page = page_of(vec![1, 2, 3], 3, 20, 0);
    assert_eq!(format_pagination(&page), "Page 1 of 1\n");
}

// =============================================================================
// Claim detail
// =============================================================================

#[test]
fn test_detail_shows_full_content_and_sections() {
    let long = format!("Proof: {} $x$", "z".repeat(500));
    let detail = ClaimDetail {
        claim: Claim {
            formal_content: Some("theorem t : 1 + 1 = 2 := rfl".to_string()),
            ..make_claim("c1", &long)
        },
        relations: vec![
            Relation {
                source_id: "c1".into(),
                target_id: "c2".into(),
                relation_type: "supports".into(),
                strength: 0.5,
                ..Default::default()
            },
            Relation {
                source_id: "c3".into(),
                target_id: "c1".into(),
                relation_type: "refutes".into(),
                strength: 1.0,
                ..Default::default()
            },
        ],
        confidence: Some(ConfidenceStatus {
            review_count: 2,
            endorsement_count: 1,
            dispute_count: 1,
            avg_endorsement_confidence: Some(0.8),
            epistemic_status: "contested".into(),
            ..Default::default()
        }),
        reviews: vec![make_review("endorse", 0.8, Some("Nice\nproof"))],
        ..Default::default()
    };

    let output = format_claim_detail_markdown(&detail);

    assert!(output.starts_with("# Theorem `c1`"));
    assert!(output.contains(&long));
    assert!(output.contains("## Formal statement"));
    assert!(output.contains("- → **supports** `c2` (strength 0.50)"));
    assert!(output.contains("- ← **refutes** `c3` (strength 1.00)"));
    assert!(output.contains("**Avg. confidence**: 80%"));
    assert!(output.contains("**Epistemic status**: contested"));
    assert!(output.contains("## Reviews (1)"));
    assert!(output.contains("  > Nice\n  > proof"));
}

#[test]
fn test_detail_shows_author() {
    let claim = Claim { created_by: "5d1e9a3c-77aa".to_string(), ..make_claim("c1", "Body") };
    let author = PublicAgent {
        id: claim.created_by.clone(),
        name: "Ada".to_string(),
        agent_type: "human".to_string(),
        trust_score: 0.85,
        ..Default::default()
    };

    let with_author = ClaimDetail {
        claim: claim.clone(),
        author: Some(author),
        ..Default::default()
    };
    assert!(format_claim_detail_markdown(&with_author).contains("**By**: Ada · human (trust 85%)"));

    let without = ClaimDetail { claim, ..Default::default() };
    assert!(format_claim_detail_markdown(&without).contains("**By**: `5d1e9a3c`"));
}

#[test]
fn test_reviews_empty() {
    assert_eq!(format_reviews_markdown(&[]), "## Reviews\n\nNo reviews yet.\n");
}

// =============================================================================
// Search, namespaces, sources
// =============================================================================

#[test]
fn test_search_results() {
    let results = SearchResponse {
        results: vec![SearchResultItem { claim: make_claim("c1", "Twin primes"), rank: 0.7 }],
        total: 1,
        query: "primes".to_string(),
    };
    let output = format_search_markdown(&results, 200);

    assert!(output.starts_with("# Search: \"primes\" (1 results)"));
    assert!(output.contains("### 1."));
    assert!(output.contains("Twin primes"));
}

#[test]
fn test_search_empty() {
    let results = SearchResponse { query: "nothing".to_string(), ..Default::default() };
    assert_eq!(format_search_markdown(&results, 200), "No claims match \"nothing\".");
}

#[test]
fn test_namespace_tree_indentation() {
    let namespaces = vec![
        Namespace { id: "m".into(), name: "math".into(), ..Default::default() },
        Namespace {
            id: "nt".into(),
            name: "number-theory".into(),
            parent_id: Some("m".into()),
            description: Some("Integers".into()),
            ..Default::default()
        },
    ];
    let tree = build_namespace_tree(&namespaces);
    let output = format_namespace_tree_markdown(&tree);

    assert!(output.contains("\n- **math** `m`\n"));
    assert!(output.contains("\n  - **number-theory** `nt`: Integers\n"));
}

#[test]
fn test_sources_listing() {
    let page = page_of(
        vec![Source {
            id: "s1".into(),
            source_type: "paper".into(),
            external_ref: Some("doi:10.1/x".into()),
            ..Default::default()
        }],
        1,
        50,
        0,
    );
    let output = format_sources_markdown(&page);

    assert!(output.contains("- **Untitled source** (paper) `doi:10.1/x`"));
    assert!(output.contains("Page 1 of 1"));
}

// =============================================================================
// JSON
// =============================================================================

#[test]
fn test_claims_json() {
    let page = page_of(vec![make_claim("c1", "Value $x + y$ here")], 1, 20, 0);
    let value = formatters::format_claims_json(&page, 9);

    assert_eq!(value["total"], 1);
    assert_eq!(value["pages"], 1);
    assert_eq!(value["claims"][0]["content"], "Value...");
}

#[test]
fn test_review_json() {
    let value = formatters::compact_review(&make_review("dispute", 0.4, None));
    assert_eq!(value, json!({"verdict": "dispute", "confidence": 0.4, "reviewer": "Ada"}));
}

#[test]
fn test_namespace_tree_json() {
    let namespaces = vec![
        Namespace { id: "a".into(), name: "A".into(), ..Default::default() },
        Namespace { id: "b".into(), name: "B".into(), parent_id: Some("a".into()), ..Default::default() },
    ];
    let value = formatters::format_namespace_tree_json(&build_namespace_tree(&namespaces));

    assert_eq!(value[1], json!({"id": "b", "name": "B", "parent": "a", "depth": 1}));
}
