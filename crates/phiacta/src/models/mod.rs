//! Data models for Phiacta API entities.
//!
//! Records mirror the API 1:1 (`snake_case` on the wire) and use
//! `#[serde(default)]` so partial responses still parse.

mod agent;
mod claim;
mod enums;
mod inputs;
mod namespace;
mod page;

pub use agent::{Agent, AuthResponse, PublicAgent, Review, ReviewerSummary, has_reviewed};
pub use claim::{
    Attrs, Claim, ConfidenceStatus, EdgeTypeInfo, Neighbor, NeighborsResponse, Relation, Source,
    VerificationStatus, short_id,
};
pub use enums::{ClaimType, ResponseFormat, Verdict, VerificationLevel, verification_badge};
pub use inputs::{
    ClaimFilters, LoginRequest, NewClaim, NewReview, RegisterRequest, VerificationSubmission,
    default_confidence,
};
pub use namespace::Namespace;
pub use page::{PaginatedResponse, SearchResponse, SearchResultItem, page_offset};
