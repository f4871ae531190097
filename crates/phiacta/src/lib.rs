//! Phiacta client
//!
//! Command-line and library client for the Phiacta scientific claims
//! platform: browse, search, submit and review claims (assertions, theorems,
//! proofs) against the Phiacta API.
//!
//! # Features
//!
//! - **Math-safe previews**: claim bodies are truncated without ever cutting
//!   inside a `$...$` or `$$...$$` span
//! - **Async client**: Tokio + reqwest with retries and a short-lived cache
//! - **Sessions**: bearer token persisted between invocations
//! - **Health proxy**: small Axum server relaying the backend health check
//!
//! # Example
//!
//! ```no_run
//! use phiacta::{client::PhiactaClient, config::Config, models::ClaimFilters};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = PhiactaClient::new(config)?;
//!
//!     let page = client.list_claims(20, 0, &ClaimFilters::default()).await?;
//!     for claim in &page.items {
//!         println!("{}", phiacta::markdown::compact_preview(&claim.content, 80));
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod markdown;
pub mod models;
pub mod namespace;
pub mod server;

pub use client::PhiactaClient;
pub use config::Config;
pub use error::{AppError, ClientError};
pub use markdown::truncate_preserving_math;
