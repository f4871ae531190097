//! Phiacta CLI - Entry Point
//!
//! Browse, search, submit and review claims from the terminal, or run the
//! health proxy with `phiacta serve`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use phiacta::config::{Config, display};
use phiacta::error::{AppError, AppResult};
use phiacta::formatters::{
    ClaimDetail, compact_claim, compact_review, format_claim_detail_markdown,
    format_claims_json, format_claims_markdown, format_namespace_tree_json,
    format_namespace_tree_markdown, format_search_json, format_search_markdown,
    format_sources_json, format_sources_markdown,
};
use phiacta::markdown::{compact_preview, truncate_preserving_math};
use phiacta::models::{
    ClaimFilters, ClaimType, LoginRequest, NewClaim, NewReview, RegisterRequest, ResponseFormat,
    Verdict, VerificationSubmission, default_confidence, has_reviewed, page_offset,
};
use phiacta::namespace::build_namespace_tree;
use phiacta::{PhiactaClient, server};

#[derive(Parser, Debug)]
#[command(name = "phiacta")]
#[command(about = "Command-line client for the Phiacta claims platform")]
#[command(version)]
struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "PHIACTA_API_URL")]
    api_url: Option<String>,

    /// Where the session token is stored
    #[arg(long, global = true, env = "PHIACTA_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Output format: markdown or json
    #[arg(long, global = true, default_value = "markdown")]
    format: ResponseFormat,

    /// Characters kept in claim previews
    #[arg(long, global = true, env = "PHIACTA_PREVIEW_CHARS")]
    preview_chars: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List claims, newest first
    Claims {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = display::CLAIMS_PAGE_SIZE)]
        limit: u64,
        /// Only claims in this namespace (id)
        #[arg(long)]
        namespace: Option<String>,
        /// Only claims of this type
        #[arg(long = "type")]
        claim_type: Option<ClaimType>,
    },
    /// Show a claim with its relations, confidence and reviews
    Show { id: String },
    /// Full-text search over claims
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show the namespace tree
    Namespaces,
    /// List submitted sources
    Sources {
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    /// Truncate Markdown without breaking math spans
    Truncate {
        /// Maximum length in characters (defaults to the preview length)
        #[arg(long)]
        max: Option<usize>,
        /// Also flatten block syntax into a one-line preview
        #[arg(long)]
        compact: bool,
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PHIACTA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PHIACTA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show the signed-in agent
    Whoami,
    /// Submit a new claim
    Submit {
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the claim body from a file
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long = "type", default_value = "assertion")]
        claim_type: ClaimType,
        /// Namespace name
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Review a claim
    Review {
        id: String,
        #[arg(long)]
        verdict: Verdict,
        #[arg(long, default_value_t = default_confidence())]
        confidence: f64,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Attach code to a claim for verification
    Verify {
        id: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        runner: String,
    },
    /// Check that the backend is reachable
    Health,
    /// Run the health proxy server
    Serve {
        #[arg(long, default_value = "3000", env = "PORT")]
        port: u16,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // stdout carries command output
    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    if let Some(path) = cli.token_file.clone() {
        config.token_path = path;
    }
    if let Some(chars) = cli.preview_chars {
        config.preview_chars = chars;
    }
    config.validate()?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        api_url = %config.api_url,
        "Starting phiacta"
    );

    if let Command::Serve { port } = cli.command {
        let client = PhiactaClient::for_server(&config)?;
        return server::run_http(client, port).await;
    }

    let client = PhiactaClient::new(config.clone())?;
    let ctx = Context { client, format: cli.format, preview_chars: config.preview_chars };

    match run(cli.command, &ctx).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("Error: {}", e.to_user_message());
            std::process::exit(1);
        }
    }
}

struct Context {
    client: PhiactaClient,
    format: ResponseFormat,
    preview_chars: usize,
}

async fn run(command: Command, ctx: &Context) -> AppResult<String> {
    let client = &ctx.client;

    match command {
        Command::Claims { page, limit, namespace, claim_type } => {
            if limit == 0 {
                return Err(AppError::validation("limit", "must be positive"));
            }
            let filters = ClaimFilters { namespace_id: namespace, claim_type };
            let claims = client.list_claims(limit, page_offset(page, limit), &filters).await?;
            render(ctx, format_claims_markdown(&claims, ctx.preview_chars), || {
                format_claims_json(&claims, ctx.preview_chars)
            })
        }

        Command::Show { id } => show_claim(ctx, &id).await,

        Command::Search { query } => {
            let query = query.join(" ");
            if query.trim().is_empty() {
                return Err(AppError::validation("query", "cannot be empty"));
            }
            let results = client.search_claims(query.trim()).await?;
            render(ctx, format_search_markdown(&results, ctx.preview_chars), || {
                format_search_json(&results, ctx.preview_chars)
            })
        }

        Command::Namespaces => {
            let namespaces = client.list_namespaces().await?;
            let tree = build_namespace_tree(&namespaces.items);
            render(ctx, format_namespace_tree_markdown(&tree), || format_namespace_tree_json(&tree))
        }

        Command::Sources { page } => {
            let limit = display::SOURCES_PAGE_SIZE;
            let sources = client.list_sources(limit, page_offset(page, limit)).await?;
            render(ctx, format_sources_markdown(&sources), || format_sources_json(&sources))
        }

        Command::Truncate { max, compact, file } => {
            let input = read_input(file.as_ref()).await?;
            let max = max.unwrap_or(ctx.preview_chars);
            Ok(if compact {
                compact_preview(&input, max)
            } else {
                truncate_preserving_math(&input, max).into_owned()
            })
        }

        Command::Login { email, password } => {
            let request = LoginRequest { email, password: password.unwrap_or_default() };
            request.validate()?;
            let auth = client.login(&request.email, &request.password).await?;
            Ok(format!("Signed in as {}.", auth.agent.name))
        }

        Command::Register { name, email, password } => {
            let request = RegisterRequest { name, email, password: password.unwrap_or_default() };
            request.validate()?;
            let auth = client.register(&request.name, &request.email, &request.password).await?;
            Ok(format!("Welcome, {}. You are signed in.", auth.agent.name))
        }

        Command::Logout => {
            client.logout().await?;
            tracing::info!(path = %client.tokens().path().display(), "Removed session token");
            Ok("Signed out.".to_string())
        }

        Command::Whoami => match client.restore_session().await? {
            Some(agent) => render(
                ctx,
                format!(
                    "Signed in as **{}** ({}) `{}`",
                    agent.name,
                    agent.email.as_deref().unwrap_or("no email"),
                    agent.id
                ),
                || json!(agent),
            ),
            None => Ok("Not signed in.".to_string()),
        },

        Command::Submit { content, file, claim_type, namespace } => {
            let content = match (content, file) {
                (Some(content), _) => content,
                (None, Some(path)) => tokio::fs::read_to_string(path).await?,
                (None, None) => {
                    return Err(AppError::validation("content", "pass --content or --file"));
                }
            };
            let claim = NewClaim::new(content, claim_type, namespace);
            claim.validate()?;

            client.load_session().await?;
            let created = client.create_claim(&claim).await?;
            tracing::info!(claim = %created.id, "Claim submitted");
            render(ctx, format!("Submitted claim `{}`.", created.id), || {
                compact_claim(&created, None)
            })
        }

        Command::Review { id, verdict, confidence, comment } => {
            let review = NewReview::new(verdict, confidence, comment.as_deref());
            review.validate()?;

            let Some(agent) = client.restore_session().await? else {
                return Err(phiacta::ClientError::NotAuthenticated.into());
            };
            let existing = client.get_claim_reviews(&id).await?;
            if has_reviewed(&existing, &agent.id) {
                return Err(AppError::validation("review", "you have already reviewed this claim"));
            }

            let created = client.submit_review(&id, &review).await?;
            render(
                ctx,
                format!("Recorded **{}** review of `{id}`.", created.verdict),
                || compact_review(&created),
            )
        }

        Command::Verify { id, file, runner } => {
            let submission = VerificationSubmission {
                code_content: tokio::fs::read_to_string(file).await?,
                runner_type: runner,
            };
            submission.validate()?;

            client.load_session().await?;
            let claim = client.submit_verification(&id, &submission).await?;
            let badge = claim.verification_badge().unwrap_or_else(|| "Submitted".to_string());
            render(ctx, format!("Verification for `{id}`: **{badge}**"), || {
                compact_claim(&claim, None)
            })
        }

        Command::Health => {
            let backend = client.backend_health().await?;
            render(ctx, format!("Backend healthy at {}", client.base_url()), || {
                json!({ "status": "healthy", "backend": backend })
            })
        }

        Command::Serve { .. } => Err(AppError::internal("serve is handled before dispatch")),
    }
}

/// Fetch a claim and everything its detail view shows.
///
/// Secondary lookups are best effort: a missing layer leaves its section out.
async fn show_claim(ctx: &Context, id: &str) -> AppResult<String> {
    let client = &ctx.client;
    let claim = client.get_claim(id).await?;

    let (relations, confidence, verification, neighbors, reviews, author) = tokio::join!(
        client.get_claim_relations(id),
        client.get_confidence(id),
        client.get_verification_status(id),
        client.get_neighbors(id),
        client.get_claim_reviews(id),
        client.get_agent(&claim.created_by),
    );

    let detail = ClaimDetail {
        claim,
        relations: best_effort("relations", relations).unwrap_or_default(),
        confidence: best_effort("confidence", confidence),
        verification: best_effort("verification", verification),
        neighbors: best_effort("neighbors", neighbors),
        reviews: best_effort("reviews", reviews).unwrap_or_default(),
        author: best_effort("author", author),
    };

    render(ctx, format_claim_detail_markdown(&detail), || {
        json!({
            "claim": compact_claim(&detail.claim, None),
            "author": detail.author,
            "relations": detail.relations,
            "confidence": detail.confidence,
            "verification": detail.verification,
            "neighbors": detail.neighbors,
            "reviews": detail.reviews.iter().map(compact_review).collect::<Vec<_>>(),
        })
    })
}

fn best_effort<T>(what: &str, result: phiacta::error::ClientResult<T>) -> Option<T> {
    result.map_err(|e| tracing::debug!(section = what, error = %e, "Skipping section")).ok()
}

fn render(
    ctx: &Context,
    markdown: String,
    json: impl FnOnce() -> serde_json::Value,
) -> AppResult<String> {
    match ctx.format {
        ResponseFormat::Markdown => Ok(markdown),
        ResponseFormat::Json => Ok(serde_json::to_string_pretty(&json())?),
    }
}

async fn read_input(file: Option<&PathBuf>) -> AppResult<String> {
    if let Some(path) = file {
        return Ok(tokio::fs::read_to_string(path).await?);
    }
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input)
}
