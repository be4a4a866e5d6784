//! CLI administration tool for ironlink.
//!
//! Manages users and API tokens, shows statistics, and performs database
//! operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Register a user
//! cargo run --bin admin -- user create --email alice@example.com
//!
//! # Issue a token for that user
//! cargo run --bin admin -- token create --email alice@example.com
//!
//! # List tokens, optionally for one user
//! cargo run --bin admin -- token list --email alice@example.com
//!
//! # Revoke a token
//! cargo run --bin admin -- token revoke "Production API"
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server

use ironlink::application::services::AuthService;
use ironlink::domain::entities::{NewUser, User};
use ironlink::domain::repositories::{TokenRepository, UserRepository};
use ironlink::infrastructure::persistence::{PgTokenRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing ironlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a new user
    Create {
        #[arg(short, long)]
        email: Option<String>,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a new API token for a user
    Create {
        /// Owner's email address
        #[arg(short, long)]
        email: Option<String>,

        /// Token name (e.g., "Production API", "Mobile App")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List tokens
    List {
        /// Only show tokens of this user
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let users = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create { email, name } => create_user(&users, email, name).await,
        UserAction::List => list_users(&users).await,
    }
}

async fn create_user(
    users: &PgUserRepository,
    email: Option<String>,
    name: Option<String>,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let name = name.filter(|n| !n.trim().is_empty());

    let user = users
        .create(NewUser { email, name })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!("{}", "✅ User created".green().bold());
    println!("  ID:    {}", user.id.to_string().bright_black());
    println!("  Email: {}", user.email.cyan());
    println!();

    Ok(())
}

async fn list_users(users: &PgUserRepository) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let all = users
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if all.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<35} {:<20} {:<16}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(78).bright_black());

    for user in &all {
        println!(
            "  {:<5} {:<35} {:<20} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.name.as_deref().unwrap_or("-"),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", all.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let tokens = Arc::new(PgTokenRepository::new(pool.clone()));
    let users = PgUserRepository::new(pool);

    match action {
        TokenAction::Create {
            email,
            name,
            token,
            yes,
        } => create_token(tokens, &users, email, name, token, yes).await,
        TokenAction::List { email } => {
            let owner = match email {
                Some(email) => Some(find_user(&users, &email).await?),
                None => None,
            };
            list_tokens(tokens, owner).await
        }
        TokenAction::Revoke { name_or_id } => revoke_token(tokens, name_or_id).await,
    }
}

async fn find_user(users: &PgUserRepository, email: &str) -> Result<User> {
    users
        .find_by_email(email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("No user with email {email}"))
}

/// Issues a new API token with interactive prompts.
///
/// Only the HMAC-SHA256 digest keyed by `TOKEN_SIGNING_SECRET` is stored; the
/// raw token is shown once.
async fn create_token(
    tokens: Arc<PgTokenRepository>,
    users: &PgUserRepository,
    email: Option<String>,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set")?;
    if secret.is_empty() {
        anyhow::bail!("TOKEN_SIGNING_SECRET must not be empty");
    }

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Owner email").interact_text()?,
    };
    let owner = find_user(users, &email).await?;

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Production API")
            .interact_text()?,
    };

    if token.is_some() {
        println!("{}", "⚠️  Using provided token value".yellow());
    }

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  Owner: {}", owner.email.cyan());
    println!("  Name:  {}", token_name.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let auth = AuthService::new(tokens, secret);
    let (raw, stored) = auth
        .issue_token(owner.id, &token_name, token)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "✅ Token created successfully!".green().bold());
    println!("  ID:    {}", stored.id.to_string().bright_black());
    println!("  Token: {}", raw.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
        raw.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(tokens: Arc<PgTokenRepository>, owner: Option<User>) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let all = tokens
        .list_tokens(owner.as_ref().map(|u| u.id))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if all.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<6} {:<30} {:<17} {:<17} {:<10}",
        "ID".bright_white().bold(),
        "User".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for token in &all {
        let status = if token.is_revoked() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<5} {:<6} {:<30} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.user_id.to_string().bright_black(),
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used,
            status
        );
    }

    println!();
    println!("  Total: {}", all.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Revokes a token by name or ID after confirmation.
///
/// Numeric input is looked up by ID, anything else by exact name.
async fn revoke_token(tokens: Arc<PgTokenRepository>, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => tokens.find_by_id(id).await,
        Err(_) => tokens.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.is_revoked() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    tokens
        .revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!();
    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Displays user, link, click and active token counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let active_links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE is_active")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks")
        .fetch_one(pool)
        .await?;

    let tokens_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!("  Users:         {}", users_count.to_string().bright_green().bold());
    println!(
        "  Links:         {} ({} active)",
        links_count.to_string().bright_green().bold(),
        active_links
    );
    println!("  Clicks:        {}", clicks_count.to_string().bright_green().bold());
    println!("  Active tokens: {}", tokens_count.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
