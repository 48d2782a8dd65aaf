//! CLI administration tool for url-shortener.
//!
//! Provides commands for managing accounts, issuing bearer tokens, viewing
//! statistics, and performing database operations without HTTP access.
//!
//! # Usage
//!
//! ```bash
//! # Create an account
//! cargo run --bin admin -- user create
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Issue a bearer token for an account
//! cargo run --bin admin -- token issue alice
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
//! - `DATABASE_URL` or `DB_PATH`: SQLite database location
//! - `JWT_SECRET_KEY`: required by `token issue`
//! - `TOKEN_TTL_SECONDS`: lifetime of issued tokens (default: 86400)

use url_shortener::api::dto::auth::RegisterRequest;
use url_shortener::application::services::{AuthService, TokenService};
use url_shortener::config::Config;
use url_shortener::domain::repositories::{LinkRepository, UserRepository};
use url_shortener::infrastructure::persistence::{
    PoolSettings, SqliteLinkRepository, SqliteUserRepository, connect, run_migrations,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

/// CLI tool for managing url-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Issue bearer tokens
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

/// Account management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create an account
    Create {
        /// Username (3-32 characters)
        #[arg(short, long)]
        username: Option<String>,

        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all accounts
    List,
}

/// Token subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Issue a token for an existing account
    Issue {
        /// Account username
        username: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url();
    let pool = connect(
        &database_url,
        &PoolSettings {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(10),
        },
    )
    .await
    .context("Failed to connect to database")?;
    run_migrations(&pool).await?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn users(pool: &SqlitePool) -> Arc<SqliteUserRepository> {
    Arc::new(SqliteUserRepository::new(Arc::new(pool.clone())))
}

fn token_service() -> Result<Arc<TokenService>> {
    let secret = std::env::var("JWT_SECRET_KEY").context("JWT_SECRET_KEY must be set")?;
    let ttl = std::env::var("TOKEN_TTL_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(86_400);
    let grace = std::env::var("TOKEN_GRACE_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(86_400);

    Ok(Arc::new(TokenService::new(
        secret.as_bytes(),
        Duration::from_secs(ttl),
        Duration::from_secs(grace),
    )))
}

/// Dispatches account management commands.
async fn handle_user_action(action: UserAction, pool: &SqlitePool) -> Result<()> {
    match action {
        UserAction::Create {
            username,
            email,
            yes,
        } => create_user(pool, username, email, yes).await,
        UserAction::List => list_users(pool).await,
    }
}

/// Creates an account with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for username and email (or use provided)
/// 2. Prompt for the password twice
/// 3. Validate with the same rules as `POST /api/register`
/// 4. Confirm creation (unless `--yes` flag)
/// 5. Hash the password and store the account
async fn create_user(
    pool: &SqlitePool,
    username: Option<String>,
    email: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create Account".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    let request = RegisterRequest {
        username,
        email,
        password,
    };
    if let Err(errors) = request.validate() {
        println!("{}", "❌ Invalid input:".red().bold());
        for (field, problems) in errors.field_errors() {
            for problem in problems {
                let message = problem
                    .message
                    .as_deref()
                    .map(str::to_string)
                    .unwrap_or_else(|| problem.code.to_string());
                println!("  {}: {}", field.cyan(), message);
            }
        }
        return Ok(());
    }

    println!();
    println!("  Username: {}", request.username.cyan());
    println!("  Email:    {}", request.email.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    // Tokens are not issued here, so any secret works for the service.
    let tokens = Arc::new(TokenService::new(
        b"unused",
        Duration::from_secs(1),
        Duration::from_secs(1),
    ));
    let auth = AuthService::new(users(pool), tokens);

    let user = auth
        .create_user(&request.username, &request.email, &request.password)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create account: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Account created with id".green().bold(),
        user.id.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Lists all accounts.
///
/// # Output Format
///
/// ```text
/// 📋 Accounts
///
///   ID  Username             Email                          Created
///   ───────────────────────────────────────────────────────────────────────────
///   1   alice                alice@example.com              2024-01-15 10:30
/// ```
async fn list_users(pool: &SqlitePool) -> Result<()> {
    println!("{}", "📋 Accounts".bright_blue().bold());
    println!();

    let accounts = users(pool)
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list accounts: {}", e))?;

    if accounts.is_empty() {
        println!("{}", "  No accounts found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<20} {:<30} {:<20}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for user in &accounts {
        println!(
            "  {:<3} {:<20} {:<30} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.email,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        accounts.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Dispatches token commands.
async fn handle_token_action(action: TokenAction, pool: &SqlitePool) -> Result<()> {
    match action {
        TokenAction::Issue { username } => issue_token(pool, &username).await,
    }
}

/// Issues a bearer token for an existing account.
///
/// The token is signed with `JWT_SECRET_KEY`, so it is only accepted by a
/// server running with the same key.
async fn issue_token(pool: &SqlitePool, username: &str) -> Result<()> {
    println!("{}", "🔑 Issue Token".bright_blue().bold());
    println!();

    let user = users(pool)
        .find_by_username(username)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Account not found")?;

    let issued = token_service()?
        .issue(user.id)
        .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))?;

    println!("  Account: {}", user.username.cyan());
    println!(
        "  Expires: {}",
        issued
            .expires_at
            .format("%Y-%m-%d %H:%M UTC")
            .to_string()
            .bright_black()
    );
    println!();
    println!("{}", "Add this to your requests:".bright_white());
    println!(
        "  {}: Bearer {}",
        "Authorization".bright_cyan(),
        issued.token.bright_yellow()
    );
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Number of accounts
/// - Number of links and how many are password protected
/// - Total number of clicks
async fn handle_stats(pool: &SqlitePool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links = SqliteLinkRepository::new(Arc::new(pool.clone()));

    let users_count = users(pool)
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let links_count = links
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let clicks_count = links
        .total_clicks()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let gated_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE password_hash IS NOT NULL")
            .fetch_one(pool)
            .await?;

    println!(
        "  Accounts:      {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Links:         {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Gated links:   {}",
        gated_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:        {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;
            let journal: String = sqlx::query_scalar("PRAGMA journal_mode")
                .fetch_one(pool)
                .await?;

            println!("  SQLite:       {}", version.bright_white());
            println!("  Journal mode: {}", journal.bright_white());
            println!("  Location:     {}", Config::load_database_url().bright_white());
            println!();
        }
    }

    Ok(())
}
