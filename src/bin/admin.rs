//! CLI administration tool for shortly.
//!
//! Provides commands for managing accounts, inspecting links, and performing
//! database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # List accounts
//! cargo run --bin admin -- account list
//!
//! # Set a password (prompted, or generated with --generate)
//! cargo run --bin admin -- account set-password ann@example.com
//!
//! # Deactivate an account
//! cargo run --bin admin -- account deactivate ann@example.com
//!
//! # Link statistics and details
//! cargo run --bin admin -- links stats
//! cargo run --bin admin -- links show promo
//!
//! # Database tools
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use shortly::application::services::account_service::normalize_email;
use shortly::config::{Config, mask_connection_string};
use shortly::domain::entities::Link;
use shortly::domain::repositories::{AccountRepository, LinkRepository};
use shortly::infrastructure::persistence::{PgAccountRepository, PgLinkRepository};
use shortly::utils::password::{check_password_policy, hash_password};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Password};
use sqlx::PgPool;
use std::sync::Arc;

const TOP_LINKS: i64 = 10;

/// CLI tool for managing shortly.
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
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Inspect links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// List all accounts
    List,

    /// Set a new password for an active account
    SetPassword {
        email: String,

        /// Generate a random password instead of prompting
        #[arg(short, long)]
        generate: bool,
    },

    /// Deactivate an account; its links keep working
    Deactivate {
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// Totals and most clicked links
    Stats,

    /// Show one link by short code, including deleted ones
    Show { code: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[derive(sqlx::FromRow)]
struct AccountSummary {
    id: i64,
    email: String,
    name: String,
    created_at: DateTime<Utc>,
    is_active: bool,
    link_count: i64,
}

#[derive(sqlx::FromRow)]
struct LinkTotals {
    total: i64,
    active: i64,
    deleted: i64,
    expired: i64,
    anonymous: i64,
    clicks: i64,
}

#[derive(sqlx::FromRow)]
struct TopLink {
    short_code: String,
    original_url: String,
    click_count: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::Account { action } => handle_account_action(action, &pool).await?,
        Commands::Links { action } => handle_links_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_account_action(action: AccountAction, pool: &PgPool) -> Result<()> {
    match action {
        AccountAction::List => list_accounts(pool).await,
        AccountAction::SetPassword { email, generate } => {
            let repo = PgAccountRepository::new(Arc::new(pool.clone()));
            set_password(&repo, &email, generate).await
        }
        AccountAction::Deactivate { email, yes } => deactivate_account(pool, &email, yes).await,
    }
}

/// Lists all accounts with their active link counts.
async fn list_accounts(pool: &PgPool) -> Result<()> {
    println!("{}", "👥 Accounts".bright_blue().bold());
    println!();

    let accounts: Vec<AccountSummary> = sqlx::query_as(
        r#"
        SELECT a.id, a.email, a.name, a.created_at, a.is_active,
               COUNT(l.id) FILTER (WHERE l.is_active) AS link_count
        FROM accounts a
        LEFT JOIN links l ON l.owner_id = a.id
        GROUP BY a.id
        ORDER BY a.id
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list accounts")?;

    if accounts.is_empty() {
        println!("{}", "  No accounts found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<32} {:<20} {:<17} {:<6} {:<10}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Links".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(95).bright_black());

    for account in &accounts {
        let status = if account.is_active {
            "ACTIVE".green()
        } else {
            "INACTIVE".red()
        };

        println!(
            "  {:<5} {:<32} {:<20} {:<17} {:<6} {}",
            account.id.to_string().bright_black(),
            account.email.cyan(),
            account.name,
            account
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            account.link_count,
            status
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

/// Sets a new password for an active account.
///
/// The password is checked against the same policy as the HTTP API. Changing
/// it invalidates every outstanding reset token for the account.
async fn set_password(repo: &PgAccountRepository, email: &str, generate: bool) -> Result<()> {
    println!("{}", "🔑 Set Password".bright_blue().bold());
    println!();

    let email = normalize_email(email);
    let account = repo
        .find_active_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("No active account with this email")?;

    let password = if generate {
        generate_password()
    } else {
        Password::new()
            .with_prompt("New password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?
    };

    check_password_policy(&password).map_err(|e| anyhow::anyhow!("{}", e))?;

    let plain = password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("Password hashing task failed")?
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let updated = repo
        .update_password(account.id, &password_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update password: {}", e))?;

    if !updated {
        anyhow::bail!("Account no longer exists");
    }

    println!("  Account: {}", account.email.cyan());
    if generate {
        println!("  Password: {}", password.bright_yellow().bold());
        println!();
        println!(
            "{}",
            "⚠️  Save this password now. It is not stored anywhere in plain text."
                .red()
                .bold()
        );
    }
    println!();
    println!("{}", "✅ Password updated".green().bold());
    println!();

    Ok(())
}

/// Deactivates an account after confirmation.
///
/// Deactivated accounts cannot log in or reset their password. Their links
/// stay resolvable.
async fn deactivate_account(pool: &PgPool, email: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔒 Deactivate Account".bright_blue().bold());
    println!();

    let email = normalize_email(email);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Deactivate {}?", email))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let result =
        sqlx::query("UPDATE accounts SET is_active = FALSE WHERE email = $1 AND is_active")
            .bind(&email)
            .execute(pool)
            .await
            .context("Failed to deactivate account")?;

    if result.rows_affected() == 0 {
        println!("{}", "⚠️  No active account with this email".yellow());
    } else {
        println!("{}", "✅ Account deactivated".green().bold());
    }
    println!();

    Ok(())
}

async fn handle_links_action(action: LinksAction, pool: &PgPool) -> Result<()> {
    match action {
        LinksAction::Stats => link_stats(pool).await,
        LinksAction::Show { code } => {
            let repo = PgLinkRepository::new(Arc::new(pool.clone()));
            show_link(&repo, &code).await
        }
    }
}

/// Displays link totals and the most clicked active links.
async fn link_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Link Statistics".bright_blue().bold());
    println!();

    let totals: LinkTotals = sqlx::query_as(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (WHERE is_active) AS active,
               COUNT(*) FILTER (WHERE NOT is_active) AS deleted,
               COUNT(*) FILTER (WHERE is_active AND expires_at < NOW()) AS expired,
               COUNT(*) FILTER (WHERE owner_id IS NULL) AS anonymous,
               COALESCE(SUM(click_count), 0)::BIGINT AS clicks
        FROM links
        "#,
    )
    .fetch_one(pool)
    .await
    .context("Failed to load link totals")?;

    println!("  Links:     {}", totals.total.to_string().bright_green().bold());
    println!("  Active:    {}", totals.active.to_string().green());
    println!("  Deleted:   {}", totals.deleted.to_string().red());
    println!("  Expired:   {}", totals.expired.to_string().yellow());
    println!("  Anonymous: {}", totals.anonymous.to_string().bright_black());
    println!("  Clicks:    {}", totals.clicks.to_string().bright_green().bold());
    println!();

    let top: Vec<TopLink> = sqlx::query_as(
        r#"
        SELECT short_code, original_url, click_count
        FROM links
        WHERE is_active AND click_count > 0
        ORDER BY click_count DESC, id
        LIMIT $1
        "#,
    )
    .bind(TOP_LINKS)
    .fetch_all(pool)
    .await
    .context("Failed to load top links")?;

    if top.is_empty() {
        return Ok(());
    }

    println!("{}", "  Top links:".bright_white().bold());
    for link in &top {
        println!(
            "  {:>8}  {:<12} {}",
            link.click_count.to_string().bright_green(),
            link.short_code.cyan(),
            truncate(&link.original_url, 60).bright_black()
        );
    }
    println!();

    Ok(())
}

/// Shows one link by code, whatever its state.
async fn show_link(repo: &PgLinkRepository, code: &str) -> Result<()> {
    let link = repo
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    print_link(&link);

    Ok(())
}

fn print_link(link: &Link) {
    let status = if !link.is_active() {
        "DELETED".red()
    } else if link.is_expired() {
        "EXPIRED".yellow()
    } else {
        "ACTIVE".green()
    };

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  ID:           {}", link.id.to_string().bright_black());
    println!("  Code:         {}", link.short_code.cyan());
    println!("  Status:       {}", status);
    println!("  Title:        {}", link.title);
    println!("  Original URL: {}", link.original_url);
    println!("  Redirects to: {}", link.redirect_target().bright_white());
    println!(
        "  Owner:        {}",
        link.owner_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    );
    println!("  Created:      {}", link.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(expires_at) = link.expires_at {
        println!("  Expires:      {}", expires_at.format("%Y-%m-%d %H:%M"));
    }
    println!(
        "  Clicks:       {}",
        link.click_count.to_string().bright_green().bold()
    );
    if let Some(last) = link.last_clicked_at {
        println!("  Last click:   {}", last.format("%Y-%m-%d %H:%M:%S"));
    }
    println!();
}

/// Handles database diagnostic commands.
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

            let migrations: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM _sqlx_migrations WHERE success",
            )
            .fetch_one(pool)
            .await
            .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Applied migrations: {}", migrations.to_string().bright_white());
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to apply migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

/// Generates a random password that satisfies the password policy.
///
/// # Format
///
/// - Length: 16 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const PASSWORD_LEN: usize = 16;

    let mut rng = rand::rng();

    loop {
        let candidate: String = (0..PASSWORD_LEN)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect();

        if check_password_policy(&candidate).is_ok() {
            return candidate;
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
