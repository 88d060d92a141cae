//! `baja-seed-admin`: make sure an admin account exists.
//!
//! Safe to run on every deploy. An existing user is left untouched unless
//! `--reset-password` is given, in which case its password is replaced, it
//! is promoted to admin and reactivated, and its sessions are revoked.

use anyhow::{bail, Context};
use baja_api::auth::password::{check_admin_password, hash_password};
use baja_core::roles::ROLE_ADMIN;
use baja_db::models::user::CreateUser;
use baja_db::repositories::{SessionRepo, UserRepo};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "baja-seed-admin", about = "Create or reset the catalog admin account")]
struct Args {
    /// Login name of the admin account.
    #[arg(long, default_value = "admin")]
    username: String,

    /// Contact email stored on the account.
    #[arg(long, default_value = "")]
    email: String,

    /// Plaintext password; prefer the environment variable over the flag.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    /// Overwrite the password of an existing account.
    #[arg(long)]
    reset_password: bool,

    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "baja_seed_admin=info,baja_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if args.username.trim().is_empty() {
        bail!("--username must not be empty");
    }
    if let Err(msg) = check_admin_password(&args.password, &args.username) {
        bail!(msg);
    }

    let pool = baja_db::create_pool(&args.database_url)
        .await
        .context("Failed to connect to database")?;
    baja_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let password_hash =
        hash_password(&args.password).map_err(|e| anyhow::anyhow!("Hashing failed: {e}"))?;

    match UserRepo::find_by_username(&pool, &args.username).await? {
        None => {
            let user = UserRepo::create(
                &pool,
                &CreateUser {
                    username: args.username.clone(),
                    email: args.email.clone(),
                    password_hash,
                    role: ROLE_ADMIN.to_string(),
                },
            )
            .await
            .context("Failed to create admin user")?;
            tracing::info!(user_id = user.id, username = %user.username, "Admin user created");
        }
        Some(existing) if args.reset_password => {
            UserRepo::reset_credentials(&pool, existing.id, &password_hash, ROLE_ADMIN)
                .await?
                .context("User disappeared during reset")?;
            let revoked = SessionRepo::revoke_for_user(&pool, existing.id).await?;
            tracing::info!(
                user_id = existing.id,
                revoked,
                "Admin password reset and sessions revoked",
            );
        }
        Some(existing) => {
            if existing.role != ROLE_ADMIN || !existing.is_active {
                tracing::warn!(
                    user_id = existing.id,
                    role = %existing.role,
                    is_active = existing.is_active,
                    "User exists but is not an active admin; rerun with --reset-password",
                );
            } else {
                tracing::info!(user_id = existing.id, "Admin user already exists, nothing to do");
            }
        }
    }

    Ok(())
}
