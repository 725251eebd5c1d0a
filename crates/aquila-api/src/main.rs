//! Service bootstrap.

use std::env;
use std::sync::Arc;

use aquila_server::Server;
use aquila_telemetry::{init_logging, LogConfig};

use aquila_api::app::build_adapter;
use aquila_api::config::AppConfig;
use aquila_api::domain::{now_millis, User};
use aquila_api::password::{hash_password, Argon2PasswordVerifier};
use aquila_api::store::InMemoryUserStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_config = match env::var("LOG_FORMAT").as_deref() {
        Ok("pretty") => LogConfig::development(),
        _ => LogConfig::production(),
    };
    init_logging(&log_config)?;

    let config = AppConfig::from_env()?;

    let users = Arc::new(InMemoryUserStore::new());
    seed_user(&users).await?;
    let ratings = Arc::new(aquila_api::store::InMemoryRatingStore::new());

    let adapter = build_adapter(
        &config,
        Arc::clone(&users) as Arc<dyn aquila_api::store::UserStore>,
        ratings,
        Arc::new(Argon2PasswordVerifier),
    );

    Server::new(config.http_addr.clone(), adapter).run().await?;
    Ok(())
}

/// Seeds one user from `SEED_USERNAME`/`SEED_PASSWORD` so a fresh instance
/// is usable immediately. Skipped when either variable is absent.
async fn seed_user(users: &InMemoryUserStore) -> anyhow::Result<()> {
    let (Ok(username), Ok(password)) = (env::var("SEED_USERNAME"), env::var("SEED_PASSWORD"))
    else {
        return Ok(());
    };

    let now = now_millis();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username,
        password_hash: hash_password(&password)?,
        created_at: now,
        updated_at: now,
    };

    tracing::info!(username = %user.username, "seeded user");
    users.insert(user).await;
    Ok(())
}
