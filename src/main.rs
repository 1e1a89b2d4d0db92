use std::sync::Arc;

use anyhow::{Context, Result};
use groups_backend::{
    app_state::AppState, config::Config, db, logging, membership::MembershipEngine, routes,
    store::PgGroupStore,
};
use tower_sessions::{cookie::time::Duration, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;
    logging::init_logging(config.log_format)?;

    let pool = db::connect_to_db(&config).await?;
    db::run_migrations(&pool).await?;

    let session_store = PostgresStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .context("Failed to migrate session store")?;
    let session_layer =
        SessionManagerLayer::new(session_store).with_expiry(Expiry::OnInactivity(Duration::days(7)));

    let state = AppState {
        membership: MembershipEngine::new(Arc::new(PgGroupStore::new(pool))),
    };
    let app = routes::create_routes().with_state(state).layer(session_layer);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
