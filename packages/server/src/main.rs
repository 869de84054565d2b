use std::sync::Arc;

use anyhow::Context;
use api::{router, AppState, AuthService, NoteService, PasswordHasher, TokenIssuer};
use store::{MemoryStore, NoteStore, PgStore, UserStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use settings::{Backend, Settings};

mod settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = Settings::new().context("Failed to load settings")?;
    settings.validate()?;

    let state = build_state(&settings).await?;
    let app = router(state);

    let addr = settings.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    let (users, notes) = open_stores(settings).await?;

    let hasher = PasswordHasher::new(&settings.auth.hasher_config())
        .context("Invalid argon2 settings")?;
    let tokens = TokenIssuer::new(settings.auth.secret.as_bytes(), settings.auth.token_ttl());

    Ok(AppState::new(
        AuthService::new(users, hasher, tokens),
        NoteService::new(notes),
    ))
}

async fn open_stores(
    settings: &Settings,
) -> anyhow::Result<(Arc<dyn UserStore>, Arc<dyn NoteStore>)> {
    match settings.database.backend {
        Backend::Memory => {
            tracing::warn!("Using the in-memory store, data will not survive a restart");
            let store = Arc::new(MemoryStore::new());
            let users: Arc<dyn UserStore> = store.clone();
            let notes: Arc<dyn NoteStore> = store;
            Ok((users, notes))
        }
        Backend::Postgres => {
            let store = PgStore::connect(
                &settings.database.url,
                settings.database.max_connections,
            )
            .await
            .context("Failed to connect to database")?;
            store.migrate().await.context("Failed to run migrations")?;

            let store = Arc::new(store);
            let users: Arc<dyn UserStore> = store.clone();
            let notes: Arc<dyn NoteStore> = store;
            Ok((users, notes))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
