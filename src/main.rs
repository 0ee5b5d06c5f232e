use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use captiond::application::services::{
    CallbackReconciler, CaptionRetrieval, DeadLetterSink, Dispatcher, ProviderRegistry,
    RetryPolicy,
};
use captiond::infrastructure::observability::{init_tracing, TracingConfig};
use captiond::infrastructure::persistence::MemoryJobRepository;
use captiond::infrastructure::providers::{AmaraConfig, AmaraProvider};
use captiond::infrastructure::storage::LocalArtifactStore;
use captiond::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    let environment = Environment::try_from(
        std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
    )
    .map_err(anyhow::Error::msg)?;

    init_tracing(
        TracingConfig::new(&settings.logging, environment),
        settings.server.port,
    );

    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(AmaraProvider::new(AmaraConfig {
        base_url: settings.amara.base_url.clone(),
        username: settings.amara.username.clone(),
        team: settings.amara.team.clone(),
        api_key: settings.amara.api_key.clone(),
    })));
    let registry = Arc::new(registry);
    tracing::info!(
        providers = ?registry.names().collect::<Vec<_>>(),
        "Providers registered"
    );

    let repository = Arc::new(MemoryJobRepository::new());
    let artifact_store = Arc::new(LocalArtifactStore::new(PathBuf::from(
        &settings.storage.artifact_dir,
    ))?);

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&registry),
        repository.clone(),
    ));
    let retrieval = Arc::new(CaptionRetrieval::new(
        Arc::clone(&registry),
        repository.clone(),
        artifact_store,
    ));

    // Registration is complete before the consumer starts; the registry is
    // read-only from here on.
    let (callback_sender, callback_receiver) = mpsc::unbounded_channel();
    let dead_letters = Arc::new(DeadLetterSink::new());
    let reconciler = CallbackReconciler::new(
        callback_receiver,
        Arc::clone(&registry),
        repository,
        Arc::clone(&dead_letters),
        RetryPolicy {
            max_attempts: settings.callbacks.max_attempts,
            base_backoff: Duration::from_millis(settings.callbacks.base_backoff_ms),
        },
    );
    let reconciler_handle = tokio::spawn(reconciler.run());

    let state = AppState {
        dispatcher,
        retrieval,
        registry,
        callback_sender,
    };
    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Dropping the router dropped the last sender; the reconciler finishes
    // the notification in flight and exits.
    reconciler_handle.await?;

    let parked = dead_letters.len();
    if parked > 0 {
        tracing::warn!(parked, "Exiting with unreconciled dead-lettered callbacks");
    }

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    tracing::info!("Shutdown signal received");
}
