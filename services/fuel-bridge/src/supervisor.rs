//! Process wiring: one store, one subscriber task, one HTTP server.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tracing::{error, info, warn};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::handlers;
use crate::source::{MessageSource, RedisSource};
use crate::state::AppState;
use crate::subscriber::SubscriberLoop;
use fuelbridge_core::StateStore;

pub struct Supervisor {
    config: BridgeConfig,
    store: StateStore,
}

impl Supervisor {
    /// Seed the store with the default fuel status
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            store: StateStore::new(),
        }
    }

    /// Handle to the shared store
    pub fn store(&self) -> StateStore {
        self.store.clone()
    }

    /// Subscribe to Redis, bind the configured address and serve until Ctrl-C
    pub async fn run(self) -> Result<(), BridgeError> {
        let source = RedisSource::new(
            &self.config.redis_url,
            &self.config.topic,
            &self.config.retry,
        )?;
        let listener = TcpListener::bind(self.config.bind_addr()).await?;

        self.run_with(listener, source, shutdown_signal()).await
    }

    /// Run with an already-bound listener and an arbitrary message source.
    ///
    /// The subscriber runs as its own task so message ingestion and query
    /// handling never wait on each other. When `shutdown` resolves the HTTP
    /// server drains and the subscriber task is aborted.
    pub async fn run_with<S, F>(
        self,
        listener: TcpListener,
        source: S,
        shutdown: F,
    ) -> Result<(), BridgeError>
    where
        S: MessageSource + 'static,
        F: Future<Output = ()> + Send + 'static,
    {
        let mut subscriber = tokio::spawn(SubscriberLoop::new(self.store.clone()).run(source));

        let app = handlers::router(Arc::new(AppState::new(self.store.clone())));
        info!(
            addr = %listener.local_addr()?,
            topic = %self.config.topic,
            "Fuel bridge listening"
        );

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .into_future();
        tokio::pin!(server);

        // Queries keep being answered from the last value if ingestion stops
        let (served, joined) = tokio::select! {
            joined = &mut subscriber => {
                report_subscriber_exit(&joined);
                ((&mut server).await, joined)
            }
            served = &mut server => {
                subscriber.abort();
                (served, subscriber.await)
            }
        };

        if let Err(e) = joined {
            if e.is_panic() {
                return Err(BridgeError::Server(format!("subscriber task panicked: {}", e)));
            }
        }

        served?;
        info!("Fuel bridge stopped");
        Ok(())
    }
}

fn report_subscriber_exit(joined: &Result<(), JoinError>) {
    match joined {
        Ok(()) => warn!("Subscriber loop ended, serving last known fuel status"),
        Err(e) if e.is_panic() => {
            error!(error = %e, "Subscriber task panicked, serving last known fuel status")
        }
        Err(e) => warn!(error = %e, "Subscriber task cancelled"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
