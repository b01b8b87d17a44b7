//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, body limit, request ID, health timeout)
//! - Resolve the airdrop dispenser from configuration
//! - Serve until the shutdown broadcast fires

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::airdrop::handler::{claim, method_not_allowed};
use crate::airdrop::{AirdropError, AirdropSettings, Dispenser};
use crate::blockchain::TokenLedger;
use crate::config::AirdropServiceConfig;
use crate::health::health_handler;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};

/// Route of the claim endpoint.
pub const AIRDROP_PATH: &str = "/api/airdrop";

/// Route of the health endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ready dispenser, or the reason claims cannot be served.
    pub dispenser: Result<Arc<Dispenser>, AirdropError>,
    pub ledger: Arc<dyn TokenLedger>,
}

/// HTTP server for the airdrop service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// An unresolvable airdrop section does not prevent construction; every
    /// claim is then answered with the resolution error.
    pub fn new(config: AirdropServiceConfig, ledger: Arc<dyn TokenLedger>) -> Self {
        let dispenser = AirdropSettings::resolve(&config.airdrop)
            .map(|settings| Arc::new(Dispenser::new(settings, ledger.clone())));

        if let Err(e) = &dispenser {
            tracing::error!(outcome = e.outcome(), "Airdrop endpoint cannot serve claims");
        }

        let state = AppState { dispenser, ledger };
        let router = Self::build_router(&config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The claim route carries no request timeout: once a transaction is
    /// submitted the handler runs until the confirmation wait ends, so the
    /// caller always learns the outcome of a broadcast transfer.
    #[allow(deprecated)]
    fn build_router(config: &AirdropServiceConfig, state: AppState) -> Router {
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);

        Router::new()
            .route(AIRDROP_PATH, post(claim).fallback(method_not_allowed))
            .route(
                HEALTH_PATH,
                get(health_handler).layer(TimeoutLayer::new(request_timeout)),
            )
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The dispenser, when configuration resolved.
    pub fn dispenser(&self) -> Option<&Arc<Dispenser>> {
        self.state.dispenser.as_ref().ok()
    }

    /// The router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{LedgerError, LedgerResult};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use solana_sdk::hash::Hash;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::Signature;
    use solana_sdk::transaction::Transaction;
    use tower::ServiceExt;

    struct OfflineLedger;

    #[async_trait]
    impl TokenLedger for OfflineLedger {
        async fn token_balance(&self, _: &Pubkey) -> LedgerResult<u64> {
            Err(LedgerError::Rpc("offline".into()))
        }
        async fn account_exists(&self, _: &Pubkey) -> LedgerResult<bool> {
            Err(LedgerError::Rpc("offline".into()))
        }
        async fn mint_decimals(&self, _: &Pubkey) -> LedgerResult<u8> {
            Err(LedgerError::Rpc("offline".into()))
        }
        async fn latest_blockhash(&self) -> LedgerResult<Hash> {
            Err(LedgerError::Rpc("offline".into()))
        }
        async fn send_and_confirm(&self, _: &Transaction) -> LedgerResult<Signature> {
            Err(LedgerError::Rpc("offline".into()))
        }
        async fn is_healthy(&self) -> bool {
            false
        }
    }

    fn unconfigured() -> HttpServer {
        HttpServer::new(AirdropServiceConfig::default(), Arc::new(OfflineLedger))
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_server_still_routes() {
        let server = unconfigured();
        assert!(server.dispenser().is_none());

        let res = server
            .router()
            .oneshot(Request::get(AIRDROP_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(res.headers().contains_key(crate::http::X_REQUEST_ID));

        let res = server
            .router()
            .oneshot(
                Request::post(AIRDROP_PATH)
                    .body(Body::from(r#"{"walletAddress":"11111111111111111111111111111111"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await["error"], "Server configuration error");
    }

    #[tokio::test]
    async fn test_unknown_route_and_oversized_body() {
        let server = unconfigured();

        let res = server
            .router()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = server
            .router()
            .oneshot(
                Request::post(AIRDROP_PATH)
                    .header("content-length", 64 * 1024)
                    .body(Body::from(vec![b' '; 64 * 1024]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_health_degraded_when_unconfigured_and_offline() {
        let res = unconfigured()
            .router()
            .oneshot(Request::get(HEALTH_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(res).await;
        assert_eq!(body["claims_enabled"], false);
        assert_eq!(body["rpc_reachable"], false);
    }
}
