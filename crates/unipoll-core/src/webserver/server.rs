// The webserver output plugin: config, router assembly, and serving.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use async_trait::async_trait;
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ConfigLoader;
use crate::error::PollerError;
use crate::poller::Collect;
use crate::registry::Output;

use super::auth::{password_is_correct, Accounts};
use super::handlers;
use super::state::{self, OutputUpdate, STATE};
use super::{DEFAULT_MAX_EVENTS, DEFAULT_PORT, PLUGIN_NAME};

/// The `[webserver]` config section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Usernames mapped to bcrypt hashes (`--encrypt` makes them).
    /// Empty means open access.
    #[serde(default)]
    pub accounts: Accounts,
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_events() -> usize {
    DEFAULT_MAX_EVENTS
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enable: false,
            port: DEFAULT_PORT,
            accounts: Accounts::new(),
            max_events: DEFAULT_MAX_EVENTS,
        }
    }
}

/// The status UI output plugin.
#[derive(Default)]
pub struct WebServer {
    config: RwLock<WebConfig>,
}

impl WebServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn config(&self) -> WebConfig {
        self.config.read().expect("lock poisoned").clone()
    }
}

/// Request context shared by every handler.
#[derive(Clone)]
pub(super) struct Ctx {
    pub collect: Arc<dyn Collect>,
    pub accounts: Arc<Accounts>,
    pub start: Instant,
}

#[async_trait]
impl Output for WebServer {
    fn configure(&self, loader: &ConfigLoader) -> Result<(), PollerError> {
        let config: WebConfig = loader.section(PLUGIN_NAME)?;

        if config.enable {
            // Arm the shared state so plugin hooks start recording.
            STATE.enable(config.max_events);
        }

        {
            *self.config.write().expect("lock poisoned") = config;
        }

        Ok(())
    }

    fn enabled(&self) -> bool {
        self.config().enable
    }

    async fn run(&self, collect: Arc<dyn Collect>) -> Result<(), PollerError> {
        let config = self.config();

        if !config.enable {
            info!("internal web server disabled");
            return Ok(());
        }

        // Publish our own config with the account hashes scrubbed to
        // just the usernames.
        state::update_output(
            PLUGIN_NAME,
            OutputUpdate {
                config: Some(serde_json::json!({
                    "enable": config.enable,
                    "port": config.port,
                    "max_events": config.max_events,
                    "accounts": config.accounts.keys().collect::<Vec<_>>(),
                })),
            },
        );

        let ctx = Ctx {
            collect,
            accounts: Arc::new(config.accounts.clone()),
            start: Instant::now(),
        };

        let router = build_router(ctx);
        let addr = format!("0.0.0.0:{}", config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| PollerError::Sink(format!("web server bind {addr}: {e}")))?;

        info!(port = config.port, "web server starting, listening on HTTP");

        axum::serve(listener, router)
            .await
            .map_err(|e| PollerError::Sink(format!("web server: {e}")))
    }

    async fn debug_output(&self) -> Result<(), PollerError> {
        Ok(())
    }
}

fn build_router(ctx: Ctx) -> Router {
    // Authenticated API routes.
    let api = Router::new()
        .route("/api/v1/config", get(handlers::handle_config))
        .route("/api/v1/config/plugins", get(handlers::handle_plugins))
        .route("/api/v1/plugins", get(handlers::handle_plugins))
        .route("/api/v1/input/:input", get(handlers::handle_input))
        .route("/api/v1/input/:input/:sub", get(handlers::handle_input_sub))
        .route(
            "/api/v1/input/:input/:sub/:value",
            get(handlers::handle_input_sub_value),
        )
        .route("/api/v1/output/:output", get(handlers::handle_output))
        .route(
            "/api/v1/output/:output/:sub",
            get(handlers::handle_output_sub),
        )
        .route(
            "/api/v1/output/:output/:sub/:value",
            get(handlers::handle_output_sub_value),
        )
        .layer(middleware::from_fn_with_state(ctx.clone(), basic_auth));

    // Unauthenticated probes.
    Router::new()
        .route("/health", get(handlers::handle_health))
        .route("/debug/vars", get(handlers::handle_vars))
        .merge(api)
        .with_state(ctx)
}

/// Basic-auth gate for the API routes.
async fn basic_auth(
    axum::extract::State(ctx): axum::extract::State<Ctx>,
    request: axum::extract::Request,
    next: middleware::Next,
) -> Response {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if password_is_correct(&ctx.accounts, header) {
        return next.run(request).await;
    }

    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header(header::WWW_AUTHENTICATE, "Basic realm=\"unipoll\"")
        .body("401 Unauthorized\n".into())
        .unwrap_or_default()
}
