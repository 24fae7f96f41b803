// Early-access admin server using Axum
// Serves the GraphQL schema at /graphql

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polarway_access::{build_schema, EarlyAccessAdminService};
use polarway_access_server::auth::TokenVerifier;
use polarway_access_server::config::ServerConfig;
use polarway_access_server::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "polarway_access=info,polarway_access_server=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let admin = EarlyAccessAdminService::in_memory(&config.access);
    admin.throttle.spawn_janitor(config.janitor_interval);

    let state = AppState {
        schema: build_schema(admin.service),
        verifier: Arc::new(TokenVerifier::new(&config.jwt_secret)),
    };
    let app = router(state);

    let addr = config.bind_addr();
    tracing::info!(
        staff_domains = ?config.access.staff_domains,
        "Polarway access server listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
