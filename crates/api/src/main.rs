use std::sync::Arc;

use mayab_infra::InMemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mayab_observability::init();

    let store = Arc::new(InMemoryStore::new());
    let app = mayab_api::app::build_app(store);

    let addr = std::env::var("MAYAB_API_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
