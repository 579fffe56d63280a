use merx_api::{app, AppState};
use merx_catalog::{CacheConfig, HttpCatalogClient, PriceCache, PriceResolver};
use merx_order::{OrderService, PaymentConfig, PaymentWorkflow};
use merx_store::{app_config::Config, HttpSettlementClient, InMemoryOrderStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "merx_api=debug,merx_order=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Merx API on port {}", config.server.port);

    let catalog_client = HttpCatalogClient::new(&config.catalog.base_url, config.catalog.timeout())
        .expect("Failed to build catalog client");
    let price_cache = PriceCache::new(
        Arc::new(catalog_client),
        CacheConfig {
            enabled: config.catalog.enable_cache,
            ttl: config.catalog.cache_ttl(),
        },
    );
    let resolver = Arc::new(PriceResolver::new(Arc::new(price_cache)));

    let store = Arc::new(InMemoryOrderStore::new());
    let orders = Arc::new(OrderService::new(store, resolver));

    let settlement_client = HttpSettlementClient::new(config.payment.timeout())
        .expect("Failed to build settlement client");
    let payments = Arc::new(PaymentWorkflow::new(
        Arc::new(settlement_client),
        orders.clone(),
        PaymentConfig {
            success_url: config.payment.success_url.clone(),
            failure_url: config.payment.failure_url.clone(),
            retry: config.payment.retry(),
        },
    ));

    let app = app(AppState { orders, payments });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
