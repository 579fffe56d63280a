pub mod app_config;
pub mod memory_repo;
pub mod settlement_http;

pub use memory_repo::InMemoryOrderStore;
pub use settlement_http::HttpSettlementClient;
