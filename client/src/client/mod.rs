mod client_config;
pub use client_config::ClientConfig;

mod config_client;
pub use config_client::ConfigClient;
