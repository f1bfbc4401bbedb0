mod config_server;
pub use config_server::ConfigServer;

mod server_config;
pub use server_config::ServerConfig;
