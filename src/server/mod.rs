pub mod dto;
mod error;
mod routes;
mod server_config;

pub use error::ServerError;
pub use routes::router;
pub use server_config::{ServerConfig, StorageConfig};
