//! Remote API access.
//!
//! - `config.rs` - connection configuration (workspace, credentials, base URL)
//! - `client.rs` - reqwest wrapper with basic auth and status mapping
//! - `directory.rs` - read/query operations ([`SchemaDirectory`])
//! - `mutation.rs` - create operations ([`SchemaMutation`])
//! - `types.rs` - wire descriptors and creation payloads

mod client;
mod config;
mod directory;
mod mutation;
pub mod types;

pub use client::HttpApi;
pub use config::ApiConfig;
pub use directory::SchemaDirectory;
pub use mutation::SchemaMutation;
