//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse, apply BACKEND_BASE_URL / GATEWAY_BIND_ADDRESS)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps the backend origin
//! ```

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    BackendConfig, GatewayConfig, LimitsConfig, ListenerConfig, ObservabilityConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;
