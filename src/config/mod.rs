//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (overlay SENDER_PRIVATE_KEY, TOKEN_MINT_ADDRESS, ...)
//!     → validation.rs (semantic checks)
//!     → AirdropServiceConfig (validated, immutable)
//!     → shared via Arc with the HTTP handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Secrets come from the environment; the file may omit them

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AirdropConfig, AirdropServiceConfig, KeyEncoding, ListenerConfig, LogFormat,
    ObservabilityConfig, SecretKeyMaterial, SecurityConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
