#![warn(warnings)]

// Core modules
pub mod claims;
pub mod errors;
pub mod principal;
pub mod traits;
pub mod types;

pub mod authority;
pub mod authorizer;
pub mod policy;
pub mod token_error;

// Configuration
pub mod config;
pub mod config_error;
pub mod secret_string;

#[cfg(feature = "axum-ext")]
pub mod axum_ext;

// Core exports
pub use claims::{TokenClaims, TokenResponse};
pub use errors::AuthError;
pub use principal::Principal;
pub use traits::{PrimaryAuthorizer, TokenValidator};
pub use types::{AuthRequirement, RequiredScopes, RoutePolicy};

pub use authority::TokenAuthority;
pub use authorizer::ScopeAuthorizer;
pub use policy::{ScopePolicy, ScopePolicyBuilder};
pub use token_error::TokenError;

// Configuration exports
pub use config::SecurityConfig;
pub use config_error::ConfigError;
pub use secret_string::SecretString;
