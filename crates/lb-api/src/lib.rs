//! # lb-api
//!
//! OpenStack client for lb-treeview.
//! Resolves cloud credentials, authenticates against Keystone and reads
//! load balancers, pools and members from the Octavia API.

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod sdk;

// Re-export common types for convenience
pub use auth::Token;
pub use client::OctaviaClient;
pub use config::{AuthConfig, AuthType, CloudConfig, ConfigError, DEFAULT_CLOUD};
pub use errors::{ApiError, HttpError, Result};
pub use sdk::{Connection, LoadBalancerApi, LOAD_BALANCER_SERVICE};
