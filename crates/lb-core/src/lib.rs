//! # lb-core
//!
//! Core domain logic for load balancer health trees.
//!
//! This crate contains pure logic with no I/O dependencies:
//! - Load balancer, pool and member models and their normalization
//! - Member health classification and status formatting
//! - Emphasis styles for terminal output
//! - The display-mode filter engine

pub mod errors;
pub mod filter;
pub mod models;
pub mod status;
pub mod style;
pub mod tree;

// Re-export commonly used types
pub use errors::{CoreError, Result};
pub use filter::{filter_pool, DisplayMode};
pub use models::{
    ApiLoadBalancerResponse, ApiMemberResponse, ApiPoolResponse, FromApi, LoadBalancer, Member,
    OperatingStatus, Pool, ProvisioningStatus,
};
pub use status::{format_status, is_problematic, Formatter, MemberStatusFormatter};
pub use style::{Emphasis, Styler};
pub use tree::{LoadBalancerNode, MemberListing, PoolListing, PoolNode};
