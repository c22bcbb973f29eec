//! # lb-treeview
//!
//! Prints OpenStack load balancers as a tree of pools and members with
//! health highlighting.

pub mod cli;
pub mod display;
pub mod errors;
pub mod render;
pub mod treeview;

// Re-export main public types
pub use errors::{CliError, Result};
pub use render::TreeRenderer;
pub use treeview::{print_tree, TreeOptions, TreeSummary, NO_LOAD_BALANCERS};
