//! The fetched hierarchy for one load balancer.
//!
//! Fetch failures below the load-balancer list are recoverable, so they are
//! recorded in the tree as `Failed` branches instead of being propagated.

use crate::models::{LoadBalancer, Member, Pool};

/// Members of one pool, as far as they were fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberListing {
    /// Collapse mode: members were never requested
    Collapsed,
    Listed(Vec<Member>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolNode {
    pub pool: Pool,
    pub members: MemberListing,
}

impl PoolNode {
    pub fn new(pool: Pool, members: MemberListing) -> Self {
        Self { pool, members }
    }
}

/// Pools of one load balancer, as far as they were fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolListing {
    Listed(Vec<PoolNode>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadBalancerNode {
    pub load_balancer: LoadBalancer,
    pub pools: PoolListing,
}

impl LoadBalancerNode {
    pub fn new(load_balancer: LoadBalancer, pools: PoolListing) -> Self {
        Self {
            load_balancer,
            pools,
        }
    }

    /// Number of pools that were listed, zero when the listing failed
    pub fn pool_count(&self) -> usize {
        match &self.pools {
            PoolListing::Listed(pools) => pools.len(),
            PoolListing::Failed(_) => 0,
        }
    }
}
