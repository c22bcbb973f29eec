//! Display-mode filtering.
//!
//! Filter mode keeps only the branches that need attention. Collapse mode
//! never looks at members, so when both are set, filtering falls back to the
//! load balancer's own operating status.

use crate::models::LoadBalancer;
use crate::status::is_problematic;
use crate::tree::{LoadBalancerNode, MemberListing, PoolListing, PoolNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayMode {
    /// Only show problems
    pub filter: bool,
    /// Never fetch or show members
    pub collapse: bool,
}

impl DisplayMode {
    pub fn new(filter: bool, collapse: bool) -> Self {
        Self { filter, collapse }
    }

    pub fn fetches_members(&self) -> bool {
        !self.collapse
    }

    /// Filtering at load-balancer granularity, used when member data is
    /// never fetched.
    pub fn filters_by_load_balancer(&self) -> bool {
        self.filter && self.collapse
    }

    /// Decides, before any of its pools are fetched, whether a load balancer
    /// can appear in the output at all.
    pub fn admits(&self, load_balancer: &LoadBalancer) -> bool {
        !self.filters_by_load_balancer() || !load_balancer.operating_status.is_online()
    }

    /// Applies the mode to a fetched subtree. `None` means the load balancer
    /// produces no output at all.
    pub fn apply(&self, node: LoadBalancerNode) -> Option<LoadBalancerNode> {
        if !self.filter {
            return Some(node);
        }
        if !self.admits(&node.load_balancer) {
            return None;
        }

        let pools = match node.pools {
            PoolListing::Listed(pools) => pools,
            PoolListing::Failed(_) => return None,
        };

        let pools: Vec<PoolNode> = if self.collapse {
            pools
        } else {
            pools.into_iter().filter_map(filter_pool).collect()
        };

        if pools.is_empty() {
            return None;
        }

        Some(LoadBalancerNode::new(
            node.load_balancer,
            PoolListing::Listed(pools),
        ))
    }
}

/// Keeps a pool that has no members or at least one problematic member,
/// narrowed down to the problematic members. A pool whose members could not
/// be fetched is dropped.
pub fn filter_pool(node: PoolNode) -> Option<PoolNode> {
    match node.members {
        MemberListing::Collapsed => Some(node),
        MemberListing::Failed(_) => None,
        MemberListing::Listed(members) if members.is_empty() => {
            Some(PoolNode::new(node.pool, MemberListing::Listed(members)))
        }
        MemberListing::Listed(members) => {
            let problematic: Vec<_> = members.into_iter().filter(is_problematic).collect();
            if problematic.is_empty() {
                None
            } else {
                Some(PoolNode::new(node.pool, MemberListing::Listed(problematic)))
            }
        }
    }
}
