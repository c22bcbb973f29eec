//! Walks load balancers, pools and members through a [`LoadBalancerApi`]
//! and renders the resulting tree.
//!
//! Requests are strictly sequential and depth-first: a load balancer's pools
//! and their members are all fetched before the next load balancer is
//! touched. Only the initial load balancer listing is fatal; pool and member
//! failures become error leaves (or are dropped in filter mode).

use crate::errors::{CliError, Result};
use crate::render::TreeRenderer;
use lb_api::LoadBalancerApi;
use lb_core::{
    DisplayMode, LoadBalancer, LoadBalancerNode, MemberListing, PoolListing, PoolNode, Styler,
};
use log::{debug, warn};
use std::io::Write;

pub const NO_LOAD_BALANCERS: &str = "No loadbalancers found in the project.";

#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub project_id: Option<String>,
    pub mode: DisplayMode,
}

/// Counts reported after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeSummary {
    pub load_balancers: usize,
    pub rendered: usize,
}

impl TreeSummary {
    pub fn hidden(&self) -> usize {
        self.load_balancers - self.rendered
    }
}

pub async fn print_tree<A, W>(
    api: &A,
    options: &TreeOptions,
    styler: Styler,
    out: &mut W,
) -> Result<TreeSummary>
where
    A: LoadBalancerApi,
    W: Write,
{
    let mode = options.mode;
    // An empty project id lists every project visible to the credentials
    let project_id = options.project_id.as_deref().filter(|id| !id.is_empty());
    let load_balancers = api
        .list_load_balancers(project_id)
        .await
        .map_err(|e| CliError::ListLoadBalancers(Box::new(e)))?;

    let mut summary = TreeSummary {
        load_balancers: load_balancers.len(),
        rendered: 0,
    };

    if load_balancers.is_empty() {
        writeln!(out, "{}", NO_LOAD_BALANCERS)?;
        return Ok(summary);
    }

    debug!(
        "Found {} load balancers (filter: {}, collapse: {})",
        load_balancers.len(),
        mode.filter,
        mode.collapse
    );

    let renderer = TreeRenderer::new(styler);

    for load_balancer in load_balancers {
        if !mode.admits(&load_balancer) {
            debug!(
                "Skipping load balancer {} ({})",
                load_balancer.id, load_balancer.operating_status
            );
            continue;
        }

        debug!(
            "Load balancer {} (provisioning: {}, vip: {}, project: {})",
            load_balancer.id,
            load_balancer.provisioning_status,
            load_balancer.vip_address.as_deref().unwrap_or("-"),
            load_balancer.project_id.as_deref().unwrap_or("-")
        );
        let node = fetch_subtree(api, load_balancer, mode).await;

        if let Some(node) = mode.apply(node) {
            renderer.render(out, &node)?;
            summary.rendered += 1;
        }
    }

    Ok(summary)
}

async fn fetch_subtree<A: LoadBalancerApi>(
    api: &A,
    load_balancer: LoadBalancer,
    mode: DisplayMode,
) -> LoadBalancerNode {
    let pools = match api.list_pools(&load_balancer.id).await {
        Ok(pools) => pools,
        Err(e) => {
            warn!("Failed to list pools of {}: {}", load_balancer.id, e);
            return LoadBalancerNode::new(load_balancer, PoolListing::Failed(e.to_string()));
        }
    };

    let mut nodes = Vec::with_capacity(pools.len());
    for pool in pools {
        debug!(
            "Pool {} ({})",
            pool.id,
            pool.protocol.as_deref().unwrap_or("-")
        );
        let members = if mode.fetches_members() {
            match api.list_members(&pool.id).await {
                Ok(members) => MemberListing::Listed(members),
                Err(e) => {
                    warn!("Failed to list members of pool {}: {}", pool.id, e);
                    MemberListing::Failed(e.to_string())
                }
            }
        } else {
            MemberListing::Collapsed
        };
        nodes.push(PoolNode::new(pool, members));
    }

    LoadBalancerNode::new(load_balancer, PoolListing::Listed(nodes))
}
