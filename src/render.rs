//! Tree rendering.
//!
//! The renderer is mode-agnostic: collapse and filter decisions are already
//! encoded in the [`LoadBalancerNode`] it receives (collapsed member
//! listings, filtered-out branches removed).

use lb_core::{
    Emphasis, Formatter, LoadBalancerNode, MemberListing, MemberStatusFormatter, PoolListing,
    PoolNode, Styler,
};
use std::io::{self, Write};

pub const LOAD_BALANCER_GLYPH: &str = "📦";
pub const POOL_GLYPH: &str = "🏊";
pub const MEMBER_GLYPH: &str = "👤";

/// Connector in front of a pool line
pub fn pool_connector(is_last: bool) -> &'static str {
    if is_last {
        "  └─"
    } else {
        "  ├─"
    }
}

/// Connector in front of a leaf under a pool. The vertical bar continues
/// only while more pools follow the parent.
pub fn member_connector(parent_is_last: bool, is_last: bool) -> &'static str {
    match (parent_is_last, is_last) {
        (false, false) => "  │  ├─",
        (false, true) => "  │  └─",
        (true, false) => "     ├─",
        (true, true) => "     └─",
    }
}

fn id_label(id: &str) -> &str {
    if id.is_empty() {
        "N/A"
    } else {
        id
    }
}

pub struct TreeRenderer {
    styler: Styler,
    formatter: MemberStatusFormatter,
}

impl TreeRenderer {
    pub fn new(styler: Styler) -> Self {
        Self {
            styler,
            formatter: MemberStatusFormatter::new(styler),
        }
    }

    /// Render one load balancer subtree followed by a blank separator line.
    pub fn render<W: Write>(&self, out: &mut W, node: &LoadBalancerNode) -> io::Result<()> {
        let lb = &node.load_balancer;
        let header = format!("{} {}", LOAD_BALANCER_GLYPH, lb.display_name());
        writeln!(
            out,
            "{} (ID: {})",
            self.styler.paint(Emphasis::Header, &header),
            id_label(&lb.id)
        )?;

        match &node.pools {
            PoolListing::Failed(message) => {
                let text = format!("Error fetching pools: {}", message);
                writeln!(
                    out,
                    "{} {}",
                    pool_connector(true),
                    self.styler.paint(Emphasis::Error, &text)
                )?;
            }
            PoolListing::Listed(pools) if pools.is_empty() => {
                writeln!(
                    out,
                    "{} {}",
                    pool_connector(true),
                    self.styler.paint(Emphasis::Info, "No pools")
                )?;
            }
            PoolListing::Listed(pools) => {
                for (idx, pool) in pools.iter().enumerate() {
                    self.render_pool(out, pool, idx == pools.len() - 1)?;
                }
            }
        }

        writeln!(out)
    }

    fn render_pool<W: Write>(&self, out: &mut W, node: &PoolNode, is_last: bool) -> io::Result<()> {
        let pool = &node.pool;
        let label = format!("{} {}", POOL_GLYPH, pool.display_name());
        writeln!(
            out,
            "{} {} (ID: {})",
            pool_connector(is_last),
            self.styler.paint(Emphasis::Pool, &label),
            id_label(&pool.id)
        )?;

        match &node.members {
            MemberListing::Collapsed => Ok(()),
            MemberListing::Failed(message) => {
                let text = format!("Error fetching members: {}", message);
                writeln!(
                    out,
                    "{} {}",
                    member_connector(is_last, true),
                    self.styler.paint(Emphasis::Error, &text)
                )
            }
            MemberListing::Listed(members) if members.is_empty() => writeln!(
                out,
                "{} {}",
                member_connector(is_last, true),
                self.styler.paint(Emphasis::Info, "No members")
            ),
            MemberListing::Listed(members) => {
                for (idx, member) in members.iter().enumerate() {
                    writeln!(
                        out,
                        "{} {} {}",
                        member_connector(is_last, idx == members.len() - 1),
                        self.styler.paint(Emphasis::Marker, MEMBER_GLYPH),
                        self.formatter.format(member)
                    )?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lb_core::{LoadBalancer, Member, Pool};

    fn lb(id: &str) -> LoadBalancer {
        LoadBalancer {
            id: format!("{}-id", id),
            name: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn pool(id: &str) -> Pool {
        Pool {
            id: format!("{}-id", id),
            name: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn member(id: &str, prov: &str, oper: &str) -> Member {
        Member {
            id: id.to_string(),
            provisioning_status: prov.into(),
            operating_status: oper.into(),
            ..Default::default()
        }
    }

    fn render_plain(node: &LoadBalancerNode) -> String {
        let mut out = Vec::new();
        TreeRenderer::new(Styler::plain())
            .render(&mut out, node)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_member_connectors_follow_parent_position() {
        let node = LoadBalancerNode::new(
            lb("web"),
            PoolListing::Listed(vec![
                PoolNode::new(
                    pool("A"),
                    MemberListing::Listed(vec![
                        member("a1", "ACTIVE", "ONLINE"),
                        member("a2", "ACTIVE", "ONLINE"),
                    ]),
                ),
                PoolNode::new(
                    pool("B"),
                    MemberListing::Listed(vec![
                        member("b1", "ACTIVE", "ONLINE"),
                        member("b2", "ACTIVE", "ONLINE"),
                    ]),
                ),
            ]),
        );

        let expected = "\
📦 web (ID: web-id)
  ├─ 🏊 A (ID: A-id)
  │  ├─ 👤 a1 (provisioning: ACTIVE | operating: ONLINE)
  │  └─ 👤 a2 (provisioning: ACTIVE | operating: ONLINE)
  └─ 🏊 B (ID: B-id)
     ├─ 👤 b1 (provisioning: ACTIVE | operating: ONLINE)
     └─ 👤 b2 (provisioning: ACTIVE | operating: ONLINE)

";
        assert_eq!(render_plain(&node), expected);
    }

    #[test]
    fn test_empty_leaves() {
        let no_pools = LoadBalancerNode::new(lb("empty"), PoolListing::Listed(vec![]));
        assert_eq!(
            render_plain(&no_pools),
            "📦 empty (ID: empty-id)\n  └─ No pools\n\n"
        );

        let no_members = LoadBalancerNode::new(
            lb("web"),
            PoolListing::Listed(vec![
                PoolNode::new(pool("A"), MemberListing::Listed(vec![])),
                PoolNode::new(pool("B"), MemberListing::Listed(vec![])),
            ]),
        );
        assert_eq!(
            render_plain(&no_members),
            "📦 web (ID: web-id)\n  ├─ 🏊 A (ID: A-id)\n  │  └─ No members\n  └─ 🏊 B (ID: B-id)\n     └─ No members\n\n"
        );
    }

    #[test]
    fn test_error_leaves() {
        let pools_failed =
            LoadBalancerNode::new(lb("web"), PoolListing::Failed("503 upstream".to_string()));
        assert_eq!(
            render_plain(&pools_failed),
            "📦 web (ID: web-id)\n  └─ Error fetching pools: 503 upstream\n\n"
        );

        let members_failed = LoadBalancerNode::new(
            lb("web"),
            PoolListing::Listed(vec![
                PoolNode::new(pool("A"), MemberListing::Failed("timeout".to_string())),
                PoolNode::new(pool("B"), MemberListing::Collapsed),
            ]),
        );
        assert_eq!(
            render_plain(&members_failed),
            "📦 web (ID: web-id)\n  ├─ 🏊 A (ID: A-id)\n  │  └─ Error fetching members: timeout\n  └─ 🏊 B (ID: B-id)\n\n"
        );

        let last_pool_failed = LoadBalancerNode::new(
            lb("web"),
            PoolListing::Listed(vec![
                PoolNode::new(pool("A"), MemberListing::Collapsed),
                PoolNode::new(pool("B"), MemberListing::Failed("refused".to_string())),
            ]),
        );
        assert_eq!(
            render_plain(&last_pool_failed),
            "📦 web (ID: web-id)\n  ├─ 🏊 A (ID: A-id)\n  └─ 🏊 B (ID: B-id)\n     └─ Error fetching members: refused\n\n"
        );
    }

    #[test]
    fn test_collapsed_pools_have_no_member_lines() {
        let node = LoadBalancerNode::new(
            lb("web"),
            PoolListing::Listed(vec![PoolNode::new(pool("A"), MemberListing::Collapsed)]),
        );
        assert_eq!(render_plain(&node), "📦 web (ID: web-id)\n  └─ 🏊 A (ID: A-id)\n\n");
    }

    #[test]
    fn test_missing_identifiers() {
        let node = LoadBalancerNode::new(
            LoadBalancer::default(),
            PoolListing::Listed(vec![PoolNode::new(
                Pool::default(),
                MemberListing::Listed(vec![Member {
                    provisioning_status: "ACTIVE".into(),
                    operating_status: "ONLINE".into(),
                    ..Default::default()
                }]),
            )]),
        );
        assert_eq!(
            render_plain(&node),
            "📦 Unknown (ID: N/A)\n  └─ 🏊 Unknown (ID: N/A)\n     └─ 👤 N/A (provisioning: ACTIVE | operating: ONLINE)\n\n"
        );
    }

    #[test]
    fn test_ansi_emphasis() {
        let node = LoadBalancerNode::new(
            lb("web"),
            PoolListing::Listed(vec![PoolNode::new(
                pool("A"),
                MemberListing::Listed(vec![member("m", "ACTIVE", "OFFLINE")]),
            )]),
        );
        let mut out = Vec::new();
        TreeRenderer::new(Styler::ansi())
            .render(&mut out, &node)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("\x1b[1m\x1b[94m📦 web\x1b[0m (ID: web-id)\n"));
        assert!(text.contains("  └─ \x1b[92m🏊 A\x1b[0m (ID: A-id)\n"));
        assert!(text.contains(
            "     └─ \x1b[1m👤\x1b[0m m (provisioning: ACTIVE | operating: \x1b[91mOFFLINE\x1b[0m)\n"
        ));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let node = LoadBalancerNode::new(
            lb("web"),
            PoolListing::Listed(vec![
                PoolNode::new(
                    pool("A"),
                    MemberListing::Listed(vec![member("m", "ERROR", "OFFLINE")]),
                ),
                PoolNode::new(pool("B"), MemberListing::Failed("boom".to_string())),
            ]),
        );
        let renderer = TreeRenderer::new(Styler::ansi());

        let mut first = Vec::new();
        let mut second = Vec::new();
        renderer.render(&mut first, &node).unwrap();
        renderer.render(&mut second, &node).unwrap();

        assert_eq!(first, second);
    }
}
