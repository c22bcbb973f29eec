use crate::models::Member;
use crate::style::{Emphasis, Styler};

/// Trait for formatting different types of data
pub trait Formatter<T> {
    fn format(&self, input: T) -> String;
}

/// A member needs attention unless it is both ACTIVE and ONLINE.
///
/// Missing statuses normalize to UNKNOWN, so they always count as problems.
pub fn is_problematic(member: &Member) -> bool {
    !member.provisioning_status.is_active() || !member.operating_status.is_online()
}

/// Formats a member as `name (provisioning: P | operating: O)`, emphasizing
/// the unhealthy half of the status.
pub struct MemberStatusFormatter {
    styler: Styler,
}

impl MemberStatusFormatter {
    pub fn new(styler: Styler) -> Self {
        Self { styler }
    }
}

impl Formatter<&Member> for MemberStatusFormatter {
    fn format(&self, member: &Member) -> String {
        let provisioning = member.provisioning_status.as_str();
        let provisioning = if member.provisioning_status.is_active() {
            provisioning.to_string()
        } else {
            self.styler.paint(Emphasis::Warning, provisioning)
        };

        let operating = member.operating_status.as_str();
        let operating = if member.operating_status.is_online() {
            operating.to_string()
        } else {
            self.styler.paint(Emphasis::Critical, operating)
        };

        format!(
            "{} (provisioning: {} | operating: {})",
            member.display_name(),
            provisioning,
            operating
        )
    }
}

// Convenience function
pub fn format_status(member: &Member, styler: Styler) -> String {
    MemberStatusFormatter::new(styler).format(member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OperatingStatus, ProvisioningStatus};

    fn member(prov: Option<&str>, oper: Option<&str>) -> Member {
        Member {
            id: "m-1".to_string(),
            name: Some("web-1".to_string()),
            provisioning_status: prov.map(String::from).into(),
            operating_status: oper.map(String::from).into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_problematic_truth_table() {
        assert!(!is_problematic(&member(Some("ACTIVE"), Some("ONLINE"))));
        assert!(is_problematic(&member(Some("ACTIVE"), Some("OFFLINE"))));
        assert!(is_problematic(&member(Some("ACTIVE"), Some("DRAINING"))));
        assert!(is_problematic(&member(Some("ERROR"), Some("ONLINE"))));
        assert!(is_problematic(&member(Some("PENDING_UPDATE"), Some("ERROR"))));
    }

    #[test]
    fn test_missing_status_is_problematic() {
        assert!(is_problematic(&member(None, Some("ONLINE"))));
        assert!(is_problematic(&member(Some("ACTIVE"), None)));
        assert!(is_problematic(&Member::default()));
    }

    #[test]
    fn test_format_healthy_member_has_no_emphasis() {
        let m = member(Some("ACTIVE"), Some("ONLINE"));
        let formatted = format_status(&m, Styler::ansi());
        assert_eq!(formatted, "web-1 (provisioning: ACTIVE | operating: ONLINE)");
        assert!(!formatted.contains('\x1b'));
    }

    #[test]
    fn test_format_unhealthy_member_emphasis() {
        let m = member(Some("ERROR"), Some("OFFLINE"));
        let formatted = format_status(&m, Styler::ansi());
        assert_eq!(
            formatted,
            "web-1 (provisioning: \x1b[93m\x1b[1mERROR\x1b[0m | operating: \x1b[91mOFFLINE\x1b[0m)"
        );

        let plain = format_status(&m, Styler::plain());
        assert_eq!(plain, "web-1 (provisioning: ERROR | operating: OFFLINE)");
    }

    #[test]
    fn test_format_falls_back_to_id() {
        let m = Member {
            id: "m-42".to_string(),
            name: None,
            provisioning_status: ProvisioningStatus::Active,
            operating_status: OperatingStatus::Draining,
            ..Default::default()
        };
        assert_eq!(
            format_status(&m, Styler::plain()),
            "m-42 (provisioning: ACTIVE | operating: DRAINING)"
        );
    }
}
