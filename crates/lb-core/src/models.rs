use crate::errors::{CoreError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Fallback label for a load balancer or pool with neither name nor id.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Fallback label for a member with neither name nor id.
pub const MEMBER_UNKNOWN_NAME: &str = "N/A";

/// Observed health of a resource, as reported by the load-balancing service.
///
/// Values the service may add in the future are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OperatingStatus {
    Online,
    Offline,
    Degraded,
    Error,
    Draining,
    NoMonitor,
    #[default]
    Unknown,
    Other(String),
}

impl OperatingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OperatingStatus::Online => "ONLINE",
            OperatingStatus::Offline => "OFFLINE",
            OperatingStatus::Degraded => "DEGRADED",
            OperatingStatus::Error => "ERROR",
            OperatingStatus::Draining => "DRAINING",
            OperatingStatus::NoMonitor => "NO_MONITOR",
            OperatingStatus::Unknown => "UNKNOWN",
            OperatingStatus::Other(s) => s,
        }
    }

    pub fn is_online(&self) -> bool {
        *self == OperatingStatus::Online
    }
}

impl From<&str> for OperatingStatus {
    fn from(s: &str) -> Self {
        match s {
            "ONLINE" => OperatingStatus::Online,
            "OFFLINE" => OperatingStatus::Offline,
            "DEGRADED" => OperatingStatus::Degraded,
            "ERROR" => OperatingStatus::Error,
            "DRAINING" => OperatingStatus::Draining,
            "NO_MONITOR" => OperatingStatus::NoMonitor,
            "UNKNOWN" => OperatingStatus::Unknown,
            other => OperatingStatus::Other(other.to_string()),
        }
    }
}

impl From<Option<String>> for OperatingStatus {
    fn from(s: Option<String>) -> Self {
        s.as_deref().map(OperatingStatus::from).unwrap_or_default()
    }
}

impl fmt::Display for OperatingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a resource as managed by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProvisioningStatus {
    Active,
    Deleted,
    Error,
    PendingCreate,
    PendingUpdate,
    PendingDelete,
    #[default]
    Unknown,
    Other(String),
}

impl ProvisioningStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProvisioningStatus::Active => "ACTIVE",
            ProvisioningStatus::Deleted => "DELETED",
            ProvisioningStatus::Error => "ERROR",
            ProvisioningStatus::PendingCreate => "PENDING_CREATE",
            ProvisioningStatus::PendingUpdate => "PENDING_UPDATE",
            ProvisioningStatus::PendingDelete => "PENDING_DELETE",
            ProvisioningStatus::Unknown => "UNKNOWN",
            ProvisioningStatus::Other(s) => s,
        }
    }

    pub fn is_active(&self) -> bool {
        *self == ProvisioningStatus::Active
    }
}

impl From<&str> for ProvisioningStatus {
    fn from(s: &str) -> Self {
        match s {
            "ACTIVE" => ProvisioningStatus::Active,
            "DELETED" => ProvisioningStatus::Deleted,
            "ERROR" => ProvisioningStatus::Error,
            "PENDING_CREATE" => ProvisioningStatus::PendingCreate,
            "PENDING_UPDATE" => ProvisioningStatus::PendingUpdate,
            "PENDING_DELETE" => ProvisioningStatus::PendingDelete,
            "UNKNOWN" => ProvisioningStatus::Unknown,
            other => ProvisioningStatus::Other(other.to_string()),
        }
    }
}

impl From<Option<String>> for ProvisioningStatus {
    fn from(s: Option<String>) -> Self {
        s.as_deref().map(ProvisioningStatus::from).unwrap_or_default()
    }
}

impl fmt::Display for ProvisioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn resolve_name<'a>(name: Option<&'a str>, id: &'a str, fallback: &'a str) -> &'a str {
    match name {
        Some(name) if !name.is_empty() => name,
        _ if !id.is_empty() => id,
        _ => fallback,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadBalancer {
    pub id: String,
    pub name: Option<String>,
    pub operating_status: OperatingStatus,
    pub provisioning_status: ProvisioningStatus,
    pub vip_address: Option<String>,
    pub project_id: Option<String>,
}

impl LoadBalancer {
    pub fn display_name(&self) -> &str {
        resolve_name(self.name.as_deref(), &self.id, UNKNOWN_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pool {
    pub id: String,
    pub name: Option<String>,
    /// Owning load balancer, by id only
    pub loadbalancer_id: Option<String>,
    pub protocol: Option<String>,
}

impl Pool {
    pub fn display_name(&self) -> &str {
        resolve_name(self.name.as_deref(), &self.id, UNKNOWN_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Member {
    pub id: String,
    pub name: Option<String>,
    pub provisioning_status: ProvisioningStatus,
    pub operating_status: OperatingStatus,
    pub address: Option<String>,
    pub protocol_port: Option<u16>,
    /// Owning pool, by id only
    pub pool_id: Option<String>,
}

impl Member {
    pub fn display_name(&self) -> &str {
        resolve_name(self.name.as_deref(), &self.id, MEMBER_UNKNOWN_NAME)
    }
}

// Raw API response structures. Every field is optional so that partially
// populated items still normalize into a canonical record.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ApiLoadBalancerResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub operating_status: Option<String>,
    #[serde(default)]
    pub provisioning_status: Option<String>,
    #[serde(default)]
    pub vip_address: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>, // Catch unknown fields
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiResourceRef {
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ApiPoolResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub loadbalancer_id: Option<String>,
    #[serde(default)]
    pub loadbalancers: Option<Vec<ApiResourceRef>>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ApiMemberResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub provisioning_status: Option<String>,
    #[serde(default)]
    pub operating_status: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub protocol_port: Option<u16>,
    #[serde(default)]
    pub pool_id: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl From<ApiLoadBalancerResponse> for LoadBalancer {
    fn from(raw: ApiLoadBalancerResponse) -> Self {
        LoadBalancer {
            id: raw.id.unwrap_or_default(),
            name: raw.name,
            operating_status: raw.operating_status.into(),
            provisioning_status: raw.provisioning_status.into(),
            vip_address: raw.vip_address,
            project_id: raw.project_id,
        }
    }
}

impl From<ApiPoolResponse> for Pool {
    fn from(raw: ApiPoolResponse) -> Self {
        // Octavia reports ownership as a list of references
        let loadbalancer_id = raw
            .loadbalancer_id
            .or_else(|| raw.loadbalancers.into_iter().flatten().next().map(|lb| lb.id));

        Pool {
            id: raw.id.unwrap_or_default(),
            name: raw.name,
            loadbalancer_id,
            protocol: raw.protocol,
        }
    }
}

impl From<ApiMemberResponse> for Member {
    fn from(raw: ApiMemberResponse) -> Self {
        Member {
            id: raw.id.unwrap_or_default(),
            name: raw.name,
            provisioning_status: raw.provisioning_status.into(),
            operating_status: raw.operating_status.into(),
            address: raw.address,
            protocol_port: raw.protocol_port,
            pool_id: raw.pool_id,
        }
    }
}

/// Normalizes one raw API item into its canonical record.
///
/// This is the only place that looks at the wire shape of a resource;
/// everything downstream works on `LoadBalancer`, `Pool` and `Member`.
pub trait FromApi: Sized {
    type Raw: DeserializeOwned + Into<Self>;

    fn from_api(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(CoreError::InvalidResource(format!(
                "expected an object, got {}",
                value
            )));
        }
        let raw: Self::Raw = serde_json::from_value(value)?;
        Ok(raw.into())
    }
}

impl FromApi for LoadBalancer {
    type Raw = ApiLoadBalancerResponse;
}

impl FromApi for Pool {
    type Raw = ApiPoolResponse;
}

impl FromApi for Member {
    type Raw = ApiMemberResponse;
}
