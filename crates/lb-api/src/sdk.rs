use crate::auth::{authenticate, Token};
use crate::client::OctaviaClient;
use crate::config::CloudConfig;
use crate::errors::{ApiError, HttpError, Result};
use lb_core::{LoadBalancer, Member, Pool};
use log::debug;
use reqwest::{Certificate, Client};
use std::time::Duration;

/// Service type of Octavia in the Keystone catalog
pub const LOAD_BALANCER_SERVICE: &str = "load-balancer";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only view of the load-balancing service.
///
/// Every call is awaited before the next one is issued; implementations
/// never see two requests in flight.
#[allow(async_fn_in_trait)]
pub trait LoadBalancerApi {
    type Error: std::error::Error + Send + Sync + 'static;

    /// List load balancers, restricted to one project when given
    async fn list_load_balancers(
        &self,
        project_id: Option<&str>,
    ) -> std::result::Result<Vec<LoadBalancer>, Self::Error>;

    async fn list_pools(
        &self,
        load_balancer_id: &str,
    ) -> std::result::Result<Vec<Pool>, Self::Error>;

    async fn list_members(&self, pool_id: &str) -> std::result::Result<Vec<Member>, Self::Error>;
}

/// An authenticated connection to one cloud's load-balancing service
pub struct Connection {
    cloud: String,
    client: OctaviaClient,
}

impl Connection {
    /// Authenticate and locate the load-balancer endpoint.
    pub async fn connect(config: &CloudConfig) -> Result<Self> {
        debug!("Connecting to cloud '{}'", config.name);
        let http = build_http_client(config)?;
        let token = authenticate(&http, config).await?;
        let endpoint = resolve_endpoint(config, &token)?;
        debug!("Using load-balancer endpoint {}", endpoint);

        Ok(Self {
            cloud: config.name.clone(),
            client: OctaviaClient::new(http, &endpoint, token.value),
        })
    }

    pub fn cloud(&self) -> &str {
        &self.cloud
    }

    pub fn endpoint(&self) -> &str {
        self.client.base_url()
    }
}

impl LoadBalancerApi for Connection {
    type Error = ApiError;

    async fn list_load_balancers(&self, project_id: Option<&str>) -> Result<Vec<LoadBalancer>> {
        self.client.get_load_balancers(project_id).await
    }

    async fn list_pools(&self, load_balancer_id: &str) -> Result<Vec<Pool>> {
        self.client.get_pools(load_balancer_id).await
    }

    async fn list_members(&self, pool_id: &str) -> Result<Vec<Member>> {
        self.client.get_members(pool_id).await
    }
}

fn build_http_client(config: &CloudConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("lb-treeview/", env!("CARGO_PKG_VERSION")));

    if !config.verify {
        debug!("TLS certificate verification disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(cacert) = &config.cacert {
        debug!("Adding CA certificate from {}", cacert.display());
        let pem = std::fs::read(cacert)?;
        let certificate = Certificate::from_pem(&pem).map_err(HttpError::Request)?;
        builder = builder.add_root_certificate(certificate);
    }

    Ok(builder.build().map_err(HttpError::Request)?)
}

fn resolve_endpoint(config: &CloudConfig, token: &Token) -> Result<String> {
    if let Some(endpoint) = &config.endpoint_override {
        debug!("Load-balancer endpoint overridden by configuration");
        return Ok(endpoint.clone());
    }

    token
        .endpoint_for(
            LOAD_BALANCER_SERVICE,
            &config.interface,
            config.region_name.as_deref(),
        )
        .map(String::from)
        .ok_or_else(|| ApiError::EndpointNotFound {
            service_type: LOAD_BALANCER_SERVICE.to_string(),
            interface: config.interface.clone(),
            region: config.region_name.clone(),
        })
}
