use crate::errors::{ApiError, HttpError, Result};
use lb_core::{FromApi, LoadBalancer, Member, Pool};
use log::{debug, info, trace, warn};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::collections::HashSet;
use url::Url;

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Mask a secret for logging, keeping the first and last four characters
pub fn mask_secret(secret: &str) -> String {
    let chars = secret.chars().count();
    let head: String = secret.chars().take(4).collect();
    let tail: String = if chars > 4 {
        secret.chars().skip(chars.saturating_sub(4).max(4)).collect()
    } else {
        String::new()
    };
    format!("{}...{}", head, tail)
}

/// Octavia publishes its API under a version prefix that the catalog URL may
/// or may not include.
pub fn versioned_endpoint(endpoint: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    if base.ends_with("/v2") || base.ends_with("/v2.0") {
        base.to_string()
    } else {
        format!("{}/v2", base)
    }
}

/// Handle HTTP response and convert errors
pub async fn handle_response(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        debug!("Request successful with status: {}", status);
        return Ok(response);
    }

    let url = response.url().to_string();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    warn!("Request failed with status: {}", status);
    debug!("Error response body: {}", error_text);

    let api_error = match status {
        StatusCode::UNAUTHORIZED => HttpError::AuthenticationFailed,
        StatusCode::FORBIDDEN => HttpError::Forbidden,
        StatusCode::NOT_FOUND => HttpError::NotFound(url),
        StatusCode::TOO_MANY_REQUESTS => HttpError::RateLimited,
        StatusCode::SERVICE_UNAVAILABLE => HttpError::ServiceUnavailable,
        StatusCode::REQUEST_TIMEOUT => HttpError::Timeout,
        _ => HttpError::HttpError {
            status: status.as_u16(),
            message: error_text,
        },
    };

    Err(ApiError::Http(api_error))
}

/// HTTP client for the Octavia load-balancer API
#[derive(Debug, Clone)]
pub struct OctaviaClient {
    client: Client,
    token: String,
    base_url: String,
}

impl OctaviaClient {
    /// Create a client for an (unversioned or versioned) Octavia endpoint
    pub fn new(client: Client, endpoint: &str, token: String) -> Self {
        let base_url = versioned_endpoint(endpoint);

        debug!("Creating OctaviaClient");
        debug!("  Token: {}", mask_secret(&token));
        debug!("  Base URL: {}", base_url);

        Self {
            client,
            token,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Url> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        let mut url = Url::parse(&url)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Make a GET request
    async fn get(&self, url: Url) -> Result<Response> {
        debug!("HTTP GET request to: {}", url);
        trace!("  {}: {}", AUTH_TOKEN_HEADER, mask_secret(&self.token));

        let response = self
            .client
            .get(url)
            .header(AUTH_TOKEN_HEADER, &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!("GET request failed: {:?}", e);
                HttpError::Request(e)
            })?;

        debug!("Response status: {}", response.status());

        handle_response(response).await
    }

    /// Fetch every item of a collection, following `<key>_links` next links.
    async fn get_collection(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        key: &str,
    ) -> Result<Vec<Value>> {
        let links_key = format!("{}_links", key);
        let mut next = Some(self.url(endpoint, query)?);
        let mut visited = HashSet::new();
        let mut items = Vec::new();

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                return Err(ApiError::PaginationLoop(url.to_string()));
            }

            let response = self.get(url.clone()).await?;
            let mut page: Value = response.json().await.map_err(HttpError::Request)?;

            match page.get_mut(key).map(Value::take) {
                Some(Value::Array(page_items)) => items.extend(page_items),
                _ => {
                    return Err(ApiError::Core(lb_core::CoreError::InvalidResource(format!(
                        "response from {} has no '{}' list",
                        url, key
                    ))))
                }
            }

            next = next_link(&page, &links_key)?;
        }

        trace!("Collected {} {}", items.len(), key);
        Ok(items)
    }

    async fn list<T: FromApi>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        key: &str,
    ) -> Result<Vec<T>> {
        let raw = self.get_collection(endpoint, query, key).await?;
        let items = raw
            .into_iter()
            .map(T::from_api)
            .collect::<lb_core::Result<Vec<T>>>()?;
        Ok(items)
    }

    /// Get load balancers, optionally restricted to one project
    pub async fn get_load_balancers(&self, project_id: Option<&str>) -> Result<Vec<LoadBalancer>> {
        debug!("Fetching load balancers");
        // An empty project id means every project visible to the credentials
        let query: Vec<(&str, &str)> = project_id
            .filter(|id| !id.is_empty())
            .map(|id| ("project_id", id))
            .into_iter()
            .collect();
        let load_balancers: Vec<LoadBalancer> =
            self.list("lbaas/loadbalancers", &query, "loadbalancers").await?;

        info!("Successfully fetched {} load balancers", load_balancers.len());
        Ok(load_balancers)
    }

    /// Get the pools of one load balancer
    pub async fn get_pools(&self, load_balancer_id: &str) -> Result<Vec<Pool>> {
        debug!("Fetching pools for load balancer {}", load_balancer_id);
        let pools: Vec<Pool> = self
            .list("lbaas/pools", &[("loadbalancer_id", load_balancer_id)], "pools")
            .await?;

        let pools: Vec<Pool> = pools
            .into_iter()
            .map(|mut pool| {
                pool.loadbalancer_id
                    .get_or_insert_with(|| load_balancer_id.to_string());
                pool
            })
            .collect();

        info!("Successfully fetched {} pools", pools.len());
        Ok(pools)
    }

    /// Get the members of one pool
    pub async fn get_members(&self, pool_id: &str) -> Result<Vec<Member>> {
        debug!("Fetching members for pool {}", pool_id);
        let endpoint = format!("lbaas/pools/{}/members", pool_id);
        let members: Vec<Member> = self.list(&endpoint, &[], "members").await?;

        let members: Vec<Member> = members
            .into_iter()
            .map(|mut member| {
                member.pool_id.get_or_insert_with(|| pool_id.to_string());
                member
            })
            .collect();

        info!("Successfully fetched {} members", members.len());
        Ok(members)
    }
}

fn next_link(page: &Value, links_key: &str) -> Result<Option<Url>> {
    let href = page
        .get(links_key)
        .and_then(Value::as_array)
        .and_then(|links| {
            links
                .iter()
                .find(|link| link.get("rel").and_then(Value::as_str) == Some("next"))
        })
        .and_then(|link| link.get("href"))
        .and_then(Value::as_str);

    match href {
        Some(href) => Ok(Some(Url::parse(href)?)),
        None => Ok(None),
    }
}
