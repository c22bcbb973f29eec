//! Keystone v3 token authentication and service catalog lookup.

use crate::client::{handle_response, mask_secret};
use crate::config::{AuthConfig, AuthType, CloudConfig};
use crate::errors::{ApiError, HttpError, Result};
use chrono::{DateTime, Utc};
use log::{debug, info, trace};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";
const DEFAULT_DOMAIN: &str = "Default";

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEndpoint {
    pub interface: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub region_id: Option<String>,
    pub url: String,
}

impl CatalogEndpoint {
    fn in_region(&self, region: &str) -> bool {
        self.region.as_deref() == Some(region) || self.region_id.as_deref() == Some(region)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    expires_at: Option<String>,
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
    #[serde(default)]
    project: Option<ProjectRef>,
}

#[derive(Debug, Deserialize)]
struct ProjectRef {
    id: String,
}

/// An issued Keystone token together with its service catalog
#[derive(Debug, Clone)]
pub struct Token {
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub catalog: Vec<CatalogEntry>,
}

impl Token {
    /// Find the endpoint URL of a service, optionally restricted to a region.
    pub fn endpoint_for(
        &self,
        service_type: &str,
        interface: &str,
        region: Option<&str>,
    ) -> Option<&str> {
        self.catalog
            .iter()
            .filter(|entry| entry.service_type == service_type)
            .flat_map(|entry| entry.endpoints.iter())
            .find(|endpoint| {
                endpoint.interface == interface && region.map_or(true, |r| endpoint.in_region(r))
            })
            .map(|endpoint| endpoint.url.as_str())
    }
}

/// The identity v3 base URL for a configured `auth_url`
pub fn identity_v3_url(auth_url: &str) -> String {
    let base = auth_url.trim_end_matches('/');
    if base.ends_with("/v3") {
        base.to_string()
    } else {
        format!("{}/v3", base)
    }
}

fn domain_ref(id: Option<&String>, name: Option<&String>) -> Value {
    match (id, name) {
        (Some(id), _) => json!({ "id": id }),
        (None, Some(name)) => json!({ "name": name }),
        (None, None) => json!({ "name": DEFAULT_DOMAIN }),
    }
}

fn project_scope(auth: &AuthConfig) -> Option<Value> {
    if let Some(project_id) = &auth.project_id {
        return Some(json!({ "project": { "id": project_id } }));
    }

    auth.project_name.as_ref().map(|project_name| {
        // Project domain falls back to the user's domain
        let domain = domain_ref(
            auth.project_domain_id.as_ref().or(auth.user_domain_id.as_ref()),
            auth.project_domain_name
                .as_ref()
                .or(auth.user_domain_name.as_ref()),
        );
        json!({ "project": { "name": project_name, "domain": domain } })
    })
}

/// Request body for `POST /v3/auth/tokens`
pub fn build_auth_request(config: &CloudConfig) -> Value {
    let auth = &config.auth;

    match config.auth_type {
        AuthType::ApplicationCredential => json!({
            "auth": {
                "identity": {
                    "methods": ["application_credential"],
                    "application_credential": {
                        "id": auth.application_credential_id,
                        "secret": auth.application_credential_secret,
                    }
                }
            }
        }),
        AuthType::Password => {
            let user = match &auth.user_id {
                Some(user_id) => json!({ "id": user_id, "password": auth.password }),
                None => json!({
                    "name": auth.username,
                    "domain": domain_ref(auth.user_domain_id.as_ref(), auth.user_domain_name.as_ref()),
                    "password": auth.password,
                }),
            };

            let mut body = json!({
                "auth": {
                    "identity": {
                        "methods": ["password"],
                        "password": { "user": user }
                    }
                }
            });

            if let Some(scope) = project_scope(auth) {
                body["auth"]["scope"] = scope;
            }

            body
        }
    }
}

/// Issue a token for the configured credentials.
pub async fn authenticate(client: &Client, config: &CloudConfig) -> Result<Token> {
    let auth_url = config
        .auth
        .auth_url
        .as_deref()
        .ok_or_else(|| ApiError::Auth("auth_url is not configured".to_string()))?;
    let url = format!("{}/auth/tokens", identity_v3_url(auth_url));

    debug!("Authenticating against {}", url);
    trace!("Auth method: {:?}", config.auth_type);

    let response = client
        .post(&url)
        .json(&build_auth_request(config))
        .send()
        .await
        .map_err(HttpError::Request)?;
    let response = handle_response(response).await?;

    let value = response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .ok_or_else(|| ApiError::Auth(format!("response has no {} header", SUBJECT_TOKEN_HEADER)))?;

    let body: TokenResponse = response.json().await.map_err(HttpError::Request)?;

    let expires_at = body
        .token
        .expires_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    info!("Authenticated to cloud '{}'", config.name);
    debug!("  Token: {}", mask_secret(&value));
    if let Some(expires_at) = expires_at {
        debug!("  Expires at: {}", expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    debug!("  Catalog entries: {}", body.token.catalog.len());

    match &body.token.project {
        Some(project) => debug!("  Scoped to project: {}", project.id),
        None => debug!("  Token is not project scoped"),
    }

    Ok(Token {
        value,
        expires_at,
        catalog: body.token.catalog,
    })
}
