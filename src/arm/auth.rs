//! Azure authentication
//!
//! Exchanges a service-principal id + secret for a management-API access
//! token via the OAuth2 client-credentials grant, and wraps the result
//! in the credentials object the rest of the run uses.

use super::http::ArmHttpClient;
use crate::error::{ChaosError, Result};
use anyhow::Context;
use serde::Deserialize;

/// Audience the token is requested for.
pub const MANAGEMENT_RESOURCE: &str = "https://management.azure.com/";

/// Default Azure AD authority host.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Wire response from the token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Perform the client-credentials grant against
/// `{authority}/{tenant}/oauth2/token`. Any transport failure or
/// credential rejection is fatal; there is no retry.
pub async fn acquire_token(
    http: &ArmHttpClient,
    authority: &str,
    tenant_id: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<TokenResponse> {
    let url = format!(
        "{}/{}/oauth2/token",
        authority.trim_end_matches('/'),
        urlencoding::encode(tenant_id)
    );

    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("resource", MANAGEMENT_RESOURCE),
    ];

    let value = http
        .post_form(&url, &form)
        .await
        .map_err(ChaosError::auth)?;

    let token: TokenResponse = serde_json::from_value(value)
        .context("token endpoint returned an unexpected payload")
        .map_err(ChaosError::auth)?;

    tracing::info!("acquired {} token for tenant {}", token.token_type, tenant_id);
    Ok(token)
}

/// Credentials for management API calls, scoped to one subscription.
/// Built once per run and owned by the pipeline.
#[derive(Clone)]
pub struct TokenCredentials {
    pub subscription_id: String,
    token_type: String,
    access_token: String,
}

impl TokenCredentials {
    pub fn new(subscription_id: &str, token: TokenResponse) -> Self {
        Self {
            subscription_id: subscription_id.to_string(),
            token_type: token.token_type,
            access_token: token.access_token,
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}
