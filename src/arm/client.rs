//! Azure Resource Manager client
//!
//! Binds credentials to a management endpoint and exposes the two
//! operations the tool needs: listing the VMs of a resource group and
//! issuing power operations against a named VM.

use super::auth::TokenCredentials;
use super::http::ArmHttpClient;
use crate::error::{ChaosError, Result};
use anyhow::Context;
use serde_json::Value;

/// Default public-cloud management endpoint.
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// Compute provider API version used for all calls.
const COMPUTE_API_VERSION: &str = "2023-07-01";

/// Power operation against a single VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerOp {
    Start,
    PowerOff,
    Restart,
}

impl PowerOp {
    /// ARM action segment for this operation.
    fn action(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::PowerOff => "powerOff",
            Self::Restart => "restart",
        }
    }
}

impl std::fmt::Display for PowerOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.action())
    }
}

/// Main ARM client
#[derive(Clone)]
pub struct ArmClient {
    pub credentials: TokenCredentials,
    pub http: ArmHttpClient,
    endpoint: String,
}

impl ArmClient {
    /// Bind credentials to a management endpoint
    pub fn new(credentials: TokenCredentials, http: ArmHttpClient, endpoint: &str) -> Self {
        Self {
            credentials,
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Build a Compute provider URL under the given resource group
    fn compute_url(&self, resource_group: &str, path: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/{}?api-version={}",
            self.endpoint,
            urlencoding::encode(&self.credentials.subscription_id),
            urlencoding::encode(resource_group),
            path,
            COMPUTE_API_VERSION
        )
    }

    /// List the names of all VMs in a resource group, following
    /// `nextLink` pagination transparently
    pub async fn list_vm_names(&self, resource_group: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut url = self.compute_url(resource_group, "virtualMachines");

        loop {
            let response = self
                .http
                .get(&url, &self.credentials.authorization())
                .await
                .with_context(|| format!("failed to list VMs in resource group '{resource_group}'"))
                .map_err(ChaosError::api)?;

            names.extend(extract_vm_names(&response));

            match response.get("nextLink").and_then(|v| v.as_str()) {
                Some(next) => url = next.to_string(),
                None => break,
            }
        }

        tracing::info!(
            "resource group '{}' contains {} virtual machines",
            resource_group,
            names.len()
        );
        Ok(names)
    }

    /// Issue a power operation against a named VM
    pub async fn power_op(&self, resource_group: &str, vm: &str, op: PowerOp) -> Result<()> {
        let url = self.compute_url(
            resource_group,
            &format!("virtualMachines/{}/{}", urlencoding::encode(vm), op.action()),
        );

        self.http
            .post(&url, &self.credentials.authorization(), None)
            .await
            .with_context(|| format!("failed to {op} VM '{vm}' in resource group '{resource_group}'"))
            .map_err(ChaosError::api)?;

        tracing::info!("issued {} for VM '{}'", op, vm);
        Ok(())
    }
}

/// Pull VM names out of one page of a list response
fn extract_vm_names(response: &Value) -> Vec<String> {
    response
        .get("value")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|vm| vm.get("name").and_then(|n| n.as_str()))
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_names_from_list_page() {
        let page = json!({
            "value": [
                {"name": "web-1", "location": "westeurope"},
                {"name": "db-1", "location": "westeurope"},
                {"location": "westeurope"}
            ]
        });
        assert_eq!(extract_vm_names(&page), vec!["web-1", "db-1"]);
    }

    #[test]
    fn extract_names_tolerates_empty_page() {
        assert!(extract_vm_names(&json!({})).is_empty());
        assert!(extract_vm_names(&json!({"value": []})).is_empty());
    }

    #[test]
    fn power_op_actions_match_arm() {
        assert_eq!(PowerOp::Start.action(), "start");
        assert_eq!(PowerOp::PowerOff.action(), "powerOff");
        assert_eq!(PowerOp::Restart.action(), "restart");
    }
}
