//! Operation pipeline
//!
//! The ordered sequence of one chaos run: authenticate, derive
//! credentials, build the client, resolve the target VM, then perform
//! the power operation (stop/delay/start for a power cycle). Every
//! step is fail-fast; there are no retries and no rollback.

use crate::arm::auth::{self, TokenCredentials};
use crate::arm::client::{ArmClient, PowerOp};
use crate::arm::http::ArmHttpClient;
use crate::error::Result;
use crate::select;
use std::time::Duration;

/// How the target VM is chosen.
#[derive(Debug, Clone)]
pub enum Target {
    /// Operate on this exact VM; no listing call is made.
    Explicit(String),
    /// List the resource group and pick at random, optionally narrowed
    /// by a regex pattern.
    Random { pattern: Option<String> },
}

/// The operation to perform on the resolved VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationSpec {
    Start,
    Stop,
    Restart,
    /// Stop, wait `delay_secs`, then start.
    PowerCycle { delay_secs: u64 },
}

/// Everything one run needs. Built by the CLI front-end, consumed by
/// [`run`]; nothing survives the process.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub tenant_id: String,
    pub subscription_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub resource_group: String,
    pub target: Target,
    pub operation: OperationSpec,
    /// Azure AD authority host, overridable for tests/sovereign clouds.
    pub authority: String,
    /// Management endpoint base, overridable for tests/sovereign clouds.
    pub management_endpoint: String,
}

/// Execute one chaos run end to end.
pub async fn run(config: &RunConfig) -> Result<()> {
    let http = ArmHttpClient::new().map_err(crate::error::ChaosError::api)?;

    // Step 1: authenticate. A failure here aborts before any other call.
    let token = auth::acquire_token(
        &http,
        &config.authority,
        &config.tenant_id,
        &config.client_id,
        &config.client_secret,
    )
    .await?;

    // Steps 2-3: derive credentials and bind the client. Pure.
    let credentials = TokenCredentials::new(&config.subscription_id, token);
    let client = ArmClient::new(credentials, http, &config.management_endpoint);

    // Step 4: resolve the target VM.
    let vm = resolve_target(&client, config).await?;
    tracing::info!("target VM: '{}'", vm);

    // Steps 5-7: perform the operation(s).
    match config.operation {
        OperationSpec::Start => client.power_op(&config.resource_group, &vm, PowerOp::Start).await,
        OperationSpec::Stop => {
            client
                .power_op(&config.resource_group, &vm, PowerOp::PowerOff)
                .await
        }
        OperationSpec::Restart => {
            client
                .power_op(&config.resource_group, &vm, PowerOp::Restart)
                .await
        }
        OperationSpec::PowerCycle { delay_secs } => {
            client
                .power_op(&config.resource_group, &vm, PowerOp::PowerOff)
                .await?;

            tracing::info!("waiting {}s before starting '{}'", delay_secs, vm);
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;

            if let Err(e) = client.power_op(&config.resource_group, &vm, PowerOp::Start).await {
                // No rollback: the stop already happened.
                tracing::error!("start after power-cycle stop failed; VM '{}' is left stopped", vm);
                return Err(e);
            }
            Ok(())
        }
    }
}

/// Resolve the VM name to operate on. Explicit targets pass through
/// without touching the network.
async fn resolve_target(client: &ArmClient, config: &RunConfig) -> Result<String> {
    match &config.target {
        Target::Explicit(name) => Ok(name.clone()),
        Target::Random { pattern } => {
            let vms = client.list_vm_names(&config.resource_group).await?;
            select::pick(&vms, pattern.as_deref(), &mut rand::rng())
        }
    }
}
