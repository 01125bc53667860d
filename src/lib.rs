//! azchaos - chaos testing for Azure virtual machines
//!
//! Single-shot fault injection: authenticate a service principal,
//! resolve a target VM in a resource group (explicit or random,
//! optionally regex-filtered), and start/stop/restart/power-cycle it.

pub mod arm;
pub mod delay;
pub mod error;
pub mod pipeline;
pub mod select;
