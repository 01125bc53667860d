//! Azure Resource Manager interaction module
//!
//! This module provides the core functionality for talking to Azure:
//! token acquisition, the HTTP layer, and the management client used
//! for VM listing and power operations.
//!
//! # Module Structure
//!
//! - [`auth`] - OAuth2 client-credentials token acquisition
//! - [`client`] - Management client for VM listing and power operations
//! - [`http`] - HTTP utilities for REST API calls

pub mod auth;
pub mod client;
pub mod http;
