//! Resource selection
//!
//! Picks the victim VM for a run: uniformly at random from the resource
//! group listing, optionally narrowed by a regex filter first.

use crate::error::{ChaosError, Result};
use rand::seq::IndexedRandom;
use rand::Rng;
use regex::Regex;

/// Pick one VM name, uniformly at random, from `vms` (or from the
/// subset matching `pattern` when given). Pattern matching uses
/// unanchored search semantics, so `web` matches `prod-web-01`.
pub fn pick<R: Rng + ?Sized>(
    vms: &[String],
    pattern: Option<&str>,
    rng: &mut R,
) -> Result<String> {
    match pattern {
        None => vms
            .choose(rng)
            .cloned()
            .ok_or_else(|| ChaosError::selection("resource group contains no virtual machines")),
        Some(pattern) => {
            let re = Regex::new(pattern).map_err(|e| {
                ChaosError::config(format!("invalid resource match pattern '{pattern}': {e}"))
            })?;
            let matched: Vec<&String> = vms.iter().filter(|name| re.is_match(name)).collect();
            tracing::debug!(
                "{} of {} virtual machines match pattern '{}'",
                matched.len(),
                vms.len(),
                pattern
            );
            matched
                .choose(rng)
                .map(|name| (*name).clone())
                .ok_or_else(|| {
                    ChaosError::selection(format!(
                        "no virtual machines matched pattern '{pattern}'"
                    ))
                })
        }
    }
}
