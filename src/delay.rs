//! Delay spec parsing
//!
//! The `-d/--delay` argument is either a fixed number of seconds or a
//! `MIN-MAX` range from which a value is drawn uniformly. Only the
//! power-cycle operation consults it.

use crate::error::{ChaosError, Result};
use rand::Rng;

/// Seconds to wait between stop and start when no delay is given.
pub const DEFAULT_DELAY_SECS: u64 = 60;

/// Parse an optional delay spec, drawing from the given random source
/// when the spec is a range. Ranges are inclusive of both endpoints.
pub fn parse_delay<R: Rng + ?Sized>(spec: Option<&str>, rng: &mut R) -> Result<u64> {
    let Some(spec) = spec else {
        return Ok(DEFAULT_DELAY_SECS);
    };
    let spec = spec.trim();

    // Fixed value first; anything that isn't a whole integer is treated
    // as a range spec.
    if let Ok(n) = spec.parse::<i64>() {
        if n <= 0 {
            return Err(ChaosError::config(format!(
                "delay must be a positive number of seconds, got {n}"
            )));
        }
        return Ok(n as u64);
    }

    let Some((min, max)) = spec.split_once('-') else {
        return Err(ChaosError::config(format!(
            "invalid delay '{spec}': expected seconds or a MIN-MAX range"
        )));
    };

    let (Ok(min), Ok(max)) = (min.trim().parse::<i64>(), max.trim().parse::<i64>()) else {
        return Err(ChaosError::config(format!(
            "invalid delay range '{spec}': range requires two numbers of the form MIN-MAX"
        )));
    };

    if max <= min {
        return Err(ChaosError::config(format!(
            "invalid delay range '{spec}': range must be MIN-MAX with MAX strictly greater than MIN"
        )));
    }
    if min <= 0 {
        return Err(ChaosError::config(format!(
            "invalid delay range '{spec}': MIN must be positive"
        )));
    }

    Ok(rng.random_range(min..=max) as u64)
}
