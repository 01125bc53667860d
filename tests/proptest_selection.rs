//! Property-based tests using proptest
//!
//! Randomized checks over the resource selector and the delay parser.

use azchaos::delay::parse_delay;
use azchaos::error::ChaosError;
use azchaos::select::pick;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Generate plausible VM names
fn arb_vm_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,20}"
}

fn arb_vm_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_vm_name(), 1..50)
}

proptest! {
    /// An unfiltered pick always returns a member of the input list
    #[test]
    fn pick_returns_a_member(vms in arb_vm_list(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let picked = pick(&vms, None, &mut rng).unwrap();
        prop_assert!(vms.contains(&picked));
    }

    /// A filtered pick returns a matching member, or a selection error
    /// exactly when nothing matches
    #[test]
    fn filtered_pick_matches_pattern(
        vms in arb_vm_list(),
        prefix in "[a-z]{1,3}",
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let pattern = format!("^{prefix}");
        let any_match = vms.iter().any(|v| v.starts_with(&prefix));

        match pick(&vms, Some(&pattern), &mut rng) {
            Ok(picked) => {
                prop_assert!(any_match);
                prop_assert!(vms.contains(&picked));
                prop_assert!(picked.starts_with(&prefix));
            }
            Err(ChaosError::Selection(_)) => prop_assert!(!any_match),
            Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
        }
    }

    /// Selection over a one-element list is deterministic
    #[test]
    fn single_element_always_selected(name in arb_vm_name(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let vms = vec![name.clone()];
        prop_assert_eq!(pick(&vms, None, &mut rng).unwrap(), name);
    }

    /// A fixed delay spec parses to itself
    #[test]
    fn fixed_delay_is_identity(n in 1i64..1_000_000, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let spec = n.to_string();
        prop_assert_eq!(parse_delay(Some(&spec), &mut rng).unwrap(), n as u64);
    }

    /// A range draw always lands inside the inclusive bounds
    #[test]
    fn range_draw_within_bounds(
        min in 1i64..1000,
        span in 1i64..1000,
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let max = min + span;
        let spec = format!("{min}-{max}");
        let drawn = parse_delay(Some(&spec), &mut rng).unwrap() as i64;
        prop_assert!((min..=max).contains(&drawn), "drew {} outside {}..={}", drawn, min, max);
    }

    /// Inverted or degenerate ranges are always configuration errors
    #[test]
    fn inverted_range_is_config_error(
        min in 1i64..1000,
        shrink in 0i64..1000,
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let max = min - shrink; // max <= min
        let spec = format!("{min}-{max}");
        prop_assert!(matches!(
            parse_delay(Some(&spec), &mut rng),
            Err(ChaosError::Config(_))
        ));
    }
}
