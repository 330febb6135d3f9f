//! Pure progression rules: act derivation, glitch intensity, and ending
//! selection.
//!
//! These functions are deliberately free of state and side effects. The act
//! is always recomputed from the solved set -- never incremented -- which
//! makes `next_act` idempotent and monotonic over growing solved sets.

use rust_decimal::Decimal;
use timekeeper_types::{Act, Ending, PuzzleId};

use crate::catalog::{self, ACT3_ORDER};

/// Act-1 solves required to unlock act 2.
pub const ACT2_REQUIRED_ACT1_SOLVES: usize = 3;

/// Act-2 solves required (together with the act-1 requirement) for act 3.
pub const ACT3_REQUIRED_ACT2_SOLVES: usize = 2;

/// Once `judgment` is solved, idle time above this selects `departure`.
pub const ENDING_IDLE_MS: u64 = 20_000;

/// Cheat count above this selects `destruction`.
pub const ENDING_DESTRUCTION_CHEATS: u32 = 15;

/// Cheat count below this selects `acceptance` (the purist ending).
pub const ENDING_ACCEPTANCE_CHEATS: u32 = 2;

/// Derive the current act from the solved set.
///
/// - all act-3 puzzles solved => act 4;
/// - at least [`ACT3_REQUIRED_ACT2_SOLVES`] act-2 solves and
///   [`ACT2_REQUIRED_ACT1_SOLVES`] act-1 solves => act 3;
/// - at least [`ACT2_REQUIRED_ACT1_SOLVES`] act-1 solves => act 2;
/// - otherwise act 1.
pub fn next_act(solved: &[PuzzleId]) -> Act {
    let act1 = catalog::solved_count_in_act(Act::One, solved);
    let act2 = catalog::solved_count_in_act(Act::Two, solved);
    let act3 = catalog::solved_count_in_act(Act::Three, solved);

    if act3 >= ACT3_ORDER.len() {
        Act::Four
    } else if act2 >= ACT3_REQUIRED_ACT2_SOLVES && act1 >= ACT2_REQUIRED_ACT1_SOLVES {
        Act::Three
    } else if act1 >= ACT2_REQUIRED_ACT1_SOLVES {
        Act::Two
    } else {
        Act::One
    }
}

/// Glitch intensity derived from the cheat count.
///
/// `min(cheat_count * 0.1 * act_factor, cap)` where the factor is 2 and the
/// cap 5.0 in act 4 (the escalation past 1.0 is intentional), and 1 / 1.0
/// in acts 1-3.
pub fn glitch_for(cheat_count: u32, act: Act) -> Decimal {
    let step = Decimal::new(1, 1); // 0.1
    let (factor, cap) = if matches!(act, Act::Four) {
        (Decimal::from(2_u32), Decimal::from(5_u32))
    } else {
        (Decimal::ONE, Decimal::ONE)
    };

    Decimal::from(cheat_count)
        .checked_mul(step)
        .and_then(|raw| raw.checked_mul(factor))
        .map_or(cap, |raw| raw.min(cap))
}

/// Select the single ending candidate evaluated this frame, once
/// `judgment` is solved.
///
/// Priority order, exhaustive and mutually exclusive for any input pair:
/// idle above [`ENDING_IDLE_MS`] => `departure`; else cheat count above
/// [`ENDING_DESTRUCTION_CHEATS`] => `destruction`; else cheat count below
/// [`ENDING_ACCEPTANCE_CHEATS`] => `acceptance`; else `alignment`.
pub const fn select_ending(cheat_count: u32, idle_ms: u64) -> Ending {
    if idle_ms > ENDING_IDLE_MS {
        Ending::Departure
    } else if cheat_count > ENDING_DESTRUCTION_CHEATS {
        Ending::Destruction
    } else if cheat_count < ENDING_ACCEPTANCE_CHEATS {
        Ending::Acceptance
    } else {
        Ending::Alignment
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{ACT1_ORDER, ACT2_ORDER};

    #[test]
    fn fresh_session_is_act_one() {
        assert_eq!(next_act(&[]), Act::One);
        assert_eq!(
            next_act(&[PuzzleId::Agreement, PuzzleId::Reflection]),
            Act::One
        );
    }

    #[test]
    fn three_act1_solves_open_act_two() {
        let solved = [
            PuzzleId::Agreement,
            PuzzleId::Reflection,
            PuzzleId::Imbalance,
        ];
        assert_eq!(next_act(&solved), Act::Two);
    }

    #[test]
    fn act_three_needs_both_thresholds() {
        // Two act-2 solves without the act-1 floor stay put.
        let only_act2 = [PuzzleId::Stillness, PuzzleId::Precision];
        assert_eq!(next_act(&only_act2), Act::One);

        let solved = [
            PuzzleId::Agreement,
            PuzzleId::Reflection,
            PuzzleId::Imbalance,
            PuzzleId::Stillness,
            PuzzleId::Precision,
        ];
        assert_eq!(next_act(&solved), Act::Three);
    }

    #[test]
    fn act_four_requires_all_of_act_three() {
        let mut solved: Vec<PuzzleId> = ACT1_ORDER
            .iter()
            .chain(ACT2_ORDER.iter())
            .copied()
            .collect();
        solved.extend(ACT3_ORDER.iter().take(ACT3_ORDER.len().saturating_sub(1)));
        assert_eq!(next_act(&solved), Act::Three);

        solved.extend(ACT3_ORDER.iter().skip(ACT3_ORDER.len().saturating_sub(1)));
        assert_eq!(next_act(&solved), Act::Four);
    }

    #[test]
    fn next_act_is_monotonic_over_growing_sets() {
        // Grow the solved set one id at a time along the canonical global
        // order; the derived act must never decrease.
        let full: Vec<PuzzleId> = ACT1_ORDER
            .iter()
            .chain(ACT2_ORDER.iter())
            .chain(ACT3_ORDER.iter())
            .copied()
            .collect();

        let mut previous = Act::One;
        for len in 0..=full.len() {
            let prefix: Vec<PuzzleId> = full.iter().take(len).copied().collect();
            let act = next_act(&prefix);
            assert!(act >= previous, "act regressed at prefix length {len}");
            previous = act;
        }
    }

    #[test]
    fn next_act_is_idempotent() {
        let solved = [
            PuzzleId::Agreement,
            PuzzleId::Reflection,
            PuzzleId::Imbalance,
            PuzzleId::Stillness,
        ];
        assert_eq!(next_act(&solved), next_act(&solved));
    }

    #[test]
    fn glitch_scales_linearly_and_caps_at_one() {
        assert_eq!(glitch_for(0, Act::One), Decimal::ZERO);
        assert_eq!(glitch_for(3, Act::Two), Decimal::new(3, 1));
        assert_eq!(glitch_for(10, Act::Three), Decimal::ONE);
        assert_eq!(glitch_for(40, Act::Three), Decimal::ONE);
    }

    #[test]
    fn glitch_doubles_and_overflows_the_cap_in_act_four() {
        // 16 * 0.1 * 2 = 3.2: deliberately past 1.0 in act 4.
        assert_eq!(glitch_for(16, Act::Four), Decimal::new(32, 1));
        // Hard cap at 5.0.
        assert_eq!(glitch_for(40, Act::Four), Decimal::from(5_u32));
    }

    #[test]
    fn ending_selection_priority() {
        // Idle wins over everything.
        assert_eq!(select_ending(100, 20_001), Ending::Departure);
        // Then heavy cheating.
        assert_eq!(select_ending(16, 0), Ending::Destruction);
        // Then the purist.
        assert_eq!(select_ending(0, 0), Ending::Acceptance);
        assert_eq!(select_ending(1, 0), Ending::Acceptance);
        // Everyone else aligns.
        assert_eq!(select_ending(2, 0), Ending::Alignment);
        assert_eq!(select_ending(15, 20_000), Ending::Alignment);
    }

    #[test]
    fn ending_selection_is_total() {
        // Every (cheat, idle) pair yields exactly one ending.
        for cheats in [0_u32, 1, 2, 15, 16, 1_000] {
            for idle in [0_u64, 19_999, 20_000, 20_001, 120_000] {
                let _ = select_ending(cheats, idle);
            }
        }
    }
}
