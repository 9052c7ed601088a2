//! Custom Test Assertions
//!
//! Assertion helpers for order types that give more meaningful failure
//! messages than plain `assert_eq!`.

use domain_orders::{ClaimOutcome, Order};

/// Tally of claim outcomes from a concurrent run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClaimTally {
    pub success: usize,
    pub already_taken: usize,
    pub not_found: usize,
}

impl ClaimTally {
    /// Counts each outcome
    pub fn of(outcomes: &[ClaimOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut tally, outcome| {
            match outcome {
                ClaimOutcome::Success => tally.success += 1,
                ClaimOutcome::AlreadyTaken => tally.already_taken += 1,
                ClaimOutcome::NotFound => tally.not_found += 1,
            }
            tally
        })
    }
}

/// Asserts that exactly one claim won and every other saw the order taken
///
/// # Panics
///
/// Panics with the full tally if the outcomes differ
pub fn assert_single_winner(outcomes: &[ClaimOutcome]) {
    let tally = ClaimTally::of(outcomes);
    assert_eq!(
        tally,
        ClaimTally {
            success: 1,
            already_taken: outcomes.len() - 1,
            not_found: 0,
        },
        "Expected exactly one successful claim out of {}, got {:?}",
        outcomes.len(),
        tally
    );
}

/// Asserts that orders are sorted by creation time, oldest first
pub fn assert_oldest_first(orders: &[Order]) {
    for pair in orders.windows(2) {
        assert!(
            pair[0].created_at() <= pair[1].created_at(),
            "Orders out of order: {} at {} precedes {} at {}",
            pair[0].id(),
            pair[0].created_at(),
            pair[1].id(),
            pair[1].created_at()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally() {
        let tally = ClaimTally::of(&[
            ClaimOutcome::Success,
            ClaimOutcome::AlreadyTaken,
            ClaimOutcome::AlreadyTaken,
        ]);
        assert_eq!(tally.success, 1);
        assert_eq!(tally.already_taken, 2);
        assert_single_winner(&[ClaimOutcome::Success, ClaimOutcome::AlreadyTaken]);
    }

    #[test]
    #[should_panic(expected = "Expected exactly one successful claim")]
    fn test_two_winners_panics() {
        assert_single_winner(&[ClaimOutcome::Success, ClaimOutcome::Success]);
    }
}
