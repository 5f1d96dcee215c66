//! Period-over-period transition classification.

use crate::domain::TransitionType;

/// Classify the move from `prev` shares to `curr` shares.
///
/// Returns the transition type and the unrounded percent change. Division
/// only happens when `prev > 0`.
pub fn classify_change(curr: u64, prev: u64) -> (TransitionType, f64) {
    match (prev, curr) {
        (0, 0) => (TransitionType::Unchanged, 0.0),
        (0, _) => (TransitionType::New, 100.0),
        (_, 0) => (TransitionType::Liquidated, -100.0),
        (prev, curr) => {
            let percent = (curr as f64 - prev as f64) / prev as f64 * 100.0;
            let kind = if percent > 0.0 {
                TransitionType::Increase
            } else if percent < 0.0 {
                TransitionType::Decrease
            } else {
                TransitionType::Unchanged
            };
            (kind, percent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_from_1000_to_1200() {
        let (kind, percent) = classify_change(1200, 1000);
        assert_eq!(kind, TransitionType::Increase);
        assert!((percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn decrease_is_negative() {
        let (kind, percent) = classify_change(750, 1000);
        assert_eq!(kind, TransitionType::Decrease);
        assert!((percent + 25.0).abs() < 1e-9);
    }

    #[test]
    fn liquidation_is_minus_100() {
        assert_eq!(classify_change(0, 1000), (TransitionType::Liquidated, -100.0));
    }

    #[test]
    fn new_position_is_100() {
        assert_eq!(classify_change(500, 0), (TransitionType::New, 100.0));
    }

    #[test]
    fn zero_to_zero_is_unchanged() {
        assert_eq!(classify_change(0, 0), (TransitionType::Unchanged, 0.0));
    }

    #[test]
    fn equal_nonzero_is_unchanged() {
        assert_eq!(classify_change(42, 42), (TransitionType::Unchanged, 0.0));
    }

    #[test]
    fn tiny_move_keeps_sign() {
        // Rounds to 0.00 when reported but still classifies as an increase.
        let (kind, percent) = classify_change(100_000_001, 100_000_000);
        assert_eq!(kind, TransitionType::Increase);
        assert!(percent > 0.0 && percent < 0.005);
    }
}
