//! Consecutive-run counting over most-recent-first transitions.

use crate::domain::{Transition, TransitionType};

/// Length of the leading run of transitions whose type satisfies `pred`.
pub fn leading_run(transitions: &[Transition], pred: impl Fn(TransitionType) -> bool) -> usize {
    transitions.iter().take_while(|t| pred(t.kind)).count()
}

/// Leading run of DECREASE/LIQUIDATED transitions.
pub fn consecutive_decreases(transitions: &[Transition]) -> usize {
    leading_run(transitions, TransitionType::is_reduction)
}

/// Leading run of INCREASE/NEW transitions.
pub fn consecutive_increases(transitions: &[Transition]) -> usize {
    leading_run(transitions, TransitionType::is_accumulation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(kinds: &[TransitionType]) -> Vec<Transition> {
        kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| Transition {
                kind,
                percent: 0.0,
                from_date: format!("p{}", i + 1),
                to_date: format!("p{i}"),
            })
            .collect()
    }

    #[test]
    fn decrease_decrease_increase() {
        use TransitionType::*;
        let t = chain(&[Decrease, Decrease, Increase]);
        assert_eq!(consecutive_decreases(&t), 2);
        assert_eq!(consecutive_increases(&t), 0);
    }

    #[test]
    fn liquidation_extends_reduction_run() {
        use TransitionType::*;
        let t = chain(&[Liquidated, Decrease, Decrease, Unchanged]);
        assert_eq!(consecutive_decreases(&t), 3);
    }

    #[test]
    fn new_extends_accumulation_run() {
        use TransitionType::*;
        let t = chain(&[Increase, New, Unchanged]);
        assert_eq!(consecutive_increases(&t), 2);
        assert_eq!(consecutive_decreases(&t), 0);
    }

    #[test]
    fn unchanged_first_stops_both() {
        use TransitionType::*;
        let t = chain(&[Unchanged, Decrease, Decrease]);
        assert_eq!(consecutive_decreases(&t), 0);
        assert_eq!(consecutive_increases(&t), 0);
    }

    #[test]
    fn empty_transitions() {
        assert_eq!(consecutive_decreases(&[]), 0);
        assert_eq!(consecutive_increases(&[]), 0);
    }
}
