//! Choosing one action from scored candidates.
//!
//! Each step is a pure function over action lists so the policy can be
//! composed per role and tested without a game.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::game::Action;

/// Actions whose score equals the maximum.
///
/// Scores are mostly integer-valued, so ties are common and compared
/// exactly.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn best_actions(scored: &[(Action, f64)]) -> Vec<Action> {
    let max = scored
        .iter()
        .map(|&(_, value)| value)
        .fold(f64::NEG_INFINITY, f64::max);
    scored
        .iter()
        .filter(|&&(_, value)| value == max)
        .map(|&(action, _)| action)
        .collect()
}

/// Break a back-and-forth loop.
///
/// With several candidates the repeated action is dropped. A lone
/// candidate is replaced by the whole legal set.
#[must_use]
pub fn avoid_oscillation(
    mut candidates: Vec<Action>,
    legal: &[Action],
    last_action: Option<Action>,
) -> Vec<Action> {
    if candidates.len() > 1 {
        if let Some(last) = last_action {
            candidates.retain(|&action| action != last);
        }
        candidates
    } else {
        legal.to_vec()
    }
}

/// Drop `Stop` unless it is the only candidate.
#[must_use]
pub fn avoid_stop(mut candidates: Vec<Action>) -> Vec<Action> {
    if candidates.len() > 1 {
        candidates.retain(|&action| action != Action::Stop);
    }
    candidates
}

/// Uniform random choice; `Stop` when there is nothing to choose.
pub fn pick<R: Rng + ?Sized>(candidates: &[Action], rng: &mut R) -> Action {
    candidates.choose(rng).copied().unwrap_or(Action::Stop)
}

/// The action with the smallest distance, first one on ties.
#[must_use]
pub fn closest(distances: impl IntoIterator<Item = (Action, u32)>) -> Option<Action> {
    let mut best: Option<(Action, u32)> = None;
    for (action, dist) in distances {
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((action, dist));
        }
    }
    best.map(|(action, _)| action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_best_actions_keeps_ties_in_order() {
        let scored = [
            (Action::North, 3.0),
            (Action::East, 5.0),
            (Action::West, 5.0),
            (Action::Stop, -1.0),
        ];
        assert_eq!(best_actions(&scored), vec![Action::East, Action::West]);
        assert!(best_actions(&[]).is_empty());
    }

    #[test]
    fn test_oscillation_drops_last_action() {
        let legal = [Action::North, Action::East, Action::West, Action::Stop];
        let out = avoid_oscillation(vec![Action::East, Action::West], &legal, Some(Action::West));
        assert_eq!(out, vec![Action::East]);
    }

    #[test]
    fn test_oscillation_single_candidate_opens_legal_set() {
        let legal = [Action::North, Action::East, Action::Stop];
        let out = avoid_oscillation(vec![Action::East], &legal, Some(Action::East));
        assert_eq!(out, legal.to_vec());
    }

    #[test]
    fn test_oscillation_last_action_absent() {
        let legal = [Action::North, Action::East];
        let out = avoid_oscillation(legal.to_vec(), &legal, Some(Action::South));
        assert_eq!(out, legal.to_vec());
    }

    #[test]
    fn test_stop_dropped_when_alternatives() {
        assert_eq!(avoid_stop(vec![Action::Stop, Action::East]), vec![Action::East]);
        assert_eq!(avoid_stop(vec![Action::Stop]), vec![Action::Stop]);
    }

    #[test]
    fn test_pick_empty_is_stop() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick(&[], &mut rng), Action::Stop);
        assert_eq!(pick(&[Action::West], &mut rng), Action::West);
    }

    #[test]
    fn test_pick_is_seeded() {
        let candidates = [Action::North, Action::South, Action::East, Action::West];
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..16).map(|_| pick(&candidates, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
        assert!(run(42).iter().all(|a| candidates.contains(a)));
    }

    #[test]
    fn test_closest_first_on_ties() {
        let chosen = closest([(Action::North, 4), (Action::East, 2), (Action::West, 2)]);
        assert_eq!(chosen, Some(Action::East));
        assert_eq!(closest(Vec::<(Action, u32)>::new()), None);
    }
}
