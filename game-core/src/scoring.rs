use game_types::{Hint, MAX_GUESS, MIN_GUESS, Score};
use rand::Rng;
use std::cmp::Ordering;

pub struct ScoringEngine;

impl ScoringEngine {
    /// Pick a new hidden target, uniformly from 1..=100
    pub fn generate_target() -> u8 {
        Self::generate_target_with(&mut rand::rng())
    }

    /// Same as [`ScoringEngine::generate_target`] but drawing from the given RNG
    pub fn generate_target_with<R: Rng>(rng: &mut R) -> u8 {
        rng.random_range(MIN_GUESS..=MAX_GUESS)
    }

    /// Evaluate a guess against the target. The guess is expected to be validated already.
    pub fn evaluate_guess(guess: u8, target: u8) -> Hint {
        match guess.cmp(&target) {
            Ordering::Less => Hint::TooLow,
            Ordering::Greater => Hint::TooHigh,
            Ordering::Equal => Hint::Correct,
        }
    }

    /// Rank two scores: fewer attempts first, then faster time
    pub fn compare_scores(a: &Score, b: &Score) -> Ordering {
        a.attempts
            .cmp(&b.attempts)
            .then_with(|| a.time_seconds.total_cmp(&b.time_seconds))
    }

    /// Whether `candidate` strictly improves on `current_best`. Ties are not an improvement.
    pub fn is_new_best(candidate: &Score, current_best: Option<&Score>) -> bool {
        match current_best {
            None => true,
            Some(best) => Self::compare_scores(candidate, best) == Ordering::Less,
        }
    }

    /// Round elapsed seconds to hundredths
    pub fn round_time(seconds: f64) -> f64 {
        (seconds.max(0.0) * 100.0).round() / 100.0
    }

    /// Prompt shown to the player after a guess
    pub fn hint_message(hint: Hint, target: u8) -> String {
        match hint {
            Hint::TooLow => "Go higher! ⬆️".to_string(),
            Hint::TooHigh => "Go lower! ⬇️".to_string(),
            Hint::Correct => format!("Correct! The number was {}! 🎉", target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn score(attempts: u32, time_seconds: f64) -> Score {
        Score {
            attempts,
            time_seconds,
        }
    }

    #[test]
    fn test_evaluate_guess_over_full_range() {
        for target in MIN_GUESS..=MAX_GUESS {
            for guess in MIN_GUESS..=MAX_GUESS {
                let hint = ScoringEngine::evaluate_guess(guess, target);
                let expected = if guess == target {
                    Hint::Correct
                } else if guess < target {
                    Hint::TooLow
                } else {
                    Hint::TooHigh
                };
                assert_eq!(hint, expected, "guess {} against target {}", guess, target);
            }
        }
    }

    #[test]
    fn test_generate_target_in_range() {
        for _ in 0..10_000 {
            let target = ScoringEngine::generate_target();
            assert!((MIN_GUESS..=MAX_GUESS).contains(&target));
        }
    }

    #[test]
    fn test_generate_target_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut buckets = [0u32; 10];
        let trials = 100_000;

        for _ in 0..trials {
            let target = ScoringEngine::generate_target_with(&mut rng);
            buckets[((target - 1) / 10) as usize] += 1;
        }

        // Each decile should get ~10% of the draws
        for (i, count) in buckets.iter().enumerate() {
            let share = *count as f64 / trials as f64;
            assert!(
                (0.09..=0.11).contains(&share),
                "Bucket {} got share {:.4}",
                i,
                share
            );
        }

        // Both ends must be reachable
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..10_000 {
            match ScoringEngine::generate_target_with(&mut rng) {
                MIN_GUESS => seen_min = true,
                MAX_GUESS => seen_max = true,
                _ => {}
            }
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = ScoringEngine::generate_target_with(&mut StdRng::seed_from_u64(7));
        let b = ScoringEngine::generate_target_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_new_best_without_current_best() {
        assert!(ScoringEngine::is_new_best(&score(50, 999.0), None));
        assert!(ScoringEngine::is_new_best(&score(1, 0.0), None));
    }

    #[test]
    fn test_is_new_best_tie_breaking() {
        // Equal on both keys is not strictly better
        assert!(!ScoringEngine::is_new_best(&score(3, 10.0), Some(&score(3, 10.0))));
        // Fewer attempts wins regardless of time
        assert!(ScoringEngine::is_new_best(&score(2, 20.0), Some(&score(3, 5.0))));
        // Same attempts, faster time
        assert!(ScoringEngine::is_new_best(&score(3, 9.99), Some(&score(3, 10.0))));
        // Same attempts, slower time
        assert!(!ScoringEngine::is_new_best(&score(3, 10.01), Some(&score(3, 10.0))));
        // More attempts loses even when faster
        assert!(!ScoringEngine::is_new_best(&score(4, 1.0), Some(&score(3, 10.0))));
    }

    #[test]
    fn test_compare_scores_orders_leaderboard() {
        let mut scores = vec![score(3, 5.0), score(2, 9.0), score(3, 4.5), score(7, 1.0)];
        scores.sort_by(ScoringEngine::compare_scores);

        assert_eq!(
            scores,
            vec![score(2, 9.0), score(3, 4.5), score(3, 5.0), score(7, 1.0)]
        );
    }

    #[test]
    fn test_round_time() {
        assert_eq!(ScoringEngine::round_time(12.345_6), 12.35);
        assert_eq!(ScoringEngine::round_time(0.004), 0.0);
        assert_eq!(ScoringEngine::round_time(7.0), 7.0);
        assert_eq!(ScoringEngine::round_time(-0.5), 0.0);
    }

    #[test]
    fn test_hint_messages() {
        assert!(ScoringEngine::hint_message(Hint::TooLow, 42).contains("higher"));
        assert!(ScoringEngine::hint_message(Hint::TooHigh, 42).contains("lower"));
        assert!(ScoringEngine::hint_message(Hint::Correct, 42).contains("42"));
    }
}
