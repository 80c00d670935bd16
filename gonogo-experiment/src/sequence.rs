use gonogo_core::StimulusCategory;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::ConfigError;

/// Number of Go trials in a balanced sequence.
pub fn go_count(total_rounds: usize, go_probability: f64) -> usize {
    ((total_rounds as f64 * go_probability).round() as usize).min(total_rounds)
}

/// Builds a balanced category order: exactly [`go_count`] Go entries, the
/// rest NoGo, uniformly shuffled.
pub fn generate_sequence<R: Rng + ?Sized>(
    total_rounds: usize,
    go_probability: f64,
    rng: &mut R,
) -> Result<Vec<StimulusCategory>, ConfigError> {
    if total_rounds == 0 {
        return Err(ConfigError::NoRounds);
    }
    if !go_probability.is_finite() || !(0.0..=1.0).contains(&go_probability) {
        return Err(ConfigError::GoProbability(go_probability));
    }

    let go = go_count(total_rounds, go_probability);
    let mut sequence = Vec::with_capacity(total_rounds);
    sequence.resize(go, StimulusCategory::Go);
    sequence.resize(total_rounds, StimulusCategory::NoGo);
    sequence.shuffle(rng);
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn default_session_is_fourteen_six() {
        let mut rng = StdRng::seed_from_u64(1);
        let seq = generate_sequence(20, 0.7, &mut rng).unwrap();
        assert_eq!(seq.len(), 20);
        assert_eq!(seq.iter().filter(|c| c.is_go()).count(), 14);
    }

    #[test]
    fn extremes_are_homogeneous() {
        let mut rng = StdRng::seed_from_u64(2);
        assert!(generate_sequence(9, 1.0, &mut rng).unwrap().iter().all(|c| c.is_go()));
        assert!(generate_sequence(9, 0.0, &mut rng).unwrap().iter().all(|c| !c.is_go()));
    }

    #[test]
    fn order_depends_on_rng() {
        let a = generate_sequence(30, 0.5, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = generate_sequence(30, 0.5, &mut StdRng::seed_from_u64(4)).unwrap();
        let a_again = generate_sequence(30, 0.5, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, a_again);
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(matches!(generate_sequence(0, 0.5, &mut rng), Err(ConfigError::NoRounds)));
        assert!(matches!(
            generate_sequence(10, f64::NAN, &mut rng),
            Err(ConfigError::GoProbability(_))
        ));
    }
}
