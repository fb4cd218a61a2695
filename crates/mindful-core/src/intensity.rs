//! Intensity scorer: top-ranked scores to a bounded 1..=10 integer.

use crate::shared::EmotionScore;

/// Intensity when the only emotion left after the heuristic is neutral.
pub const NEUTRAL_INTENSITY: u8 = 2;
pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 10;

/// Number of leading scores that contribute.
pub const TOP_N: usize = 3;

/// `scores` must be sorted descending; only the first three are summed.
pub fn score_intensity(scores: &[EmotionScore]) -> u8 {
    if let [only] = scores {
        if only.is_neutral() {
            return NEUTRAL_INTENSITY;
        }
    }
    let sum: f64 = scores
        .iter()
        .take(TOP_N)
        .map(|s| s.score)
        .filter(|s| s.is_finite())
        .sum();
    let scaled = (sum * 10.0).round();
    scaled.clamp(f64::from(MIN_INTENSITY), f64::from(MAX_INTENSITY)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: &[(&str, f64)]) -> Vec<EmotionScore> {
        values.iter().map(|(l, s)| EmotionScore::new(*l, *s)).collect()
    }

    #[test]
    fn sole_neutral_is_two() {
        assert_eq!(score_intensity(&[EmotionScore::neutral(0.9)]), 2);
        assert_eq!(score_intensity(&[EmotionScore::neutral(0.1)]), 2);
    }

    #[test]
    fn sums_top_three() {
        let s = scores(&[("sadness", 0.6), ("fear", 0.2), ("anger", 0.1), ("joy", 0.05)]);
        assert_eq!(score_intensity(&s), 9);
    }

    #[test]
    fn clamps_to_bounds() {
        assert_eq!(score_intensity(&scores(&[("joy", 0.01)])), 1);
        assert_eq!(score_intensity(&[]), 1);
        assert_eq!(
            score_intensity(&scores(&[("joy", 1.0), ("love", 1.0), ("surprise", 1.0)])),
            10
        );
    }

    #[test]
    fn neutral_among_others_is_scored_normally() {
        let s = scores(&[("neutral", 0.5), ("joy", 0.2)]);
        assert_eq!(score_intensity(&s), 7);
    }
}
