//! Pattern scores for Gomoku evaluation
//!
//! These constants define the scoring weights for line shapes and captures.
//! Every step up the ladder is worth roughly an order of magnitude more than
//! the one below, so longer runs and open ends always dominate.

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    // Winning patterns
    /// Five in a row - immediate win
    pub const FIVE: i32 = 1_000_000;
    /// Capture win (threshold of pairs reached)
    pub const CAPTURE_WIN: i32 = 1_000_000;

    // Strong attacking patterns
    /// Open four: _OOOO_ (unstoppable without capture)
    pub const OPEN_FOUR: i32 = 100_000;
    /// Closed four: XOOOO_ or _OOOOX (one way to extend)
    pub const CLOSED_FOUR: i32 = 50_000;

    // Moderate threats
    /// Open three: _OOO_ (becomes open four if not blocked)
    pub const OPEN_THREE: i32 = 10_000;
    /// Closed three: XOOO_ or _OOOX
    pub const CLOSED_THREE: i32 = 1_500;

    // Building patterns
    /// Open two: _OO_
    pub const OPEN_TWO: i32 = 1_000;
    /// Closed two: XOO_ or _OOX
    pub const CLOSED_TWO: i32 = 200;

    // Capture related
    /// Can capture opponent's pair with this move
    pub const CAPTURE_THREAT: i32 = 8_000;
    /// Value per captured pair
    pub const CAPTURE_PAIR: i32 = 2_000;
    /// One pair short of a capture win
    pub const NEAR_CAPTURE_WIN: i32 = 80_000;
}

/// Weight of a five-cell window holding `n` own stones and no opponent
/// stones. Super-linear so that filling one window beats spreading out.
pub const WINDOW_WEIGHTS: [i32; 6] = [0, 1, 12, 150, 2_000, 50_000];

/// Score of a consecutive run of `count` stones with `open_ends` free ends.
///
/// A run that can never reach five (no open end and shorter than five)
/// is worthless.
#[inline]
pub fn run_score(count: usize, open_ends: u8) -> i32 {
    match (count, open_ends) {
        (5.., _) => PatternScore::FIVE,
        (4, 2) => PatternScore::OPEN_FOUR,
        (4, 1) => PatternScore::CLOSED_FOUR,
        (3, 2) => PatternScore::OPEN_THREE,
        (3, 1) => PatternScore::CLOSED_THREE,
        (2, 2) => PatternScore::OPEN_TWO,
        (2, 1) => PatternScore::CLOSED_TWO,
        _ => 0,
    }
}

/// Capture-based scoring with non-linear weights
///
/// `threshold` is the capture-win target when that rule is on; without it
/// the ladder stops growing at the near-win step.
/// Symmetric for negamax: capture_score(a, b, t) == -capture_score(b, a, t).
pub fn capture_score(my_captures: u8, opp_captures: u8, threshold: Option<u8>) -> i32 {
    let weight = |pairs: u8| -> i32 {
        match threshold {
            Some(t) if pairs >= t => PatternScore::CAPTURE_WIN,
            Some(t) if pairs + 1 == t => PatternScore::NEAR_CAPTURE_WIN,
            _ => {
                const CAP_WEIGHTS: [i32; 5] = [0, 2_000, 7_000, 20_000, 40_000];
                CAP_WEIGHTS[usize::from(pairs.min(4))]
            }
        }
    };

    weight(my_captures) - weight(opp_captures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_score_hierarchy() {
        assert!(PatternScore::FIVE > PatternScore::OPEN_FOUR);
        assert!(PatternScore::OPEN_FOUR > PatternScore::CLOSED_FOUR);
        assert!(PatternScore::CLOSED_FOUR > PatternScore::OPEN_THREE);
        assert!(PatternScore::OPEN_THREE > PatternScore::CLOSED_THREE);
        assert!(PatternScore::CLOSED_THREE > PatternScore::OPEN_TWO);
        assert!(PatternScore::OPEN_TWO > PatternScore::CLOSED_TWO);
    }

    #[test]
    fn test_run_score_prefers_open_ends() {
        assert!(run_score(3, 2) > run_score(3, 1));
        assert!(run_score(3, 1) > run_score(3, 0));
        assert_eq!(run_score(4, 0), 0);
        assert_eq!(run_score(6, 0), PatternScore::FIVE);
    }

    #[test]
    fn test_window_weights_super_linear() {
        for n in 2..WINDOW_WEIGHTS.len() {
            assert!(WINDOW_WEIGHTS[n] > 2 * WINDOW_WEIGHTS[n - 1]);
        }
    }

    #[test]
    fn test_capture_score_zero() {
        assert_eq!(capture_score(0, 0, None), 0);
        assert!(capture_score(2, 0, None) > 0);
    }

    #[test]
    fn test_capture_score_near_win() {
        assert_eq!(capture_score(4, 0, Some(5)), PatternScore::NEAR_CAPTURE_WIN);
        assert_eq!(capture_score(5, 0, Some(5)), PatternScore::CAPTURE_WIN);
        assert!(capture_score(4, 0, None) < PatternScore::NEAR_CAPTURE_WIN);
    }

    #[test]
    fn test_capture_score_negamax_symmetry() {
        for threshold in [None, Some(5)] {
            for a in 0..=5u8 {
                for b in 0..=5u8 {
                    assert_eq!(
                        capture_score(a, b, threshold),
                        -capture_score(b, a, threshold),
                        "symmetry violated for ({a}, {b}, {threshold:?})"
                    );
                }
            }
        }
    }
}
