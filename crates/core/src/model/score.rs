/// Maximum number of questions drawn for one level session.
pub const QUESTIONS_PER_LEVEL: usize = 12;

/// Countdown length for each question, in seconds.
pub const SECONDS_PER_QUESTION: u32 = 15;

/// Percentage of correct answers rounded half up, like the browser's
/// `Math.round`. An empty session scores 0.
#[must_use]
pub fn percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let rounded = (correct * 200 + total) / (2 * total);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

/// Bonus for a correct answer: the whole seconds still on the clock.
#[must_use]
pub fn time_bonus(seconds_left: i64) -> u32 {
    u32::try_from(seconds_left.max(0)).unwrap_or(u32::MAX)
}

/// Running score of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreCard {
    correct: u32,
    total: u32,
    time_bonus: u32,
}

impl ScoreCard {
    #[must_use]
    pub fn new(total: u32) -> Self {
        Self {
            correct: 0,
            total,
            time_bonus: 0,
        }
    }

    /// Credit a correct answer given with `seconds_left` on the clock.
    pub fn record_correct(&mut self, seconds_left: i64) -> u32 {
        let bonus = time_bonus(seconds_left);
        self.correct = self.correct.saturating_add(1).min(self.total);
        self.time_bonus = self.time_bonus.saturating_add(bonus);
        bonus
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn time_bonus(&self) -> u32 {
        self.time_bonus
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        percent(self.correct, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(12, 12), 100);
        assert_eq!(percent(0, 12), 0);
        assert_eq!(percent(1, 8), 13); // 12.5
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
    }

    #[test]
    fn empty_session_scores_zero() {
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn percent_stays_in_bounds() {
        for total in 0..=12 {
            for correct in 0..=total {
                assert!(percent(correct, total) <= 100);
            }
        }
        assert_eq!(percent(20, 12), 100);
    }

    #[test]
    fn time_bonus_never_negative() {
        assert_eq!(time_bonus(10), 10);
        assert_eq!(time_bonus(0), 0);
        assert_eq!(time_bonus(-3), 0);
    }

    #[test]
    fn score_card_accumulates() {
        let mut score = ScoreCard::new(2);
        assert_eq!(score.record_correct(10), 10);
        assert_eq!(score.record_correct(4), 4);
        assert_eq!(score.correct(), 2);
        assert_eq!(score.time_bonus(), 14);
        assert_eq!(score.percent(), 100);
    }

    #[test]
    fn correct_count_never_exceeds_total() {
        let mut score = ScoreCard::new(1);
        score.record_correct(5);
        score.record_correct(5);
        assert_eq!(score.correct(), 1);
    }
}
