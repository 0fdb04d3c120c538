/// Aggregated view of a respondent's progress through one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// `answered` is clamped to `total`.
    #[must_use]
    pub fn new(total: usize, answered: usize) -> Self {
        let answered = answered.min(total);
        Self {
            total,
            answered,
            remaining: total - answered,
            is_complete: answered == total,
        }
    }

    /// 1-based position of the item currently shown, capped at `total`.
    #[must_use]
    pub fn position(&self) -> usize {
        (self.answered + 1).min(self.total)
    }

    /// Share of the current position in `0.0..=1.0`, for progress bars.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.position() as f64 / self.total as f64;
        fraction.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_progress_points_at_first_item() {
        let progress = SessionProgress::new(3, 0);
        assert_eq!(progress.position(), 1);
        assert_eq!(progress.remaining, 3);
        assert!(!progress.is_complete);
        assert!((progress.fraction() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn answered_is_clamped_to_total() {
        let progress = SessionProgress::new(2, 5);
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.remaining, 0);
        assert!(progress.is_complete);
        assert_eq!(progress.fraction(), 1.0);
    }
}
