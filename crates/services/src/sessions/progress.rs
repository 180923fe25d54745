/// Aggregated view of play-through progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// 1-based stage number shown as the level.
    pub current_level: usize,
    pub is_complete: bool,
}

impl QuizProgress {
    /// Share of stages answered, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.answered as f32 / self.total as f32;
        fraction
    }
}
