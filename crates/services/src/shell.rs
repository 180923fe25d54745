//! What the hosting shell needs to draw chrome around a game.

use quiz_core::model::GameTrack;

use crate::sessions::QuizSession;

/// Values handed to the shell component on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    pub title: String,
    pub subtitle: String,
    pub track: GameTrack,
    /// Coins currently shown: the running tally, or the award once finished.
    pub score: u32,
    pub total_coins: u32,
    pub total_xp: u32,
    pub current_level: u32,
    pub total_levels: u32,
    pub show_game_over: bool,
    pub show_confetti: bool,
    pub should_submit_game_completion: bool,
    pub all_answers_correct: bool,
}

impl ShellView {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        let config = session.config();
        let engine = session.engine();
        let report = session.report();
        let current_level = u32::try_from(engine.stage_index() + 1).unwrap_or(u32::MAX);

        Self {
            title: config.title.clone(),
            subtitle: session.game().subtitle().to_owned(),
            track: session.game().track(),
            score: engine.coins(),
            total_coins: config.total_coins,
            total_xp: config.total_xp,
            current_level,
            total_levels: config.total_levels,
            show_game_over: report.is_some(),
            show_confetti: report.is_some_and(|r| r.show_confetti()),
            should_submit_game_completion: report
                .is_some_and(|r| r.should_submit_game_completion()),
            all_answers_correct: report.is_some_and(|r| r.all_answers_correct()),
        }
    }

    /// "Level 2 of 5" style label.
    #[must_use]
    pub fn level_label(&self) -> String {
        format!("Level {} of {}", self.current_level, self.total_levels)
    }
}
