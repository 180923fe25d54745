use chrono::{DateTime, Utc};

use quiz_core::model::{GameId, NavigationOverrides, OptionId};
use quiz_core::{EngineError, ProceedOutcome, RevealPhase};
use services::{QuizError, QuizLoopService, QuizSession, ShellView};

use crate::views::ViewError;
use crate::vm::markdown_vm::{inline_markdown_to_html, markdown_to_html};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameIntent {
    Select(usize),
    Continue,
    Retry,
    /// Retry a ledger write that failed when the game finished.
    SaveResult,
}

/// How an option button should look.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    /// Nothing picked yet.
    Open,
    PickedCorrect,
    PickedWrong,
    /// Not picked, but the right answer.
    Revealed,
    Faded,
}

impl OptionState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            OptionState::Open => "game-option",
            OptionState::PickedCorrect => "game-option game-option--correct",
            OptionState::PickedWrong => "game-option game-option--wrong",
            OptionState::Revealed => "game-option game-option--revealed",
            OptionState::Faded => "game-option game-option--faded",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub id: OptionId,
    pub label_html: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub is_correct: bool,
    pub heading: &'static str,
    pub reflection_html: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub headline: &'static str,
    pub score_label: String,
    pub coins_awarded: u32,
    pub xp_awarded: u32,
    pub passed: bool,
    pub recorded: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Continue,
    Finished,
}

/// UI wrapper around one play-through.
#[derive(Clone, Debug)]
pub struct GameVm {
    session: QuizSession,
}

impl GameVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn shell(&self) -> ShellView {
        ShellView::from_session(&self.session)
    }

    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    #[must_use]
    pub fn can_proceed(&self) -> bool {
        self.session.can_proceed()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.session.next_deadline()
    }

    #[must_use]
    pub fn prompt_html(&self) -> String {
        markdown_to_html(self.session.current_stage().prompt())
    }

    #[must_use]
    pub fn continue_label(&self) -> &'static str {
        if self.session.engine().is_last_stage() {
            "Finish"
        } else {
            "Next"
        }
    }

    #[must_use]
    pub fn options(&self) -> Vec<OptionVm> {
        let picked = self.session.selected_option().map(|option| &option.id);
        self.session
            .current_stage()
            .options()
            .iter()
            .map(|option| {
                let state = match picked {
                    None => OptionState::Open,
                    Some(id) if *id == option.id && option.is_correct => {
                        OptionState::PickedCorrect
                    }
                    Some(id) if *id == option.id => OptionState::PickedWrong,
                    Some(_) if option.is_correct => OptionState::Revealed,
                    Some(_) => OptionState::Faded,
                };
                OptionVm {
                    id: option.id.clone(),
                    label_html: inline_markdown_to_html(&option.label),
                    state,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<FeedbackVm> {
        let option = self.session.selected_option()?;
        Some(FeedbackVm {
            is_correct: option.is_correct,
            heading: if option.is_correct {
                "Nice choice!"
            } else {
                "Not quite."
            },
            reflection_html: markdown_to_html(&option.reflection),
        })
    }

    #[must_use]
    pub fn results(&self) -> Option<ResultsVm> {
        let report = self.session.report()?;
        Some(ResultsVm {
            headline: if report.has_passed {
                "You nailed it!"
            } else {
                "Good effort. Try again to earn your coins."
            },
            score_label: format!("{} / {} correct", report.final_score, report.total_stages),
            coins_awarded: report.coins_awarded,
            xp_awarded: report.xp_awarded,
            passed: report.has_passed,
            recorded: self.session.completion_id().is_some(),
        })
    }

    /// Pick the option at `index` on the current stage.
    ///
    /// # Errors
    ///
    /// Returns `ViewError` if the pick cannot be recorded.
    pub fn select(&mut self, quiz_loop: &QuizLoopService, index: usize) -> Result<(), ViewError> {
        let Some(option_id) = self
            .session
            .current_stage()
            .options()
            .get(index)
            .map(|option| option.id.clone())
        else {
            return Ok(());
        };
        quiz_loop
            .select_option(&mut self.session, &option_id)
            .map_err(view_error)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the completion could not be recorded.
    pub async fn tick(&mut self, quiz_loop: &QuizLoopService) -> Result<RevealPhase, ViewError> {
        quiz_loop.tick(&mut self.session).await.map_err(view_error)
    }

    /// # Errors
    ///
    /// Returns `ViewError::NotReady` while feedback is showing, or
    /// `ViewError::Unknown` for persistence failures.
    pub async fn proceed(&mut self, quiz_loop: &QuizLoopService) -> Result<GameOutcome, ViewError> {
        match quiz_loop.proceed(&mut self.session).await.map_err(view_error)? {
            ProceedOutcome::Advanced { .. } => Ok(GameOutcome::Continue),
            ProceedOutcome::Finished(_) => Ok(GameOutcome::Finished),
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the old snapshot cannot be cleared.
    pub async fn retry(&mut self, quiz_loop: &QuizLoopService) -> Result<(), ViewError> {
        quiz_loop.retry(&mut self.session).await.map_err(view_error)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the completion still cannot be recorded.
    pub async fn finalize(&mut self, quiz_loop: &QuizLoopService) -> Result<(), ViewError> {
        quiz_loop
            .finalize_completion(&mut self.session)
            .await
            .map_err(view_error)?;
        Ok(())
    }
}

/// Resume the saved play-through for `game_id`, or start a fresh one.
///
/// # Errors
///
/// Returns `ViewError::UnknownGame` for ids outside the catalog and
/// `ViewError::Unknown` for other failures.
pub async fn start_game(
    quiz_loop: &QuizLoopService,
    game_id: &GameId,
    navigation: Option<NavigationOverrides>,
) -> Result<GameVm, ViewError> {
    let navigation = navigation.as_ref();
    match quiz_loop.resume_game(game_id, navigation).await {
        Ok(Some(session)) => return Ok(GameVm::new(session)),
        Ok(None) => {}
        Err(QuizError::UnknownGame(_)) => return Err(ViewError::UnknownGame),
        Err(err) => tracing::warn!(game = %game_id, error = %err, "resume failed; starting fresh"),
    }
    let session = quiz_loop
        .start_game(game_id, navigation)
        .map_err(view_error)?;
    Ok(GameVm::new(session))
}

fn view_error(err: QuizError) -> ViewError {
    match err {
        QuizError::UnknownGame(_) => ViewError::UnknownGame,
        QuizError::Engine(EngineError::NotProceedable { .. } | EngineError::Unanswered) => {
            ViewError::NotReady
        }
        other => {
            tracing::warn!(error = %other, "game action failed");
            ViewError::Unknown
        }
    }
}
