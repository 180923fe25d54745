use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::Link;

use quiz_core::model::GameId;
use quiz_core::time::millis_until;
use services::{QuizLoopService, QuizProgress, ShellView};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::shell::GameShell;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    FeedbackVm, GameIntent, GameOutcome, GameVm, OptionState, OptionVm, ResultsVm, start_game,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Everything one render needs, read out of the view-model in one go.
#[derive(Clone, Debug, PartialEq)]
struct GameScreen {
    shell: ShellView,
    progress: QuizProgress,
    prompt_html: String,
    options: Vec<OptionVm>,
    feedback: Option<FeedbackVm>,
    results: Option<ResultsVm>,
    can_proceed: bool,
    continue_label: &'static str,
}

impl GameScreen {
    fn from_vm(vm: &GameVm) -> Self {
        Self {
            shell: vm.shell(),
            progress: vm.session().progress(),
            prompt_html: vm.prompt_html(),
            options: vm.options(),
            feedback: vm.feedback(),
            results: vm.results(),
            can_proceed: vm.can_proceed(),
            continue_label: vm.continue_label(),
        }
    }
}

const BUSY_POLL: Duration = Duration::from_millis(20);
const BUSY_POLL_LIMIT: u32 = 250;

/// Wait while another task has the view-model taken out of its signal.
/// Returns `false` if it never comes back.
async fn wait_for_vm(vm: Signal<Option<GameVm>>) -> bool {
    for _ in 0..BUSY_POLL_LIMIT {
        if vm.peek().is_some() {
            return true;
        }
        tokio::time::sleep(BUSY_POLL).await;
    }
    false
}

async fn take_vm(vm: Signal<Option<GameVm>>) -> Option<GameVm> {
    let mut vm = vm;
    if wait_for_vm(vm).await {
        vm.write().take()
    } else {
        None
    }
}

/// Sleep until the next reveal deadline and apply it, repeating while new
/// deadlines appear. The task dies with the view, so a late timer never
/// touches a torn-down game.
fn schedule_tick(
    vm: Signal<Option<GameVm>>,
    error: Signal<Option<ViewError>>,
    quiz_loop: Arc<QuizLoopService>,
) {
    let mut vm = vm;
    let mut error = error;
    spawn(async move {
        loop {
            if !wait_for_vm(vm).await {
                return;
            }
            let Some(deadline) = vm.peek().as_ref().and_then(GameVm::next_deadline) else {
                return;
            };
            let wait = millis_until(deadline, quiz_loop.clock().now());
            if wait > 0 {
                tokio::time::sleep(Duration::from_millis(wait)).await;
            }

            let Some(mut local_vm) = take_vm(vm).await else {
                return;
            };
            let result = local_vm.tick(&quiz_loop).await;
            let next = local_vm.next_deadline();
            vm.set(Some(local_vm));

            if let Err(err) = result {
                error.set(Some(err));
                return;
            }
            // A clock that does not move would keep returning the same deadline.
            if next == Some(deadline) {
                return;
            }
        }
    });
}

fn save_snapshot(vm: Signal<Option<GameVm>>, quiz_loop: Arc<QuizLoopService>) {
    let Some(session) = vm.read().as_ref().map(|vm| vm.session().clone()) else {
        return;
    };
    spawn(async move {
        if let Err(err) = quiz_loop.save_snapshot(&session).await {
            tracing::warn!(game = %session.game_id(), error = %err, "snapshot not saved");
        }
    });
}

#[component]
pub fn GameView(game_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<GameVm>);

    let quiz_loop_for_resource = Arc::clone(&quiz_loop);
    let resource = use_resource(move || {
        let quiz_loop = Arc::clone(&quiz_loop_for_resource);
        let game_id = game_id.clone();
        let mut vm = vm;
        let mut error = error;

        async move {
            let game_id = GameId::new(&game_id).map_err(|_| ViewError::UnknownGame)?;
            let started = start_game(&quiz_loop, &game_id, None).await?;
            vm.set(Some(started));
            error.set(None);
            // A resumed game may be waiting on a reveal.
            schedule_tick(vm, error, Arc::clone(&quiz_loop));
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch_intent = {
        let quiz_loop = Arc::clone(&quiz_loop);
        use_callback(move |intent: GameIntent| {
            let quiz_loop = Arc::clone(&quiz_loop);
            let mut error = error;
            let mut vm = vm;

            match intent {
                GameIntent::Select(index) => {
                    let result = match vm.write().as_mut() {
                        Some(vm) => vm.select(&quiz_loop, index),
                        None => {
                            // A reveal tick holds the game; the click lands on a stale stage.
                            tracing::debug!(index, "game busy; selection dropped");
                            return;
                        }
                    };
                    match result {
                        Ok(()) => {
                            error.set(None);
                            save_snapshot(vm, Arc::clone(&quiz_loop));
                            schedule_tick(vm, error, quiz_loop);
                        }
                        Err(err) => error.set(Some(err)),
                    }
                }
                GameIntent::Continue | GameIntent::Retry | GameIntent::SaveResult => {
                    spawn(async move {
                        let Some(mut vm_value) = take_vm(vm).await else {
                            tracing::debug!(?intent, "game busy; intent dropped");
                            return;
                        };

                        let result = match intent {
                            GameIntent::Continue => vm_value.proceed(&quiz_loop).await,
                            GameIntent::Retry => vm_value
                                .retry(&quiz_loop)
                                .await
                                .map(|()| GameOutcome::Continue),
                            _ => vm_value
                                .finalize(&quiz_loop)
                                .await
                                .map(|()| GameOutcome::Finished),
                        };

                        // Always put the game back so the UI remains usable even after errors.
                        {
                            let mut guard = vm.write();
                            *guard = Some(vm_value);
                        }

                        match result {
                            Ok(GameOutcome::Continue) => {
                                error.set(None);
                                save_snapshot(vm, quiz_loop);
                            }
                            Ok(GameOutcome::Finished) => error.set(None),
                            Err(err) => error.set(Some(err)),
                        }
                    });
                }
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<GameTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let screen = vm.read().as_ref().map(GameScreen::from_vm);
    let error_message = (*error.read()).map(|err| err.message());

    rsx! {
        div { class: "page game-page", id: "game-root",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    Link { class: "btn btn-secondary", to: Route::Home {}, "Back to games" }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(screen) = screen {
                        GameShell { view: screen.shell.clone(),
                            if let Some(message) = error_message {
                                p { class: "game-error", "{message}" }
                            }
                            if let Some(results) = screen.results.clone() {
                                ResultsPanel {
                                    results,
                                    all_answers_correct: screen.shell.all_answers_correct,
                                    on_intent: dispatch_intent,
                                }
                            } else {
                                StagePanel { screen: screen.clone(), on_intent: dispatch_intent }
                            }
                        }
                    } else {
                        p { "Loading..." }
                    }
                },
            }
        }
    }
}

#[component]
fn StagePanel(screen: GameScreen, on_intent: Callback<GameIntent>) -> Element {
    let answered = screen.progress.answered;
    let total = screen.progress.total;
    let feedback_class = screen.feedback.as_ref().map_or("game-feedback", |feedback| {
        if feedback.is_correct {
            "game-feedback game-feedback--correct"
        } else {
            "game-feedback game-feedback--wrong"
        }
    });
    rsx! {
        progress { class: "game-progress", value: "{answered}", max: "{total}" }
        div { class: "game-prompt", dangerous_inner_html: "{screen.prompt_html}" }
        div { class: "game-options",
            for (index, option) in screen.options.into_iter().enumerate() {
                button {
                    key: "{option.id}",
                    class: option.state.class(),
                    id: "game-option-{option.id}",
                    r#type: "button",
                    disabled: option.state != OptionState::Open,
                    onclick: move |_| on_intent.call(GameIntent::Select(index)),
                    span { dangerous_inner_html: "{option.label_html}" }
                }
            }
        }
        if let Some(feedback) = screen.feedback {
            div { class: feedback_class, role: "status",
                h3 { "{feedback.heading}" }
                div { class: "game-feedback__reflection", dangerous_inner_html: "{feedback.reflection_html}" }
            }
            button {
                class: "btn btn-primary game-continue",
                id: "game-continue",
                r#type: "button",
                disabled: !screen.can_proceed,
                onclick: move |_| on_intent.call(GameIntent::Continue),
                "{screen.continue_label}"
            }
        }
    }
}

#[component]
fn ResultsPanel(
    results: ResultsVm,
    all_answers_correct: bool,
    on_intent: Callback<GameIntent>,
) -> Element {
    rsx! {
        div { class: "game-results", id: "game-results",
            h3 { class: "game-results__headline", "{results.headline}" }
            p { class: "game-results__score", "{results.score_label}" }
            if all_answers_correct {
                p { class: "game-results__perfect", "Perfect score!" }
            }
            p { class: "game-results__rewards",
                "Coins earned: {results.coins_awarded} · XP earned: {results.xp_awarded}"
            }
            if !results.recorded {
                p { class: "game-results__unsaved", "Your result hasn't been saved yet." }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(GameIntent::SaveResult),
                    "Save result"
                }
            }
            div { class: "game-results__actions",
                button {
                    class: "btn btn-primary",
                    id: "game-retry",
                    r#type: "button",
                    onclick: move |_| on_intent.call(GameIntent::Retry),
                    "Play again"
                }
                Link { class: "btn btn-secondary", to: Route::Home {}, "Back to games" }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct GameTestHandles {
    dispatch: Rc<RefCell<Option<Callback<GameIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<GameVm>>>>>,
}

#[cfg(test)]
impl GameTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<GameIntent>, vm: Signal<Option<GameVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<GameIntent> {
        (*self.dispatch.borrow()).expect("game dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<GameVm>> {
        (*self.vm.borrow()).expect("game vm registered")
    }
}
