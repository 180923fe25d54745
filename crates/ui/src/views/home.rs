use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use quiz_core::model::{GameDefinition, GameTrack};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq, Eq)]
struct GameCardVm {
    id: String,
    title: String,
    subtitle: String,
    stages: usize,
}

impl From<&GameDefinition> for GameCardVm {
    fn from(game: &GameDefinition) -> Self {
        Self {
            id: game.id().to_string(),
            title: game.title().to_string(),
            subtitle: game.subtitle().to_string(),
            stages: game.stage_count(),
        }
    }
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let history = ctx.history();

    let launch = ctx.clone();
    use_effect(move || {
        if let Some(game_id) = launch.take_launch_game() {
            let _ = navigator.replace(Route::Game {
                game_id: game_id.to_string(),
            });
        }
    });

    let balance = use_resource(move || {
        let history = history.clone();
        async move {
            history
                .coin_balance()
                .await
                .map_err(|_| ViewError::Unknown)
        }
    });
    let balance_state = view_state_from_resource(&balance);

    let finance: Vec<GameCardVm> = ctx
        .catalog()
        .list_by_track(GameTrack::Finance)
        .map(GameCardVm::from)
        .collect();
    let parenting: Vec<GameCardVm> = ctx
        .catalog()
        .list_by_track(GameTrack::Parenting)
        .map(GameCardVm::from)
        .collect();

    rsx! {
        div { class: "page",
            h2 { "Games" }
            match balance_state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "coin-balance", "Coins: --" }
                },
                ViewState::Ready(coins) => rsx! {
                    p { class: "coin-balance", "Coins: {coins}" }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "coin-balance", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut balance = balance;
                            balance.restart();
                        },
                        "Retry"
                    }
                },
            }
            GameSection { heading: "Money Skills", games: finance }
            GameSection { heading: "Parenting Scenarios", games: parenting }
        }
    }
}

#[component]
fn GameSection(heading: &'static str, games: Vec<GameCardVm>) -> Element {
    if games.is_empty() {
        return rsx! {};
    }
    rsx! {
        section { class: "game-section",
            h3 { "{heading}" }
            ul { class: "game-list",
                for game in games {
                    li { key: "{game.id}", class: "game-card",
                        Link { to: Route::Game { game_id: game.id.clone() },
                            span { class: "game-card__title", "{game.title}" }
                        }
                        if !game.subtitle.is_empty() {
                            p { class: "game-card__subtitle", "{game.subtitle}" }
                        }
                        p { class: "game-card__meta", "{game.stages} questions" }
                    }
                }
            }
        }
    }
}
