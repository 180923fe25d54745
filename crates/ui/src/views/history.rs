use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CompletionCardVm, map_completion_cards};

const HISTORY_LIMIT: u32 = 25;

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    cards: Vec<CompletionCardVm>,
    coin_balance: u64,
}

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.history();
    let catalog = ctx.catalog().clone();

    let resource = use_resource(move || {
        let history = history.clone();
        let catalog = catalog.clone();
        async move {
            let items = history
                .list_completions(None, HISTORY_LIMIT)
                .await
                .map_err(|_| ViewError::Unknown)?;
            let coin_balance = history
                .coin_balance()
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok(HistoryData {
                cards: map_completion_cards(&items, &catalog),
                coin_balance,
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "History" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    p { class: "coin-balance", "Total coins earned: {data.coin_balance}" }
                    if data.cards.is_empty() {
                        p { "No games finished yet." }
                    } else {
                        ul { class: "history-list",
                            for card in data.cards {
                                CompletionCard { key: "{card.id}", card }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn CompletionCard(card: CompletionCardVm) -> Element {
    let status = if card.passed { "Passed" } else { "Not passed" };
    let status_class = if card.passed {
        "history-status history-status--passed"
    } else {
        "history-status"
    };
    rsx! {
        li { class: "history-card history-card--{card.track}",
            Link { class: "history-link", to: Route::Game { game_id: card.game_id.clone() },
                span { class: "history-title", "{card.game_title}" }
                span { class: "history-cta", "Play again" }
            }
            p { class: "history-date", "{card.completed_at_str}" }
            p {
                span { class: "{status_class}", "{status}" }
                " · {card.score_label} · Coins: {card.coins_awarded} · XP: {card.xp_awarded}"
            }
        }
    }
}
