use dioxus::prelude::*;
use dioxus_router::Link;

use quiz_core::model::GameTrack;
use services::ShellView;

use crate::routes::Route;

fn shell_class(track: GameTrack) -> &'static str {
    match track {
        GameTrack::Finance => "game-shell game-shell--finance",
        GameTrack::Parenting => "game-shell game-shell--parenting",
    }
}

/// Chrome shared by every game: title, level, coin counter and the
/// game-over celebration. The game body goes in `children`.
#[component]
pub fn GameShell(view: ShellView, children: Element) -> Element {
    let level_label = view.level_label();
    rsx! {
        div { class: shell_class(view.track), id: "game-shell",
            header { class: "game-shell__header",
                div { class: "game-shell__heading",
                    h2 { class: "game-shell__title", "{view.title}" }
                    if !view.subtitle.is_empty() {
                        p { class: "game-shell__subtitle", "{view.subtitle}" }
                    }
                }
                Link { class: "game-shell__quit", to: Route::Home {}, "Quit" }
            }
            div { class: "game-shell__stats",
                if !view.show_game_over {
                    span { class: "game-shell__level", "{level_label}" }
                }
                span { class: "game-shell__coins", "Coins: {view.score} / {view.total_coins}" }
                span { class: "game-shell__xp", "XP: {view.total_xp}" }
            }
            if view.show_confetti {
                div { class: "confetti", aria_hidden: "true" }
            }
            div { class: "game-shell__body", {children} }
        }
    }
}
