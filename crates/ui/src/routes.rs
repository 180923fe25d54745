use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{GameView, HistoryView, HomeView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/game/:game_id", GameView)] Game { game_id: String },
        #[route("/history", HistoryView)] History {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Quiz Games" }
            ul {
                li { Link { to: Route::Home {}, "Games" } }
                li { Link { to: Route::History {}, "History" } }
            }
        }
    }
}
