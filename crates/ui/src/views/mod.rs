mod game;
mod history;
mod home;
mod shell;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use game::GameView;
pub use history::HistoryView;
pub use home::HomeView;
pub use shell::GameShell;
pub use state::{ViewError, ViewState, view_state_from_resource};
