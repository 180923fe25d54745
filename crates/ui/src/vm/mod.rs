mod game_vm;
mod history_vm;
mod markdown_vm;
mod time_fmt;

pub use game_vm::{
    FeedbackVm, GameIntent, GameOutcome, GameVm, OptionState, OptionVm, ResultsVm, start_game,
};
pub use history_vm::{CompletionCardVm, map_completion_cards};
pub use markdown_vm::{inline_markdown_to_html, markdown_to_html, sanitize_html};
pub use time_fmt::format_datetime;
