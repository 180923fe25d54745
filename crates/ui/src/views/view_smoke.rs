use chrono::Duration;
use dioxus::prelude::*;
use quiz_core::model::{GameId, GameTrack, PlaythroughId};
use quiz_core::time::fixed_now;
use storage::repository::{
    CompletionRecord, CompletionRepository, CompletionRow, Storage, StorageError,
};

use super::test_harness::{
    ViewHarness, ViewKind, setup_view_harness, setup_view_harness_with_ledger,
};
use crate::vm::GameIntent;

fn record(game: &str, track: GameTrack, passed: bool) -> CompletionRecord {
    let now = fixed_now();
    CompletionRecord {
        playthrough_id: PlaythroughId::generate(),
        game_id: GameId::new(game).unwrap(),
        track,
        started_at: now - Duration::minutes(2),
        completed_at: now,
        correct_count: if passed { 4 } else { 2 },
        total_stages: 4,
        coins_awarded: if passed { 8 } else { 0 },
        xp_awarded: if passed { 12 } else { 0 },
        passed,
    }
}

async fn settle(harness: &mut ViewHarness) {
    for _ in 0..3 {
        harness.drive_async().await;
    }
}

fn correct_index(harness: &ViewHarness) -> usize {
    let vm = harness.game_handles().vm();
    harness.dom.in_runtime(|| {
        vm.peek()
            .as_ref()
            .and_then(|vm| {
                vm.session()
                    .current_stage()
                    .options()
                    .iter()
                    .position(|option| option.is_correct)
            })
            .expect("game loaded")
    })
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_games_and_balance() {
    let mut harness = setup_view_harness(ViewKind::Home);
    harness
        .storage
        .completions
        .append_completion(&record("calm-bedtime-routine", GameTrack::Parenting, true))
        .await
        .expect("append completion");

    harness.rebuild();
    settle(&mut harness).await;
    let html = harness.render();
    assert!(html.contains("Money Skills"), "missing finance section in {html}");
    assert!(html.contains("Parenting Scenarios"), "missing parenting section in {html}");
    assert!(html.contains("Income vs Expense Reality"), "missing game in {html}");
    assert!(html.contains("Coins: 8"), "missing balance in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_completion_card() {
    let mut harness = setup_view_harness(ViewKind::History);
    harness
        .storage
        .completions
        .append_completion(&record("calm-bedtime-routine", GameTrack::Parenting, false))
        .await
        .expect("append completion");

    harness.rebuild();
    settle(&mut harness).await;
    let html = harness.render();
    assert!(html.contains("Calm Bedtime Routine"), "missing title in {html}");
    assert!(html.contains("Not passed"), "missing status in {html}");
    assert!(html.contains("2 / 4 correct"), "missing score in {html}");
    assert!(html.contains("Play again"), "missing replay link in {html}");
}

struct FailingLedger;

#[async_trait::async_trait]
impl CompletionRepository for FailingLedger {
    async fn append_completion(&self, _record: &CompletionRecord) -> Result<i64, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_completion(&self, _id: i64) -> Result<CompletionRow, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_completions(
        &self,
        _game_id: Option<&GameId>,
        _limit: u32,
    ) -> Result<Vec<CompletionRow>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn coin_balance(&self) -> Result<u64, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_error_state() {
    let mut harness = setup_view_harness_with_ledger(
        ViewKind::History,
        Storage::in_memory(),
        std::sync::Arc::new(FailingLedger),
    );
    harness.rebuild();
    settle(&mut harness).await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_renders_first_stage() {
    let mut harness = setup_view_harness(ViewKind::Game("needs-vs-wants".into()));
    harness.rebuild();
    settle(&mut harness).await;
    let html = harness.render();
    assert!(html.contains("Needs vs Wants"), "missing shell title in {html}");
    assert!(html.contains("Level 1 of 4"), "missing level in {html}");
    assert!(html.contains("<strong>need</strong>"), "missing prompt in {html}");
    assert!(html.contains("Winter coat"), "missing option in {html}");
    assert!(!html.contains("game-feedback"), "feedback shown too early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_unknown_game() {
    let mut harness = setup_view_harness(ViewKind::Game("not-a-game".into()));
    harness.rebuild();
    settle(&mut harness).await;
    let html = harness.render();
    assert!(html.contains("find that game"), "missing error in {html}");
    assert!(html.contains("Back to games"), "missing link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_shows_feedback_after_pick() {
    let mut harness = setup_view_harness(ViewKind::Game("needs-vs-wants".into()));
    harness.rebuild();
    settle(&mut harness).await;

    let right = correct_index(&harness);
    harness.dispatch(GameIntent::Select(right));
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Nice choice!"), "missing feedback in {html}");
    assert!(html.contains("game-option--correct"), "missing marked option in {html}");
    assert!(html.contains("Next"), "missing continue button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_plays_to_results() {
    let mut harness = setup_view_harness(ViewKind::Game("emergency-fund-basics".into()));
    harness.rebuild();
    settle(&mut harness).await;

    for _ in 0..3 {
        let right = correct_index(&harness);
        harness.dispatch(GameIntent::Select(right));
        settle(&mut harness).await;
        harness.dispatch(GameIntent::Continue);
        settle(&mut harness).await;
    }

    let html = harness.render();
    assert!(html.contains("You nailed it!"), "missing results in {html}");
    assert!(html.contains("Perfect score!"), "missing perfect badge in {html}");
    assert!(html.contains("confetti"), "missing confetti in {html}");

    let rows = harness
        .storage
        .completions
        .list_completions(None, 10)
        .await
        .expect("list completions");
    assert_eq!(rows.len(), 1);
    assert!(rows[0].record.passed);
}

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_continue_waits_for_a_busy_game() {
    let mut harness = setup_view_harness(ViewKind::Game("needs-vs-wants".into()));
    harness.rebuild();
    settle(&mut harness).await;

    let right = correct_index(&harness);
    harness.dispatch(GameIntent::Select(right));
    settle(&mut harness).await;

    // Hold the game the way an in-flight reveal tick does.
    let vm = harness.game_handles().vm();
    let held = harness.dom.in_runtime(|| {
        let mut vm = vm;
        vm.write().take()
    });
    assert!(held.is_some());

    harness.dispatch(GameIntent::Continue);
    harness.drive_async().await;
    harness.dom.in_runtime(|| {
        let mut vm = vm;
        vm.set(held);
    });
    for _ in 0..3 {
        settle(&mut harness).await;
    }

    let html = harness.render();
    assert!(html.contains("Level 2 of 4"), "continue was lost in {html}");
    assert!(!html.contains("game-error"), "busy game surfaced an error in {html}");
}
