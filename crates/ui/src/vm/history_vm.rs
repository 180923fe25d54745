use services::{CompletionId, CompletionListItem, GameCatalog};

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionCardVm {
    pub id: CompletionId,
    pub game_id: String,
    pub game_title: String,
    pub track: &'static str,
    pub completed_at_str: String,
    pub score_label: String,
    pub coins_awarded: u32,
    pub xp_awarded: u32,
    pub passed: bool,
}

impl CompletionCardVm {
    #[must_use]
    pub fn from_item(item: &CompletionListItem, catalog: &GameCatalog) -> Self {
        // Games removed from the catalog still show up, under their id.
        let game_title = catalog
            .get(&item.game_id)
            .map_or_else(|| item.game_id.to_string(), |game| game.title().to_string());
        Self {
            id: item.id,
            game_id: item.game_id.to_string(),
            game_title,
            track: item.track.as_str(),
            completed_at_str: format_datetime(item.completed_at),
            score_label: format!("{} / {} correct", item.correct_count, item.total_stages),
            coins_awarded: item.coins_awarded,
            xp_awarded: item.xp_awarded,
            passed: item.passed,
        }
    }
}

#[must_use]
pub fn map_completion_cards(
    items: &[CompletionListItem],
    catalog: &GameCatalog,
) -> Vec<CompletionCardVm> {
    items
        .iter()
        .map(|item| CompletionCardVm::from_item(item, catalog))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{GameId, GameTrack};
    use quiz_core::time::fixed_now;

    fn item(game: &str) -> CompletionListItem {
        CompletionListItem {
            id: 3,
            game_id: GameId::new(game).unwrap(),
            track: GameTrack::Parenting,
            completed_at: fixed_now(),
            correct_count: 3,
            total_stages: 4,
            coins_awarded: 0,
            xp_awarded: 0,
            passed: false,
        }
    }

    #[test]
    fn card_uses_catalog_title() {
        let catalog = GameCatalog::builtin().unwrap();
        let card = CompletionCardVm::from_item(&item("calm-bedtime-routine"), &catalog);
        assert_eq!(card.game_title, "Calm Bedtime Routine");
        assert_eq!(card.score_label, "3 / 4 correct");
        assert_eq!(card.track, "parenting");
    }

    #[test]
    fn unknown_game_falls_back_to_id() {
        let catalog = GameCatalog::builtin().unwrap();
        let cards = map_completion_cards(&[item("retired-game")], &catalog);
        assert_eq!(cards[0].game_title, "retired-game");
    }
}
