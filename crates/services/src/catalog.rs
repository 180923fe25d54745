//! Built-in game content.

use std::collections::HashSet;
use std::sync::Arc;

use quiz_core::model::{GameDefinition, GameId, GameMetadata, GameTrack};

use crate::error::CatalogError;

const BUILTIN_CONTENT: &[(&str, &str)] = &[
    (
        "income-vs-expense-reality.json",
        include_str!("../content/income-vs-expense-reality.json"),
    ),
    (
        "needs-vs-wants.json",
        include_str!("../content/needs-vs-wants.json"),
    ),
    (
        "emergency-fund-basics.json",
        include_str!("../content/emergency-fund-basics.json"),
    ),
    (
        "calm-bedtime-routine.json",
        include_str!("../content/calm-bedtime-routine.json"),
    ),
    (
        "tantrum-in-public.json",
        include_str!("../content/tantrum-in-public.json"),
    ),
];

/// Read-only set of games, in display order.
#[derive(Debug, Clone)]
pub struct GameCatalog {
    games: Arc<[GameDefinition]>,
}

impl GameCatalog {
    /// Load the games compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if a content file fails to parse or validate,
    /// or two files share a game id.
    pub fn builtin() -> Result<Self, CatalogError> {
        let games = BUILTIN_CONTENT
            .iter()
            .map(|&(file, raw)| {
                serde_json::from_str::<GameDefinition>(raw)
                    .map_err(|source| CatalogError::Parse { file, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_games(games)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateGame` if two games share an id.
    pub fn from_games(games: Vec<GameDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(games.len());
        for game in &games {
            if !seen.insert(game.id().clone()) {
                return Err(CatalogError::DuplicateGame(game.id().clone()));
            }
        }
        tracing::debug!(games = games.len(), "game catalog loaded");
        Ok(Self {
            games: games.into(),
        })
    }

    #[must_use]
    pub fn list(&self) -> &[GameDefinition] {
        &self.games
    }

    #[must_use]
    pub fn get(&self, id: &GameId) -> Option<&GameDefinition> {
        self.games.iter().find(|game| game.id() == id)
    }

    pub fn list_by_track(&self, track: GameTrack) -> impl Iterator<Item = &GameDefinition> {
        self.games.iter().filter(move |game| game.track() == track)
    }

    /// Reward metadata for a finance game.
    #[must_use]
    pub fn game_data_by_id(&self, id: &GameId) -> Option<&GameMetadata> {
        self.metadata_on_track(id, GameTrack::Finance)
    }

    /// Reward metadata for a parenting game.
    #[must_use]
    pub fn parent_game_by_id(&self, id: &GameId) -> Option<&GameMetadata> {
        self.metadata_on_track(id, GameTrack::Parenting)
    }

    /// Metadata lookup routed through the lookup for the game's own track.
    #[must_use]
    pub fn metadata_for(&self, game: &GameDefinition) -> Option<&GameMetadata> {
        match game.track() {
            GameTrack::Finance => self.game_data_by_id(game.id()),
            GameTrack::Parenting => self.parent_game_by_id(game.id()),
        }
    }

    fn metadata_on_track(&self, id: &GameId, track: GameTrack) -> Option<&GameMetadata> {
        self.get(id)
            .filter(|game| game.track() == track)
            .map(GameDefinition::metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> GameId {
        GameId::new(raw).unwrap()
    }

    #[test]
    fn builtin_content_loads() {
        let catalog = GameCatalog::builtin().unwrap();
        assert_eq!(catalog.list().len(), 5);

        let game = catalog.get(&id("income-vs-expense-reality")).unwrap();
        assert_eq!(game.stage_count(), 5);
        assert_eq!(game.track(), GameTrack::Finance);
        for stage in game.stages() {
            assert!(stage.correct_option().is_some(), "stage {} has no answer", stage.id());
        }
    }

    #[test]
    fn tracks_partition_the_catalog() {
        let catalog = GameCatalog::builtin().unwrap();
        let finance = catalog.list_by_track(GameTrack::Finance).count();
        let parenting = catalog.list_by_track(GameTrack::Parenting).count();
        assert_eq!(finance + parenting, catalog.list().len());
        assert!(parenting > 0);
    }

    #[test]
    fn metadata_lookups_respect_track() {
        let catalog = GameCatalog::builtin().unwrap();
        let finance = id("needs-vs-wants");
        let parenting = id("calm-bedtime-routine");

        assert_eq!(catalog.game_data_by_id(&finance).unwrap().coins, Some(4));
        assert!(catalog.parent_game_by_id(&finance).is_none());
        assert_eq!(catalog.parent_game_by_id(&parenting).unwrap().coins, Some(8));
        assert!(catalog.game_data_by_id(&parenting).is_none());
        assert!(catalog.game_data_by_id(&id("missing-game")).is_none());
    }

    #[test]
    fn duplicate_games_are_rejected() {
        let catalog = GameCatalog::builtin().unwrap();
        let mut games = catalog.list().to_vec();
        games.push(games[0].clone());
        let err = GameCatalog::from_games(games).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateGame(_)));
    }
}
