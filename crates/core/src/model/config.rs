use serde::{Deserialize, Serialize};

use crate::model::game::GameMetadata;

/// Overrides carried by navigation into a game screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationOverrides {
    #[serde(default)]
    pub coins_per_level: Option<u32>,
    #[serde(default)]
    pub total_coins: Option<u32>,
    #[serde(default)]
    pub total_xp: Option<u32>,
}

/// Fallback values used when neither navigation nor metadata supplies one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigDefaults {
    pub total_coins: u32,
    pub total_xp: u32,
    pub coins_per_level: u32,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            total_coins: 5,
            total_xp: 10,
            coins_per_level: 1,
        }
    }
}

/// Resolved reward configuration for one play-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub title: String,
    pub total_coins: u32,
    pub total_xp: u32,
    pub coins_per_level: u32,
    pub total_levels: u32,
    pub pass_threshold: u32,
}

fn non_zero(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v > 0)
}

/// Resolve the reward configuration once, at the start of a play-through.
///
/// Precedence per field is navigation override, then game metadata, then
/// `defaults`. Zero counts as absent. `coins_per_level` additionally falls
/// back to the metadata coin total split across levels before using the
/// default. The pass threshold is every stage answered correctly.
#[must_use]
pub fn resolve_config(
    game_data: Option<&GameMetadata>,
    navigation: Option<&NavigationOverrides>,
    defaults: &ConfigDefaults,
    fallback_title: &str,
    total_levels: u32,
) -> GameConfig {
    let nav = navigation.copied().unwrap_or_default();
    let meta_coins = game_data.and_then(|data| non_zero(data.coins));
    let meta_xp = game_data.and_then(|data| non_zero(data.xp));

    let coins_per_level = non_zero(nav.coins_per_level)
        .or_else(|| {
            meta_coins
                .filter(|_| total_levels > 0)
                .map(|coins| coins / total_levels)
                .and_then(|per| non_zero(Some(per)))
        })
        .unwrap_or(defaults.coins_per_level);

    let total_coins = non_zero(nav.total_coins)
        .or(meta_coins)
        .unwrap_or(defaults.total_coins);

    let total_xp = non_zero(nav.total_xp)
        .or(meta_xp)
        .unwrap_or(defaults.total_xp);

    let title = game_data
        .and_then(|data| data.title.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(fallback_title)
        .to_owned();

    GameConfig {
        title,
        total_coins,
        total_xp,
        coins_per_level,
        total_levels,
        pass_threshold: total_levels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_defaults_when_nothing_supplied() {
        let cfg = resolve_config(None, None, &ConfigDefaults::default(), "Budget", 5);
        assert_eq!(cfg.total_coins, 5);
        assert_eq!(cfg.total_xp, 10);
        assert_eq!(cfg.coins_per_level, 1);
        assert_eq!(cfg.pass_threshold, 5);
        assert_eq!(cfg.title, "Budget");
    }

    #[test]
    fn metadata_beats_defaults_and_splits_coins() {
        let meta = GameMetadata {
            coins: Some(20),
            xp: Some(40),
            total_questions: Some(5),
            title: Some("Income vs Expense".into()),
        };
        let cfg = resolve_config(Some(&meta), None, &ConfigDefaults::default(), "x", 5);
        assert_eq!(cfg.total_coins, 20);
        assert_eq!(cfg.total_xp, 40);
        assert_eq!(cfg.coins_per_level, 4);
        assert_eq!(cfg.title, "Income vs Expense");
    }

    #[test]
    fn navigation_beats_metadata() {
        let meta = GameMetadata {
            coins: Some(20),
            xp: Some(40),
            ..GameMetadata::default()
        };
        let nav = NavigationOverrides {
            coins_per_level: Some(3),
            total_coins: Some(12),
            total_xp: None,
        };
        let cfg = resolve_config(Some(&meta), Some(&nav), &ConfigDefaults::default(), "x", 4);
        assert_eq!(cfg.total_coins, 12);
        assert_eq!(cfg.total_xp, 40);
        assert_eq!(cfg.coins_per_level, 3);
    }

    #[test]
    fn zero_values_fall_through() {
        let meta = GameMetadata {
            coins: Some(0),
            xp: Some(0),
            title: Some("   ".into()),
            ..GameMetadata::default()
        };
        let nav = NavigationOverrides {
            total_coins: Some(0),
            ..NavigationOverrides::default()
        };
        let cfg = resolve_config(Some(&meta), Some(&nav), &ConfigDefaults::default(), "Fallback", 3);
        assert_eq!(cfg.total_coins, 5);
        assert_eq!(cfg.total_xp, 10);
        assert_eq!(cfg.title, "Fallback");
    }

    #[test]
    fn small_coin_totals_keep_default_per_level() {
        let meta = GameMetadata {
            coins: Some(2),
            ..GameMetadata::default()
        };
        let cfg = resolve_config(Some(&meta), None, &ConfigDefaults::default(), "x", 5);
        assert_eq!(cfg.coins_per_level, 1);
        assert_eq!(cfg.total_coins, 2);
    }
}
