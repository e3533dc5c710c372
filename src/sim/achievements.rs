//! One-way achievement flags
//!
//! Every condition is monotonic within a run (score, combo peak, lifetime
//! coins), so re-evaluating after each scoring event is enough.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    FirstCoin,
    Combo5,
    Score100,
    Collector,
    Survivor,
}

impl Achievement {
    pub const ALL: [Achievement; 5] = [
        Achievement::FirstCoin,
        Achievement::Combo5,
        Achievement::Score100,
        Achievement::Collector,
        Achievement::Survivor,
    ];

    /// Toast title
    pub fn title(&self) -> &'static str {
        match self {
            Achievement::FirstCoin => "First Coin!",
            Achievement::Combo5 => "Combo Master",
            Achievement::Score100 => "Century!",
            Achievement::Collector => "Coin Collector",
            Achievement::Survivor => "Road Survivor",
        }
    }

    /// Toast description
    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstCoin => "Collected your first coin",
            Achievement::Combo5 => "Reached 5x combo",
            Achievement::Score100 => "Scored 100 points",
            Achievement::Collector => "Collected 100 coins total",
            Achievement::Survivor => "Scored 500 points",
        }
    }

    fn reached(&self, score: u32, combo: u32, total_coins: u32) -> bool {
        match self {
            Achievement::FirstCoin => total_coins >= 1,
            Achievement::Combo5 => combo >= 5,
            Achievement::Score100 => score >= 100,
            Achievement::Collector => total_coins >= 100,
            Achievement::Survivor => score >= 500,
        }
    }
}

/// Unlocked flags, stored as a JSON object keyed by camelCase ids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Achievements {
    pub first_coin: bool,
    pub combo5: bool,
    pub score100: bool,
    pub collector: bool,
    pub survivor: bool,
}

impl Achievements {
    fn flag_mut(&mut self, achievement: Achievement) -> &mut bool {
        match achievement {
            Achievement::FirstCoin => &mut self.first_coin,
            Achievement::Combo5 => &mut self.combo5,
            Achievement::Score100 => &mut self.score100,
            Achievement::Collector => &mut self.collector,
            Achievement::Survivor => &mut self.survivor,
        }
    }

    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        match achievement {
            Achievement::FirstCoin => self.first_coin,
            Achievement::Combo5 => self.combo5,
            Achievement::Score100 => self.score100,
            Achievement::Collector => self.collector,
            Achievement::Survivor => self.survivor,
        }
    }

    /// Set a flag. Returns true only on the first unlock.
    pub fn unlock(&mut self, achievement: Achievement) -> bool {
        let flag = self.flag_mut(achievement);
        let newly = !*flag;
        *flag = true;
        newly
    }

    /// Unlock everything whose condition now holds; returns the new unlocks
    pub fn evaluate(&mut self, score: u32, combo: u32, total_coins: u32) -> Vec<Achievement> {
        Achievement::ALL
            .into_iter()
            .filter(|a| a.reached(score, combo, total_coins))
            .filter(|a| self.unlock(*a))
            .collect()
    }

    /// Union with another set; flags only ever turn on
    pub fn merge(&mut self, other: &Achievements) {
        for achievement in Achievement::ALL {
            if other.is_unlocked(achievement) {
                self.unlock(achievement);
            }
        }
    }

    pub fn unlocked_count(&self) -> usize {
        Achievement::ALL
            .iter()
            .filter(|a| self.is_unlocked(**a))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_is_idempotent() {
        let mut flags = Achievements::default();
        assert!(flags.unlock(Achievement::Combo5));
        assert!(!flags.unlock(Achievement::Combo5));
        assert!(flags.is_unlocked(Achievement::Combo5));
        assert_eq!(flags.unlocked_count(), 1);
    }

    #[test]
    fn test_evaluate_reports_each_once() {
        let mut flags = Achievements::default();
        assert_eq!(flags.evaluate(0, 0, 0), vec![]);
        assert_eq!(flags.evaluate(100, 0, 1), vec![Achievement::FirstCoin, Achievement::Score100]);
        assert_eq!(flags.evaluate(120, 0, 2), vec![]);
        assert_eq!(flags.evaluate(500, 5, 100), vec![
            Achievement::Combo5,
            Achievement::Collector,
            Achievement::Survivor
        ]);
        assert_eq!(flags.unlocked_count(), 5);
    }

    #[test]
    fn test_flags_never_revert() {
        let mut flags = Achievements::default();
        flags.evaluate(600, 0, 0);
        // A new run with a lower score does not take anything away
        flags.evaluate(3, 0, 0);
        assert!(flags.is_unlocked(Achievement::Survivor));
        assert!(flags.is_unlocked(Achievement::Score100));

        let mut other = Achievements::default();
        other.merge(&flags);
        assert_eq!(other, flags);
        other.merge(&Achievements::default());
        assert_eq!(other, flags);
    }

    #[test]
    fn test_json_uses_camel_case_and_merges_defaults() {
        let json = serde_json::to_string(&Achievements {
            first_coin: true,
            ..Default::default()
        })
        .unwrap();
        assert!(json.contains("\"firstCoin\":true"));

        // Older saves may lack keys or carry unknown ones
        let parsed: Achievements = serde_json::from_str(r#"{"combo5":true,"legacy":true}"#).unwrap();
        assert!(parsed.combo5);
        assert!(!parsed.first_coin);
    }
}
