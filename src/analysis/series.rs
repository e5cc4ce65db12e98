use crate::draft::Side;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// outcome of one finished game in a series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub game_number: usize,
    pub winner: Side,
    pub blue_comp: Vec<String>,
    pub red_comp: Vec<String>,
    pub blue_bans: Vec<String>,
    pub red_bans: Vec<String>,
}

/// picking habits a team has shown earlier in the series
#[derive(Debug, Clone, Default, Serialize)]
pub struct Tendencies {
    /// champions picked in two or more previous games
    pub prioritized: Vec<String>,
    /// opening picks repeated across games
    pub first_picks: Vec<String>,
    /// champions the opponents keep banning away from them
    pub banned_against: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeriesContext {
    pub game_number: usize,
    /// (blue wins, red wins)
    pub score: (usize, usize),
    pub games: Vec<GameResult>,
    pub ours: Tendencies,
    pub enemies: Tendencies,
}

impl SeriesContext {
    pub fn build(game_number: usize, results: &[GameResult], our_side: Side) -> Self {
        if results.is_empty() {
            return Self {
                game_number,
                ..Self::default()
            };
        }
        let blue = results.iter().filter(|g| g.winner == Side::Blue).count();
        let red = results.iter().filter(|g| g.winner == Side::Red).count();
        Self {
            game_number,
            score: (blue, red),
            games: results.to_vec(),
            ours: tendencies(results, our_side),
            enemies: tendencies(results, our_side.flip()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.game_number > 1 && !self.games.is_empty()
    }
}

fn tendencies(games: &[GameResult], side: Side) -> Tendencies {
    let mut picks = Vec::new();
    let mut firsts = Vec::new();
    let mut received = Vec::new();
    for game in games {
        let (comp, enemy_bans) = match side {
            Side::Blue => (&game.blue_comp, &game.red_bans),
            Side::Red => (&game.red_comp, &game.blue_bans),
        };
        picks.extend(comp.iter().cloned());
        firsts.extend(comp.first().cloned());
        received.extend(enemy_bans.iter().cloned());
    }
    Tendencies {
        prioritized: repeated(&picks),
        first_picks: repeated(&firsts),
        banned_against: repeated(&received),
    }
}

/// champions appearing at least twice, in first-seen order
fn repeated(champions: &[String]) -> Vec<String> {
    let mut counts = BTreeMap::new();
    for champion in champions {
        *counts.entry(champion.clone()).or_insert(0usize) += 1;
    }
    let mut seen = std::collections::BTreeSet::new();
    champions
        .iter()
        .filter(|c| counts.get(*c).copied().unwrap_or(0) >= 2)
        .filter(|c| seen.insert((*c).clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<GameResult> {
        vec![
            GameResult {
                game_number: 1,
                winner: Side::Blue,
                blue_comp: vec!["Azir".into(), "Vi".into(), "Rell".into()],
                red_comp: vec!["Rumble".into(), "Sejuani".into()],
                blue_bans: vec!["Yone".into()],
                red_bans: vec!["Kalista".into()],
            },
            GameResult {
                game_number: 2,
                winner: Side::Red,
                blue_comp: vec!["Azir".into(), "Jarvan IV".into()],
                red_comp: vec!["Rumble".into(), "Maokai".into()],
                blue_bans: vec!["Yone".into()],
                red_bans: vec!["Kalista".into()],
            },
        ]
    }

    #[test]
    fn score_counts_winners() {
        let context = SeriesContext::build(3, &results(), Side::Blue);
        assert!(context.score == (1, 1));
        assert!(context.is_available());
    }

    #[test]
    fn repeated_picks_surface_as_tendencies() {
        let context = SeriesContext::build(3, &results(), Side::Blue);
        assert!(context.ours.prioritized == vec!["Azir".to_string()]);
        assert!(context.ours.first_picks == vec!["Azir".to_string()]);
        assert!(context.ours.banned_against == vec!["Kalista".to_string()]);
        assert!(context.enemies.prioritized == vec!["Rumble".to_string()]);
        assert!(context.enemies.banned_against == vec!["Yone".to_string()]);
    }

    #[test]
    fn empty_history_is_unavailable() {
        let context = SeriesContext::build(1, &[], Side::Blue);
        assert!(!context.is_available());
        assert!(context.score == (0, 0));
    }
}
