use crate::Score;
use crate::draft::Confidence;
use crate::draft::Role;
use crate::knowledge::Knowledge;
use serde::Serialize;
use std::sync::Arc;

/// where a matchup number came from. reverse lookups invert the stored
/// win rate, which is exact for a single matched pairing; callers who want
/// to weight reverse data lower can key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    DirectLookup,
    ReverseLookup,
    None,
}

impl DataSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DirectLookup => "direct_lookup",
            Self::ReverseLookup => "reverse_lookup",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Matchup {
    pub score: Score,
    pub confidence: Confidence,
    pub games: usize,
    pub source: DataSource,
}

impl Matchup {
    fn none() -> Self {
        Self {
            score: 0.5,
            confidence: Confidence::NoData,
            games: 0,
            source: DataSource::None,
        }
    }
}

pub struct MatchupCalculator(Arc<Knowledge>);

impl From<Arc<Knowledge>> for MatchupCalculator {
    fn from(knowledge: Arc<Knowledge>) -> Self {
        Self(knowledge)
    }
}

impl MatchupCalculator {
    /// lane matchup from our perspective. direct entry first; otherwise the
    /// enemy's entry inverted, since lane win rates are complementary.
    pub fn lane(&self, ours: &str, theirs: &str, role: Role) -> Matchup {
        if let Some(row) = self
            .0
            .matchups
            .get(ours)
            .and_then(|m| m.lane.get(&role))
            .and_then(|row| row.get(theirs))
        {
            return Matchup {
                score: row.win_rate,
                confidence: row.confidence,
                games: row.games,
                source: DataSource::DirectLookup,
            };
        }
        if let Some(row) = self
            .0
            .matchups
            .get(theirs)
            .and_then(|m| m.lane.get(&role))
            .and_then(|row| row.get(ours))
        {
            return Matchup {
                score: crate::round3(1.0 - row.win_rate),
                confidence: row.confidence,
                games: row.games,
                source: DataSource::ReverseLookup,
            };
        }
        Matchup::none()
    }

    /// champion-versus-champion across the whole game, lane-agnostic.
    /// same direct-then-inverted strategy as lane lookups.
    pub fn team(&self, ours: &str, theirs: &str) -> Matchup {
        if let Some(row) = self.0.matchups.get(ours).and_then(|m| m.team.get(theirs)) {
            return Matchup {
                score: row.win_rate,
                confidence: row.confidence,
                games: row.games,
                source: DataSource::DirectLookup,
            };
        }
        if let Some(row) = self.0.matchups.get(theirs).and_then(|m| m.team.get(ours)) {
            return Matchup {
                score: crate::round3(1.0 - row.win_rate),
                confidence: row.confidence,
                games: row.games,
                source: DataSource::ReverseLookup,
            };
        }
        Matchup::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::MatchupRow;
    use crate::knowledge::Matchups;
    use std::path::Path;

    fn calculator() -> MatchupCalculator {
        let mut knowledge = Knowledge::load(Path::new("/nonexistent"));
        let mut darius = Matchups::default();
        darius.lane.insert(
            Role::Top,
            [(
                "Garen".to_string(),
                MatchupRow {
                    win_rate: 0.55,
                    games: 40,
                    confidence: Confidence::High,
                },
            )]
            .into_iter()
            .collect(),
        );
        darius.team.insert(
            "Zed".to_string(),
            MatchupRow {
                win_rate: 0.61,
                games: 18,
                confidence: Confidence::Medium,
            },
        );
        knowledge.matchups.insert("Darius".to_string(), darius);
        MatchupCalculator::from(Arc::new(knowledge))
    }

    #[test]
    fn direct_lookup_returns_stored_rate() {
        let calculator = calculator();
        let matchup = calculator.lane("Darius", "Garen", Role::Top);
        assert!(matchup.score == 0.55);
        assert!(matchup.games == 40);
        assert!(matchup.source == DataSource::DirectLookup);
    }

    #[test]
    fn reverse_lookup_inverts() {
        let calculator = calculator();
        let matchup = calculator.lane("Garen", "Darius", Role::Top);
        assert!((matchup.score - 0.45).abs() < 1e-3);
        assert!(matchup.source == DataSource::ReverseLookup);
        assert!(matchup.games == 40);
    }

    #[test]
    fn direct_and_reverse_are_complementary() {
        let calculator = calculator();
        let forward = calculator.team("Darius", "Zed");
        let backward = calculator.team("Zed", "Darius");
        assert!((forward.score + backward.score - 1.0).abs() < 1e-3);
    }

    #[test]
    fn missing_pairing_is_neutral() {
        let calculator = calculator();
        let matchup = calculator.lane("Darius", "Garen", Role::Mid);
        assert!(matchup.score == 0.5);
        assert!(matchup.source == DataSource::None);
        assert!(matchup.confidence == Confidence::NoData);
    }
}
