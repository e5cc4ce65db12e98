use crate::Score;
use crate::draft::Role;
use crate::knowledge::Tier;
use crate::knowledge::TournamentTable;
use serde::Serialize;
use std::sync::Arc;

/// tournament data gives two separate signals: a role-agnostic priority
/// (how hard pros contest the champion) and a role-specific performance
/// (win rate, blended toward even when the sample is thin).
pub struct TournamentScorer(Arc<TournamentTable>);

const SAMPLE_THRESHOLD: usize = 10;

impl From<Arc<TournamentTable>> for TournamentScorer {
    fn from(table: Arc<TournamentTable>) -> Self {
        Self(table)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TournamentScores {
    pub priority: Score,
    pub performance: Score,
    pub has_data: bool,
    pub role_has_data: bool,
    pub picks: usize,
}

// scoring
impl TournamentScorer {
    pub fn priority(&self, champion: &str) -> Score {
        self.0
            .champions
            .get(champion)
            .map(|entry| entry.priority)
            .unwrap_or(self.0.missing_priority)
    }

    pub fn performance(&self, champion: &str, role: Role) -> Score {
        let Some(row) = self
            .0
            .champions
            .get(champion)
            .and_then(|entry| entry.roles.get(&role))
        else {
            return self.0.missing_performance;
        };
        match row.adjusted {
            Some(adjusted) => adjusted,
            None => Self::adjust(row.winrate, row.picks),
        }
    }

    /// high win rates on thin samples drift toward even; low win rates are
    /// preserved as a warning signal
    pub fn adjust(winrate: Score, picks: usize) -> Score {
        if winrate > 0.5 && picks < SAMPLE_THRESHOLD {
            let weight = picks as Score / SAMPLE_THRESHOLD as Score;
            weight * winrate + (1.0 - weight) * 0.5
        } else {
            winrate
        }
    }

    pub fn scores(&self, champion: &str, role: Role) -> TournamentScores {
        let entry = self.0.champions.get(champion);
        let row = entry.and_then(|e| e.roles.get(&role));
        TournamentScores {
            priority: self.priority(champion),
            performance: self.performance(champion, role),
            has_data: entry.is_some(),
            role_has_data: row.is_some(),
            picks: row.map(|r| r.picks).unwrap_or(0),
        }
    }

    pub fn tier_of(priority: Score) -> Tier {
        match priority {
            p if p >= 0.70 => Tier::S,
            p if p >= 0.50 => Tier::A,
            p if p >= 0.30 => Tier::B,
            p if p >= 0.15 => Tier::C,
            _ => Tier::D,
        }
    }
}

// ranked listings
impl TournamentScorer {
    pub fn top_priority(&self, limit: usize) -> Vec<String> {
        let mut ranked = self
            .0
            .champions
            .iter()
            .map(|(champion, entry)| (champion.clone(), entry.priority))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);
        ranked.into_iter().map(|(champion, _)| champion).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::TournamentEntry;
    use crate::knowledge::TournamentRole;

    fn scorer() -> TournamentScorer {
        let mut table = TournamentTable::default();
        table.champions.insert(
            "Azir".to_string(),
            TournamentEntry {
                priority: 0.70,
                roles: [(
                    Role::Mid,
                    TournamentRole {
                        picks: 4,
                        winrate: 0.75,
                        adjusted: None,
                    },
                )]
                .into_iter()
                .collect(),
            },
        );
        table.champions.insert(
            "Rumble".to_string(),
            TournamentEntry {
                priority: 0.40,
                roles: [(
                    Role::Top,
                    TournamentRole {
                        picks: 20,
                        winrate: 0.42,
                        adjusted: None,
                    },
                )]
                .into_iter()
                .collect(),
            },
        );
        TournamentScorer::from(Arc::new(table))
    }

    #[test]
    fn missing_champion_takes_penalties() {
        let scorer = scorer();
        assert!(scorer.priority("Teemo") == 0.05);
        assert!(scorer.performance("Teemo", Role::Top) == 0.35);
        assert!(scorer.performance("Azir", Role::Top) == 0.35);
    }

    #[test]
    fn thin_hot_samples_blend_toward_even() {
        let scorer = scorer();
        let adjusted = scorer.performance("Azir", Role::Mid);
        let expected = 0.4 * 0.75 + 0.6 * 0.5;
        assert!((adjusted - expected).abs() < 1e-9);
    }

    #[test]
    fn low_rates_are_preserved() {
        let scorer = scorer();
        assert!(scorer.performance("Rumble", Role::Top) == 0.42);
        assert!(TournamentScorer::adjust(0.42, 3) == 0.42);
    }

    #[test]
    fn priority_maps_to_tiers() {
        assert!(TournamentScorer::tier_of(0.75) == Tier::S);
        assert!(TournamentScorer::tier_of(0.55) == Tier::A);
        assert!(TournamentScorer::tier_of(0.31) == Tier::B);
        assert!(TournamentScorer::tier_of(0.20) == Tier::C);
        assert!(TournamentScorer::tier_of(0.01) == Tier::D);
    }

    #[test]
    fn top_priority_is_ordered() {
        let scorer = scorer();
        let top = scorer.top_priority(5);
        assert!(top == vec!["Azir".to_string(), "Rumble".to_string()]);
    }
}
