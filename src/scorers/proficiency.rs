use crate::Score;
use crate::TRANSFER_MAX_WEIGHT;
use crate::draft::Confidence;
use crate::draft::Player;
use crate::draft::Role;
use crate::knowledge::Knowledge;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// where a proficiency signal came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencySource {
    Direct,
    Transfer,
    None,
}

impl ProficiencySource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Transfer => "transfer",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolEntry {
    pub champion: String,
    pub score: Score,
    pub games: usize,
    pub confidence: Confidence,
}

#[derive(Debug, Clone)]
pub struct RoleProficiency {
    pub score: Score,
    pub confidence: Confidence,
    pub player: Option<String>,
    pub source: ProficiencySource,
}

pub struct ProficiencyScorer(Arc<Knowledge>);

impl From<Arc<Knowledge>> for ProficiencyScorer {
    fn from(knowledge: Arc<Knowledge>) -> Self {
        Self(knowledge)
    }
}

// base scoring
impl ProficiencyScorer {
    /// 60% win rate, 40% games saturation at ten games
    pub fn score(&self, player: &str, champion: &str) -> (Score, Confidence) {
        let Some(entry) = self
            .0
            .proficiencies
            .get(player)
            .and_then(|pool| pool.get(champion))
        else {
            return (0.5, Confidence::NoData);
        };
        let games = entry.games();
        let score = entry.rate() * 0.6 + (games / 10.0).min(1.0) * 0.4;
        let confidence = entry
            .confidence
            .unwrap_or_else(|| Confidence::from(games as usize));
        (crate::round3(score), confidence)
    }

    /// a player's champions at or above a games floor, best first
    pub fn pool(&self, player: &str, min_games: usize) -> Vec<PoolEntry> {
        let Some(champions) = self.0.proficiencies.get(player) else {
            return Vec::new();
        };
        let mut pool = champions
            .iter()
            .filter(|(_, entry)| entry.games_raw >= min_games as f64)
            .map(|(champion, entry)| {
                let (score, confidence) = self.score(player, champion);
                PoolEntry {
                    champion: champion.clone(),
                    score,
                    games: entry.games_raw as usize,
                    confidence,
                }
            })
            .collect::<Vec<_>>();
        pool.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        pool
    }
}

// role-level scoring
impl ProficiencyScorer {
    /// proficiency of whichever rostered player owns the role
    pub fn role(&self, champion: &str, role: Role, players: &[Player]) -> RoleProficiency {
        let Some(player) = players.iter().find(|p| p.role == Some(role)) else {
            return RoleProficiency {
                score: 0.5,
                confidence: Confidence::NoData,
                player: None,
                source: ProficiencySource::None,
            };
        };
        let (score, confidence) = self.score(&player.name, champion);
        RoleProficiency {
            score,
            confidence,
            player: Some(player.name.clone()),
            source: match confidence {
                Confidence::NoData => ProficiencySource::None,
                _ => ProficiencySource::Direct,
            },
        }
    }

    /// role proficiency with a skill-transfer rescue. when the player has
    /// little or no history on the candidate, a similar champion they do
    /// play at trusted confidence blends in, capped at half the signal.
    pub fn role_with_transfer(
        &self,
        champion: &str,
        role: Role,
        players: &[Player],
        min_games: usize,
    ) -> RoleProficiency {
        let direct = self.role(champion, role, players);
        let Some(player) = direct.player.clone() else {
            return direct;
        };
        if direct.confidence.is_trusted() {
            return RoleProficiency {
                source: ProficiencySource::Direct,
                ..direct
            };
        }
        let available = self
            .pool(&player, min_games)
            .into_iter()
            .filter(|entry| entry.confidence.is_trusted())
            .map(|entry| entry.champion)
            .collect::<BTreeSet<_>>();
        let Some(transfer) = self
            .0
            .transfers
            .get(champion)
            .into_iter()
            .flatten()
            .filter(|t| t.co_play_rate > 0.0)
            .find(|t| available.contains(&t.champion))
        else {
            return direct;
        };
        let (transfer_score, _) = self.score(&player, &transfer.champion);
        let weight = (TRANSFER_MAX_WEIGHT * transfer.co_play_rate).min(TRANSFER_MAX_WEIGHT);
        let blended = (direct.score * (1.0 - weight) + transfer_score * weight).clamp(0.0, 1.0);
        RoleProficiency {
            score: crate::round3(blended),
            confidence: match direct.confidence {
                Confidence::NoData => Confidence::Low,
                confidence => confidence,
            },
            player: Some(player),
            source: ProficiencySource::Transfer,
        }
    }

    /// games-weighted mean win rate over the player's champions whose
    /// primary role matches. None when the player has no such history.
    pub fn role_strength(&self, player: &str, role: Role) -> Option<Score> {
        let champions = self.0.proficiencies.get(player)?;
        let mut weighted = 0.0;
        let mut weight = 0.0;
        for (champion, entry) in champions {
            let primary = self.0.history.get(champion).and_then(|h| h.primary());
            if primary != Some(role) {
                continue;
            }
            let games = if entry.games_weighted > 0.0 {
                entry.games_weighted
            } else {
                entry.games_raw
            };
            if games <= 0.0 {
                continue;
            }
            weighted += entry.rate() * games;
            weight += games;
        }
        match weight > 0.0 {
            true => Some(crate::round3(weighted / weight)),
            false => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::ProficiencyEntry;
    use crate::knowledge::RoleHistory;
    use crate::knowledge::Transfer;
    use std::path::Path;

    fn entry(games: f64, rate: f64) -> ProficiencyEntry {
        ProficiencyEntry {
            games_raw: games,
            games_weighted: games,
            win_rate: rate,
            win_rate_weighted: rate,
            confidence: None,
        }
    }

    fn knowledge() -> Knowledge {
        let mut knowledge = Knowledge::load(Path::new("/nonexistent"));
        knowledge.proficiencies.insert(
            "Faker".to_string(),
            [
                ("Azir".to_string(), entry(12.0, 0.7)),
                ("Ahri".to_string(), entry(9.0, 0.6)),
                ("Poppy".to_string(), entry(1.0, 1.0)),
            ]
            .into_iter()
            .collect(),
        );
        knowledge.history.insert(
            "Azir".to_string(),
            RoleHistory {
                canonical: Some(Role::Mid),
                ..RoleHistory::default()
            },
        );
        knowledge.history.insert(
            "Ahri".to_string(),
            RoleHistory {
                canonical: Some(Role::Mid),
                ..RoleHistory::default()
            },
        );
        knowledge.transfers.insert(
            "Orianna".to_string(),
            vec![Transfer {
                champion: "Azir".to_string(),
                co_play_rate: 0.8,
            }],
        );
        knowledge
    }

    fn players() -> Vec<Player> {
        vec![Player::new("p1", "Faker", Some(Role::Mid))]
    }

    #[test]
    fn score_blends_rate_and_volume() {
        let scorer = ProficiencyScorer::from(Arc::new(knowledge()));
        let (score, confidence) = scorer.score("Faker", "Azir");
        assert!(score == crate::round3(0.7 * 0.6 + 1.0 * 0.4));
        assert!(confidence == Confidence::High);
    }

    #[test]
    fn unknown_pair_is_neutral() {
        let scorer = ProficiencyScorer::from(Arc::new(knowledge()));
        let (score, confidence) = scorer.score("Faker", "Teemo");
        assert!(score == 0.5);
        assert!(confidence == Confidence::NoData);
        let (score, confidence) = scorer.score("Nobody", "Azir");
        assert!(score == 0.5);
        assert!(confidence == Confidence::NoData);
    }

    #[test]
    fn pool_sorted_and_floored() {
        let scorer = ProficiencyScorer::from(Arc::new(knowledge()));
        let pool = scorer.pool("Faker", 2);
        assert!(pool.len() == 2);
        assert!(pool[0].score >= pool[1].score);
        assert!(pool.iter().all(|e| e.games >= 2));
    }

    #[test]
    fn transfer_blends_similar_champion() {
        let scorer = ProficiencyScorer::from(Arc::new(knowledge()));
        // no direct Orianna history, but Azir transfers at 0.8 co-play
        let outcome = scorer.role_with_transfer("Orianna", Role::Mid, &players(), 4);
        assert!(outcome.source == ProficiencySource::Transfer);
        let weight: Score = 0.5 * 0.8;
        let azir = 0.7 * 0.6 + 0.4;
        let expected = 0.5 * (1.0 - weight) + azir * weight;
        assert!((outcome.score - expected).abs() < 2e-3);
        assert!(outcome.confidence == Confidence::Low);
    }

    #[test]
    fn trusted_direct_skips_transfer() {
        let scorer = ProficiencyScorer::from(Arc::new(knowledge()));
        let outcome = scorer.role_with_transfer("Azir", Role::Mid, &players(), 4);
        assert!(outcome.source == ProficiencySource::Direct);
        assert!(outcome.player == Some("Faker".to_string()));
    }

    #[test]
    fn role_strength_weights_by_games() {
        let scorer = ProficiencyScorer::from(Arc::new(knowledge()));
        let strength = scorer.role_strength("Faker", Role::Mid);
        let expected = (0.7 * 12.0 + 0.6 * 9.0) / 21.0;
        assert!(strength == Some(crate::round3(expected)));
        assert!(scorer.role_strength("Faker", Role::Top) == None);
    }
}
