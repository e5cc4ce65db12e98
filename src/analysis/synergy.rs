use crate::Score;
use crate::knowledge::Knowledge;
use crate::knowledge::pair_key;
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;

/// curated synergy strength letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
}

impl Grade {
    pub const fn multiplier(&self) -> Score {
        match self {
            Self::S => 1.0,
            Self::A => 0.8,
            Self::B => 0.6,
            Self::C => 0.4,
        }
    }
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl TryFrom<&str> for Grade {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_uppercase().as_str() {
            "S" => Ok(Self::S),
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            other => Err(anyhow::anyhow!("unknown grade: {}", other)),
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SynergyPair {
    pub champions: (String, String),
    pub score: Score,
}

#[derive(Debug, Clone)]
pub struct TeamSynergy {
    pub total: Score,
    pub pair_count: usize,
    /// strongest non-neutral pairs, capped at five
    pub pairs: Vec<SynergyPair>,
}

impl Default for TeamSynergy {
    fn default() -> Self {
        Self {
            total: 0.5,
            pair_count: 0,
            pairs: Vec::new(),
        }
    }
}

/// pairwise teamwork scoring. curated expert ratings first, the
/// statistical co-play table second, neutral 0.5 otherwise.
pub struct SynergyService(Arc<Knowledge>);

const CURATED_BASE: Score = 0.85;

impl From<Arc<Knowledge>> for SynergyService {
    fn from(knowledge: Arc<Knowledge>) -> Self {
        Self(knowledge)
    }
}

impl SynergyService {
    pub fn score(&self, a: &str, b: &str) -> Score {
        if let Some(grade) = self.0.synergy_pairs.get(&pair_key(a, b)) {
            return crate::round3(CURATED_BASE * grade.multiplier());
        }
        if let Some(score) = self.stat(a, b).or(self.stat(b, a)) {
            return score;
        }
        0.5
    }

    fn stat(&self, a: &str, b: &str) -> Option<Score> {
        self.0.stat_synergies.get(a).and_then(|row| row.get(b)).copied()
    }

    pub fn team(&self, picks: &[String]) -> TeamSynergy {
        if picks.len() < 2 {
            return TeamSynergy::default();
        }
        let mut scores = Vec::new();
        let mut pairs = Vec::new();
        for (i, a) in picks.iter().enumerate() {
            for b in picks.iter().skip(i + 1) {
                let score = self.score(a, b);
                scores.push(score);
                if score != 0.5 {
                    pairs.push(SynergyPair {
                        champions: (a.clone(), b.clone()),
                        score,
                    });
                }
            }
        }
        pairs.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        pairs.truncate(5);
        let total = scores.iter().sum::<Score>() / scores.len() as Score;
        TeamSynergy {
            total: crate::round3(total),
            pair_count: scores.len(),
            pairs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn service() -> SynergyService {
        let mut knowledge = Knowledge::load(Path::new("/nonexistent"));
        knowledge
            .synergy_pairs
            .insert(pair_key("Xayah", "Rakan"), Grade::S);
        knowledge
            .synergy_pairs
            .insert(pair_key("Lucian", "Nami"), Grade::B);
        knowledge.stat_synergies.insert(
            "Orianna".to_string(),
            [("Malphite".to_string(), 0.62)].into_iter().collect(),
        );
        SynergyService::from(Arc::new(knowledge))
    }

    #[test]
    fn curated_beats_statistical() {
        let service = service();
        assert!(service.score("Xayah", "Rakan") == 0.85);
        assert!(service.score("Rakan", "Xayah") == 0.85);
        assert!(service.score("Lucian", "Nami") == crate::round3(0.85 * 0.6));
    }

    #[test]
    fn statistical_read_in_both_orientations() {
        let service = service();
        assert!(service.score("Orianna", "Malphite") == 0.62);
        assert!(service.score("Malphite", "Orianna") == 0.62);
    }

    #[test]
    fn unknown_pair_is_neutral() {
        let service = service();
        assert!(service.score("Garen", "Teemo") == 0.5);
    }

    #[test]
    fn team_synergy_averages_pairs() {
        let service = service();
        let team = service.team(&[
            "Xayah".to_string(),
            "Rakan".to_string(),
            "Garen".to_string(),
        ]);
        assert!(team.pair_count == 3);
        assert!(team.total == crate::round3((0.85 + 0.5 + 0.5) / 3.0));
        assert!(team.pairs.len() == 1);
        assert!(team.pairs[0].score == 0.85);
    }

    #[test]
    fn short_team_is_neutral() {
        let service = service();
        let team = service.team(&["Xayah".to_string()]);
        assert!(team.total == 0.5);
        assert!(team.pair_count == 0);
    }
}
