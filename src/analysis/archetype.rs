use crate::Score;
use crate::knowledge::Knowledge;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// team-composition styles. each champion carries a sparse tag -> [0,1]
/// map; a team's style is the normalized sum over its picks.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Engage,
    Split,
    Teamfight,
    Protect,
    Pick,
}

impl Archetype {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Engage,
            Self::Split,
            Self::Teamfight,
            Self::Protect,
            Self::Pick,
        ]
    }
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Engage => "engage",
            Self::Split => "split",
            Self::Teamfight => "teamfight",
            Self::Protect => "protect",
            Self::Pick => "pick",
        }
    }
}

impl TryFrom<&str> for Archetype {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "engage" => Ok(Self::Engage),
            "split" => Ok(Self::Split),
            "teamfight" => Ok(Self::Teamfight),
            "protect" => Ok(Self::Protect),
            "pick" => Ok(Self::Pick),
            other => Err(anyhow::anyhow!("unknown archetype: {}", other)),
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChampionArchetypes {
    pub primary: Option<Archetype>,
    pub secondary: Option<Archetype>,
    pub scores: BTreeMap<Archetype, Score>,
}

#[derive(Debug, Clone, Default)]
pub struct TeamArchetype {
    pub primary: Option<Archetype>,
    pub secondary: Option<Archetype>,
    pub scores: BTreeMap<Archetype, Score>,
    /// mass of the primary coordinate; how committed the comp is
    pub alignment: Score,
}

#[derive(Debug, Clone)]
pub struct CompAdvantage {
    pub advantage: Score,
    pub ours: Option<Archetype>,
    pub theirs: Option<Archetype>,
    pub description: String,
}

pub struct ArchetypeService(Arc<Knowledge>);

impl From<Arc<Knowledge>> for ArchetypeService {
    fn from(knowledge: Arc<Knowledge>) -> Self {
        Self(knowledge)
    }
}

// champion lookups
impl ArchetypeService {
    pub fn champion(&self, champion: &str) -> ChampionArchetypes {
        let scores = self
            .0
            .archetypes
            .get(champion)
            .cloned()
            .unwrap_or_default();
        let (primary, secondary) = top_two(&scores);
        ChampionArchetypes {
            primary,
            secondary,
            scores,
        }
    }

    /// max tag score; how strongly the champion expresses any one style
    pub fn raw_strength(&self, champion: &str) -> Score {
        self.champion(champion)
            .scores
            .values()
            .fold(0.0, |max, s| s.max(max))
    }

    /// share of the champion's archetype mass on one tag
    pub fn contribution(&self, champion: &str, tag: Archetype) -> Score {
        let scores = self.champion(champion).scores;
        let total = scores.values().sum::<Score>();
        if total <= 0.0 {
            return 0.0;
        }
        scores.get(&tag).copied().unwrap_or(0.0) / total
    }

    /// rewards champions whose mass spreads over several tags
    pub fn versatility(&self, champion: &str) -> Score {
        let scores = self.champion(champion).scores;
        let total = scores.values().sum::<Score>();
        let max = scores.values().fold(0.0, |m: Score, s| s.max(m));
        if total <= 0.0 {
            return 0.0;
        }
        1.0 - max / total
    }
}

// team aggregation
impl ArchetypeService {
    pub fn team(&self, picks: &[String]) -> TeamArchetype {
        if picks.is_empty() {
            return TeamArchetype::default();
        }
        let mut aggregate = BTreeMap::new();
        for pick in picks {
            for (tag, score) in self.champion(pick).scores {
                *aggregate.entry(tag).or_insert(0.0) += score;
            }
        }
        let total = aggregate.values().sum::<Score>();
        if total <= 0.0 {
            return TeamArchetype::default();
        }
        let scores = aggregate
            .into_iter()
            .map(|(tag, score)| (tag, score / total))
            .collect::<BTreeMap<_, _>>();
        let (primary, secondary) = top_two(&scores);
        let alignment = primary
            .and_then(|p| scores.get(&p).copied())
            .unwrap_or(0.0);
        TeamArchetype {
            primary,
            secondary,
            scores,
            alignment: crate::round3(alignment),
        }
    }

    /// rock-paper-scissors effectiveness of one style into another.
    /// missing entries are neutral.
    pub fn effectiveness(&self, ours: Archetype, theirs: Archetype) -> Score {
        self.0
            .effectiveness
            .get(&(ours, theirs))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn advantage(&self, our_picks: &[String], enemy_picks: &[String]) -> CompAdvantage {
        let ours = self.team(our_picks);
        let theirs = self.team(enemy_picks);
        let effectiveness = match (ours.primary, theirs.primary) {
            (Some(a), Some(b)) => self.effectiveness(a, b),
            _ => 1.0,
        };
        CompAdvantage {
            advantage: crate::round3(effectiveness),
            description: describe(effectiveness, ours.primary, theirs.primary),
            ours: ours.primary,
            theirs: theirs.primary,
        }
    }
}

fn describe(effectiveness: Score, ours: Option<Archetype>, theirs: Option<Archetype>) -> String {
    match (ours, theirs) {
        (Some(ours), Some(theirs)) if effectiveness > 1.1 => {
            format!("Your {} comp counters their {} style", ours, theirs)
        }
        (Some(ours), Some(theirs)) if effectiveness < 0.9 => {
            format!("Their {} comp counters your {} style", theirs, ours)
        }
        _ => "Neutral composition matchup".to_string(),
    }
}

fn top_two(scores: &BTreeMap<Archetype, Score>) -> (Option<Archetype>, Option<Archetype>) {
    let mut ranked = scores.iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    let primary = ranked.first().map(|(tag, _)| **tag);
    let secondary = ranked.get(1).map(|(tag, _)| **tag);
    (primary, secondary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::Knowledge;
    use std::path::Path;

    fn service() -> ArchetypeService {
        let mut knowledge = Knowledge::load(Path::new("/nonexistent"));
        knowledge.archetypes.insert(
            "Malphite".to_string(),
            [(Archetype::Engage, 0.9), (Archetype::Teamfight, 0.6)]
                .into_iter()
                .collect(),
        );
        knowledge.archetypes.insert(
            "Orianna".to_string(),
            [(Archetype::Teamfight, 0.9), (Archetype::Protect, 0.3)]
                .into_iter()
                .collect(),
        );
        knowledge
            .effectiveness
            .insert((Archetype::Engage, Archetype::Protect), 0.8);
        knowledge
            .effectiveness
            .insert((Archetype::Engage, Archetype::Split), 1.2);
        ArchetypeService::from(Arc::new(knowledge))
    }

    #[test]
    fn champion_primary_is_argmax() {
        let service = service();
        let champion = service.champion("Malphite");
        assert!(champion.primary == Some(Archetype::Engage));
        assert!(champion.secondary == Some(Archetype::Teamfight));
    }

    #[test]
    fn unknown_champion_has_no_primary() {
        let service = service();
        assert!(service.champion("Zilean").primary == None);
        assert!(service.team(&["Zilean".to_string()]).primary == None);
    }

    #[test]
    fn team_scores_normalize() {
        let service = service();
        let team = service.team(&["Malphite".to_string(), "Orianna".to_string()]);
        let total = team.scores.values().sum::<Score>();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(team.primary == Some(Archetype::Teamfight));
        assert!(team.alignment > 0.0);
    }

    #[test]
    fn effectiveness_defaults_to_neutral() {
        let service = service();
        assert!(service.effectiveness(Archetype::Engage, Archetype::Protect) == 0.8);
        assert!(service.effectiveness(Archetype::Split, Archetype::Pick) == 1.0);
    }

    #[test]
    fn contribution_is_normalized_projection() {
        let service = service();
        let contribution = service.contribution("Malphite", Archetype::Engage);
        assert!((contribution - 0.6).abs() < 1e-9);
        assert!(service.contribution("Zilean", Archetype::Engage) == 0.0);
    }

    #[test]
    fn versatility_rewards_spread() {
        let service = service();
        assert!(service.versatility("Malphite") > 0.0);
        assert!(service.versatility("Zilean") == 0.0);
    }
}
