use super::archetype::Archetype;
use super::archetype::ArchetypeService;
use super::synergy::SynergyService;
use crate::Score;
use crate::knowledge::Knowledge;
use crate::scorers::MetaScorer;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct ChampionMeta {
    pub champion: String,
    pub meta_score: Score,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamEvaluation {
    pub composition_score: Score,
    pub synergy_score: Score,
    pub meta_strength: Score,
    pub archetype: Option<Archetype>,
    pub champion_meta: Vec<ChampionMeta>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Versus {
    pub ours: TeamEvaluation,
    pub theirs: TeamEvaluation,
    pub matchup_advantage: Score,
    pub matchup_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftEvaluation {
    pub picks: Vec<String>,
    pub archetype: Option<Archetype>,
    pub composition_score: Score,
    pub synergy_score: Score,
    pub meta_strength: Score,
    pub vs_enemy_advantage: Score,
    pub vs_enemy_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityComparison {
    pub score_delta: Score,
    pub advantage_delta: Score,
    pub archetype_insight: String,
    pub picks_matched: usize,
    pub picks_tracked: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub actual: DraftEvaluation,
    pub recommended: DraftEvaluation,
    pub comparison: QualityComparison,
}

/// post-game comparison of the draft a team actually played against the
/// draft the engine was recommending slot by slot. descriptive only.
pub struct QualityAnalyzer {
    archetypes: ArchetypeService,
    synergies: SynergyService,
    meta: MetaScorer,
}

impl From<Arc<Knowledge>> for QualityAnalyzer {
    fn from(knowledge: Arc<Knowledge>) -> Self {
        Self {
            archetypes: ArchetypeService::from(knowledge.clone()),
            synergies: SynergyService::from(knowledge.clone()),
            meta: MetaScorer::from(knowledge),
        }
    }
}

// team scoring
impl QualityAnalyzer {
    pub fn evaluate(&self, picks: &[String]) -> TeamEvaluation {
        let synergy = self.synergies.team(picks).total;
        let team = self.archetypes.team(picks);
        let champion_meta = picks
            .iter()
            .map(|c| ChampionMeta {
                champion: c.clone(),
                meta_score: crate::round3(self.meta.score(c)),
            })
            .collect::<Vec<_>>();
        let meta_strength = match champion_meta.len() {
            0 => 0.5,
            n => champion_meta.iter().map(|c| c.meta_score).sum::<Score>() / n as Score,
        };
        TeamEvaluation {
            composition_score: crate::round3(
                0.4 * synergy + 0.3 * team.alignment + 0.3 * meta_strength,
            ),
            synergy_score: synergy,
            meta_strength: crate::round3(meta_strength),
            archetype: team.primary,
            champion_meta,
        }
    }

    pub fn versus(&self, our_picks: &[String], enemy_picks: &[String]) -> Versus {
        let advantage = self.archetypes.advantage(our_picks, enemy_picks);
        Versus {
            ours: self.evaluate(our_picks),
            theirs: self.evaluate(enemy_picks),
            matchup_advantage: advantage.advantage,
            matchup_description: advantage.description,
        }
    }
}

// actual-versus-recommended comparison
impl QualityAnalyzer {
    pub fn analyze(
        &self,
        actual_picks: &[String],
        recommended_picks: &[Vec<String>],
        enemy_picks: &[String],
    ) -> QualityReport {
        let ideal = recommended_picks
            .iter()
            .filter_map(|slot| slot.first().cloned())
            .collect::<Vec<_>>();

        let actual = self.versus(actual_picks, enemy_picks);
        let recommended = self.versus(&ideal, enemy_picks);
        let enemy_archetype = self.archetypes.team(enemy_picks).primary;

        let picks_matched = actual_picks
            .iter()
            .zip(recommended_picks.iter())
            .filter(|(pick, slot)| slot.contains(pick))
            .count();

        QualityReport {
            comparison: QualityComparison {
                score_delta: crate::round3(
                    recommended.ours.composition_score - actual.ours.composition_score,
                ),
                advantage_delta: crate::round3(
                    recommended.matchup_advantage - actual.matchup_advantage,
                ),
                archetype_insight: self.insight(actual.ours.archetype, enemy_archetype),
                picks_matched,
                picks_tracked: recommended_picks.len(),
            },
            actual: DraftEvaluation {
                picks: actual_picks.to_vec(),
                archetype: actual.ours.archetype,
                composition_score: actual.ours.composition_score,
                synergy_score: actual.ours.synergy_score,
                meta_strength: actual.ours.meta_strength,
                vs_enemy_advantage: actual.matchup_advantage,
                vs_enemy_description: actual.matchup_description,
            },
            recommended: DraftEvaluation {
                picks: ideal,
                archetype: recommended.ours.archetype,
                composition_score: recommended.ours.composition_score,
                synergy_score: recommended.ours.synergy_score,
                meta_strength: recommended.ours.meta_strength,
                vs_enemy_advantage: recommended.matchup_advantage,
                vs_enemy_description: recommended.matchup_description,
            },
        }
    }

    fn insight(&self, actual: Option<Archetype>, enemy: Option<Archetype>) -> String {
        let (Some(actual), Some(enemy)) = (actual, enemy) else {
            return "Insufficient data for archetype analysis".to_string();
        };
        if actual == enemy {
            return format!("Mirror {} matchup", actual);
        }
        let effectiveness = self.archetypes.effectiveness(actual, enemy);
        if effectiveness > 1.1 {
            format!("{} favored vs {}", capitalize(actual.as_str()), enemy)
        } else if effectiveness < 0.9 {
            format!("{} favored vs {}", capitalize(enemy.as_str()), actual)
        } else {
            format!("{} vs {} (neutral)", capitalize(actual.as_str()), enemy)
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn analyzer() -> QualityAnalyzer {
        let mut knowledge = Knowledge::load(Path::new("/nonexistent"));
        knowledge.archetypes.insert(
            "Malphite".to_string(),
            [(Archetype::Engage, 0.9)].into_iter().collect(),
        );
        knowledge.archetypes.insert(
            "Janna".to_string(),
            [(Archetype::Protect, 0.9)].into_iter().collect(),
        );
        knowledge
            .effectiveness
            .insert((Archetype::Engage, Archetype::Protect), 0.8);
        knowledge
            .effectiveness
            .insert((Archetype::Protect, Archetype::Engage), 1.2);
        QualityAnalyzer::from(Arc::new(knowledge))
    }

    #[test]
    fn picks_matched_counts_slot_hits() {
        let analyzer = analyzer();
        let actual = vec!["Malphite".to_string(), "Janna".to_string()];
        let recommended = vec![
            vec!["Malphite".to_string(), "Ornn".to_string()],
            vec!["Rell".to_string()],
        ];
        let report = analyzer.analyze(&actual, &recommended, &[]);
        assert!(report.comparison.picks_matched == 1);
        assert!(report.comparison.picks_tracked == 2);
    }

    #[test]
    fn insight_describes_counter() {
        let analyzer = analyzer();
        let report = analyzer.analyze(
            &["Malphite".to_string()],
            &[vec!["Malphite".to_string()]],
            &["Janna".to_string()],
        );
        assert!(report.comparison.archetype_insight.contains("favored"));
    }

    #[test]
    fn empty_teams_are_neutral() {
        let analyzer = analyzer();
        let versus = analyzer.versus(&[], &[]);
        assert!(versus.matchup_advantage == 1.0);
        assert!(versus.ours.meta_strength == 0.5);
    }
}
