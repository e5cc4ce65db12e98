use crate::META_CANDIDATES_PER_ROLE;
use crate::PICK_WEIGHT_COUNTER;
use crate::PICK_WEIGHT_MATCHUP;
use crate::PICK_WEIGHT_META;
use crate::PICK_WEIGHT_PROFICIENCY;
use crate::POOL_CANDIDATES_PER_PLAYER;
use crate::Probability;
use crate::SYNERGY_MULTIPLIER_RANGE;
use crate::Score;
use crate::analysis::SynergyService;
use crate::draft::Confidence;
use crate::draft::Player;
use crate::draft::Role;
use crate::knowledge::Knowledge;
use crate::knowledge::TournamentTable;
use crate::scorers::FlexResolver;
use crate::scorers::MatchupCalculator;
use crate::scorers::MetaScorer;
use crate::scorers::ProficiencyScorer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PickFlag {
    #[serde(rename = "LOW_CONFIDENCE")]
    LowConfidence,
    #[serde(rename = "SURPRISE_PICK")]
    SurprisePick,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PickComponents {
    pub meta: Score,
    pub proficiency: Score,
    pub matchup: Score,
    pub counter: Score,
    pub synergy: Score,
}

#[derive(Debug, Clone, Serialize)]
pub struct PickRecommendation {
    pub champion: String,
    pub score: Score,
    pub base_score: Score,
    pub synergy_multiplier: Score,
    pub confidence: Score,
    pub suggested_role: Role,
    pub components: PickComponents,
    pub flag: Option<PickFlag>,
    pub reasons: Vec<String>,
    pub proficiency_player: Option<String>,
}

/// weighted multi-component pick scorer. each request builds a fresh
/// role cache over the candidate union so flex filtering stays consistent
/// with the filled roles of that request; nothing survives the call.
pub struct PickEngine {
    meta: MetaScorer,
    flex: FlexResolver,
    proficiency: ProficiencyScorer,
    matchups: MatchupCalculator,
    synergies: SynergyService,
}

impl PickEngine {
    pub fn new(knowledge: Arc<Knowledge>, tournament: Arc<TournamentTable>) -> Self {
        Self {
            meta: MetaScorer::from(knowledge.clone()),
            flex: FlexResolver::with_tournament(knowledge.clone(), tournament),
            proficiency: ProficiencyScorer::from(knowledge.clone()),
            matchups: MatchupCalculator::from(knowledge.clone()),
            synergies: SynergyService::from(knowledge),
        }
    }
}

impl From<Arc<Knowledge>> for PickEngine {
    fn from(knowledge: Arc<Knowledge>) -> Self {
        let tournament = knowledge.tournament.clone();
        Self::new(knowledge, tournament)
    }
}

// recommendation pipeline
impl PickEngine {
    pub fn recommend(
        &self,
        players: &[Player],
        our_picks: &[String],
        enemy_picks: &[String],
        banned: &[String],
        limit: usize,
    ) -> Vec<PickRecommendation> {
        let unavailable = banned
            .iter()
            .chain(our_picks)
            .chain(enemy_picks)
            .cloned()
            .collect::<BTreeSet<_>>();
        let filled = self.filled_roles(our_picks);
        if filled.len() == Role::all().len() {
            return Vec::new();
        }
        let unfilled = Role::all()
            .iter()
            .filter(|role| !filled.contains(role))
            .copied()
            .collect::<BTreeSet<_>>();

        let cache = self.role_cache(players, &unfilled, &filled, &unavailable, enemy_picks);
        let candidates = cache
            .iter()
            .filter(|(champion, _)| !unavailable.contains(*champion))
            .filter(|(_, probabilities)| !probabilities.is_empty())
            .map(|(champion, _)| champion.clone())
            .collect::<Vec<_>>();

        let mut recommendations = candidates
            .into_iter()
            .map(|champion| self.evaluate(&champion, players, our_picks, enemy_picks, &cache))
            .collect::<Vec<_>>();
        recommendations.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        recommendations.truncate(limit);
        recommendations
    }

    /// which roles our picks already occupy, by their most likely role
    pub fn filled_roles(&self, picks: &[String]) -> BTreeSet<Role> {
        picks
            .iter()
            .filter_map(|champion| argmax(&self.flex.probabilities(champion, &BTreeSet::new())))
            .collect()
    }

    /// request-scoped distributions over the candidate union. candidate
    /// entries are filtered against the filled roles; enemy picks keep
    /// their full distribution for lane-matchup attribution.
    fn role_cache(
        &self,
        players: &[Player],
        unfilled: &BTreeSet<Role>,
        filled: &BTreeSet<Role>,
        unavailable: &BTreeSet<String>,
        enemy_picks: &[String],
    ) -> BTreeMap<String, BTreeMap<Role, Probability>> {
        let mut union = BTreeSet::new();
        for player in players {
            for entry in self
                .proficiency
                .pool(&player.name, 1)
                .into_iter()
                .take(POOL_CANDIDATES_PER_PLAYER)
            {
                if !unavailable.contains(&entry.champion) {
                    union.insert(entry.champion);
                }
            }
        }
        for role in unfilled {
            for champion in self.meta.top_champions(Some(*role), META_CANDIDATES_PER_ROLE) {
                if !unavailable.contains(&champion) {
                    union.insert(champion);
                }
            }
        }
        let enemies = enemy_picks.iter().cloned().collect::<BTreeSet<_>>();
        union.extend(enemies.iter().cloned());
        union
            .into_iter()
            .map(|champion| {
                let restriction = match enemies.contains(&champion) {
                    true => BTreeSet::new(),
                    false => filled.clone(),
                };
                let probabilities = self.flex.probabilities(&champion, &restriction);
                (champion, probabilities)
            })
            .collect()
    }

    fn evaluate(
        &self,
        champion: &str,
        players: &[Player],
        our_picks: &[String],
        enemy_picks: &[String],
        cache: &BTreeMap<String, BTreeMap<Role, Probability>>,
    ) -> PickRecommendation {
        let suggested_role = cache
            .get(champion)
            .and_then(argmax)
            .unwrap_or(Role::Mid);

        let meta = self.meta.score(champion);

        let mut proficiency = 0.0;
        let mut confidence = Confidence::NoData;
        let mut best_player = None;
        for player in players {
            let (score, player_confidence) = self.proficiency.score(&player.name, champion);
            if score > proficiency {
                proficiency = score;
                confidence = player_confidence;
                best_player = Some(player.name.clone());
            }
        }

        let lane_scores = enemy_picks
            .iter()
            .filter(|enemy| {
                cache
                    .get(*enemy)
                    .and_then(|probabilities| probabilities.get(&suggested_role))
                    .copied()
                    .unwrap_or(0.0)
                    > 0.0
            })
            .map(|enemy| self.matchups.lane(champion, enemy, suggested_role).score)
            .collect::<Vec<_>>();
        let matchup = mean(&lane_scores).unwrap_or(0.5);

        let team_scores = enemy_picks
            .iter()
            .map(|enemy| self.matchups.team(champion, enemy).score)
            .collect::<Vec<_>>();
        let counter = mean(&team_scores).unwrap_or(0.5);

        let mut with_candidate = our_picks.to_vec();
        with_candidate.push(champion.to_string());
        let synergy = self.synergies.team(&with_candidate).total;
        let synergy_multiplier = 1.0 + (synergy - 0.5) * SYNERGY_MULTIPLIER_RANGE;

        let base_score = meta * PICK_WEIGHT_META
            + proficiency * PICK_WEIGHT_PROFICIENCY
            + matchup * PICK_WEIGHT_MATCHUP
            + counter * PICK_WEIGHT_COUNTER;
        let score = base_score * synergy_multiplier;
        let overall_confidence = (1.0 + confidence.value()) / 2.0;

        let components = PickComponents {
            meta: crate::round3(meta),
            proficiency: crate::round3(proficiency),
            matchup: crate::round3(matchup),
            counter: crate::round3(counter),
            synergy: crate::round3(synergy),
        };
        let flag = self.flag(overall_confidence, &components);
        let reasons = self.reasons(champion, &components, synergy_multiplier);

        PickRecommendation {
            champion: champion.to_string(),
            score: crate::round3(score),
            base_score: crate::round3(base_score),
            synergy_multiplier: crate::round3(synergy_multiplier),
            confidence: crate::round3(overall_confidence),
            suggested_role,
            components,
            flag,
            reasons,
            proficiency_player: best_player,
        }
    }

    fn flag(&self, confidence: Score, components: &PickComponents) -> Option<PickFlag> {
        if confidence < 0.7 {
            return Some(PickFlag::LowConfidence);
        }
        if components.meta < 0.4 && components.proficiency >= 0.7 {
            return Some(PickFlag::SurprisePick);
        }
        None
    }

    fn reasons(
        &self,
        champion: &str,
        components: &PickComponents,
        synergy_multiplier: Score,
    ) -> Vec<String> {
        let mut reasons = Vec::new();
        if components.meta >= 0.7 {
            let tier = self
                .meta
                .tier(champion)
                .map(|t| t.to_string())
                .unwrap_or_else(|| "High".to_string());
            reasons.push(format!("{}-tier meta pick", tier));
        }
        if components.proficiency >= 0.7 {
            reasons.push("Strong team proficiency".to_string());
        }
        if components.matchup >= 0.55 {
            reasons.push("Favorable lane matchups".to_string());
        }
        if synergy_multiplier >= 1.10 {
            reasons.push("Strong team synergy".to_string());
        }
        if reasons.is_empty() {
            reasons.push("Solid overall pick".to_string());
        }
        reasons
    }
}

fn mean(scores: &[Score]) -> Option<Score> {
    match scores.len() {
        0 => None,
        n => Some(scores.iter().sum::<Score>() / n as Score),
    }
}

fn argmax(probabilities: &BTreeMap<Role, Probability>) -> Option<Role> {
    probabilities
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(role, _)| *role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::FlexEntry;
    use crate::knowledge::MetaEntry;
    use crate::knowledge::ProficiencyEntry;
    use crate::knowledge::RoleHistory;
    use crate::knowledge::Tier;
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

    fn single_role(role: Role) -> RoleHistory {
        RoleHistory {
            canonical: Some(role),
            ..RoleHistory::default()
        }
    }

    fn knowledge() -> Arc<Knowledge> {
        let mut knowledge = Knowledge::load(Path::new("/nonexistent"));
        for (champion, role, score) in [
            ("Rumble", Role::Top, 0.8),
            ("Sejuani", Role::Jungle, 0.75),
            ("Orianna", Role::Mid, 0.9),
            ("Yunara", Role::Bot, 0.85),
            ("Kalista", Role::Bot, 0.7),
            ("Rell", Role::Support, 0.72),
            ("Azir", Role::Mid, 0.88),
        ] {
            knowledge.history.insert(champion.to_string(), single_role(role));
            knowledge.meta.insert(
                champion.to_string(),
                MetaEntry {
                    score: Some(score),
                    tier: Some(Tier::S),
                    presence: 0.5,
                    ..MetaEntry::default()
                },
            );
        }
        knowledge.flex.insert(
            "Rumble".to_string(),
            FlexEntry {
                is_flex: true,
                probabilities: [(Role::Top, 0.7), (Role::Mid, 0.3)].into_iter().collect(),
            },
        );
        knowledge.proficiencies.insert(
            "Kiin".to_string(),
            [("Rumble".to_string(), entry(10.0, 0.7))].into_iter().collect(),
        );
        knowledge.proficiencies.insert(
            "Chovy".to_string(),
            [("Azir".to_string(), entry(14.0, 0.75))].into_iter().collect(),
        );
        Arc::new(knowledge)
    }

    fn players() -> Vec<Player> {
        vec![
            Player::new("p1", "Kiin", Some(Role::Top)),
            Player::new("p2", "Canyon", Some(Role::Jungle)),
            Player::new("p3", "Chovy", Some(Role::Mid)),
            Player::new("p4", "Ruler", Some(Role::Bot)),
            Player::new("p5", "Duro", Some(Role::Support)),
        ]
    }

    #[test]
    fn excludes_unavailable_and_sorts_descending() {
        let engine = PickEngine::from(knowledge());
        let our = vec!["Orianna".to_string()];
        let enemy = vec!["Yunara".to_string()];
        let banned = vec!["Azir".to_string()];
        let picks = engine.recommend(&players(), &our, &enemy, &banned, 5);
        assert!(picks.len() <= 5);
        assert!(!picks.is_empty());
        for pair in picks.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for pick in &picks {
            assert!(pick.champion != "Orianna");
            assert!(pick.champion != "Yunara");
            assert!(pick.champion != "Azir");
            assert!(pick.suggested_role != Role::Mid);
        }
    }

    #[test]
    fn empty_boards_still_rank_by_meta_and_proficiency() {
        let engine = PickEngine::from(knowledge());
        let picks = engine.recommend(&players(), &[], &[], &[], 5);
        assert!(!picks.is_empty());
        for pick in &picks {
            assert!(pick.components.matchup == 0.5);
            assert!(pick.components.counter == 0.5);
        }
    }

    #[test]
    fn full_team_returns_nothing() {
        let engine = PickEngine::from(knowledge());
        let our = vec![
            "Rumble".to_string(),
            "Sejuani".to_string(),
            "Orianna".to_string(),
            "Kalista".to_string(),
            "Rell".to_string(),
        ];
        let picks = engine.recommend(&players(), &our, &[], &[], 5);
        assert!(picks.is_empty());
    }

    #[test]
    fn base_score_uses_unit_weights() {
        let engine = PickEngine::from(knowledge());
        let picks = engine.recommend(&players(), &[], &[], &[], 1);
        let top = &picks[0];
        let expected = top.components.meta * PICK_WEIGHT_META
            + top.components.proficiency * PICK_WEIGHT_PROFICIENCY
            + top.components.matchup * PICK_WEIGHT_MATCHUP
            + top.components.counter * PICK_WEIGHT_COUNTER;
        assert!((top.base_score - crate::round3(expected)).abs() < 2e-3);
        assert!(top.synergy_multiplier >= 1.0 - 0.15);
        assert!(top.synergy_multiplier <= 1.0 + 0.15);
    }

    #[test]
    fn proficiency_comes_from_best_player() {
        let engine = PickEngine::from(knowledge());
        let picks = engine.recommend(&players(), &[], &[], &[], 10);
        let rumble = picks.iter().find(|p| p.champion == "Rumble").unwrap();
        assert!(rumble.proficiency_player == Some("Kiin".to_string()));
        assert!(rumble.components.proficiency > 0.7);
    }
}
