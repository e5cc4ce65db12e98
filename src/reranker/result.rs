use crate::Score;
use crate::draft::Phase;
use crate::draft::Role;
use crate::engine::BanRecommendation;
use crate::engine::PickRecommendation;
use crate::session::DraftMode;
use serde::Serialize;
use std::collections::BTreeMap;

/// a pipeline candidate as the reranker sees it, pick or ban alike
#[derive(Debug, Clone)]
pub struct Candidate {
    pub champion: String,
    pub score: Score,
    pub role: Option<Role>,
    pub target_player: Option<String>,
    pub proficiency_player: Option<String>,
    pub components: BTreeMap<String, Score>,
    pub reasons: Vec<String>,
}

impl From<&PickRecommendation> for Candidate {
    fn from(pick: &PickRecommendation) -> Self {
        Self {
            champion: pick.champion.clone(),
            score: pick.score,
            role: Some(pick.suggested_role),
            target_player: None,
            proficiency_player: pick.proficiency_player.clone(),
            components: BTreeMap::from([
                ("meta".to_string(), pick.components.meta),
                ("proficiency".to_string(), pick.components.proficiency),
                ("matchup".to_string(), pick.components.matchup),
                ("counter".to_string(), pick.components.counter),
                ("synergy".to_string(), pick.components.synergy),
            ]),
            reasons: pick.reasons.clone(),
        }
    }
}

impl From<&BanRecommendation> for Candidate {
    fn from(ban: &BanRecommendation) -> Self {
        Self {
            champion: ban.champion.clone(),
            score: ban.priority,
            role: ban.target_role,
            target_player: ban.target_player.clone(),
            proficiency_player: None,
            components: ban.components.clone(),
            reasons: ban.reasons.clone(),
        }
    }
}

/// the draft situation shipped to the model
#[derive(Debug, Clone)]
pub struct DraftContext {
    pub phase: Phase,
    pub patch: String,
    pub our_team: String,
    pub enemy_team: String,
    pub our_picks: Vec<String>,
    pub enemy_picks: Vec<String>,
    pub banned: Vec<String>,
    pub mode: DraftMode,
    pub fearless_blocked: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RerankedRecommendation {
    pub champion: String,
    pub original_rank: usize,
    pub new_rank: usize,
    pub original_score: Score,
    pub confidence: Score,
    pub reasoning: String,
    pub strategic_factors: Vec<String>,
}

/// a champion the model volunteered beyond the candidate list
#[derive(Debug, Clone, Serialize)]
pub struct AdditionalSuggestion {
    pub champion: String,
    pub reasoning: String,
    pub confidence: Score,
    pub role: String,
    pub for_player: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RerankerResult {
    pub reranked: Vec<RerankedRecommendation>,
    pub additional_suggestions: Vec<AdditionalSuggestion>,
    pub draft_analysis: String,
}
