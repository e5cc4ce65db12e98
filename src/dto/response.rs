use crate::Score;
use crate::draft::Action;
use crate::draft::ActionKind;
use crate::draft::Role;
use crate::draft::Side;
use crate::draft::State;
use crate::draft::Team;
use crate::engine::BanRecommendation;
use crate::engine::BanTier;
use crate::engine::PickFlag;
use crate::engine::PickRecommendation;
use crate::engine::Recommendations;
use crate::engine::RoleGrouped;
use crate::reranker::RerankerResult;
use crate::session::ReplayEvent;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct ApiPlayer {
    pub id: String,
    pub name: String,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct ApiTeam {
    pub id: String,
    pub name: String,
    pub side: Side,
    pub players: Vec<ApiPlayer>,
}

impl From<&Team> for ApiTeam {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            side: team.side,
            players: team
                .players
                .iter()
                .map(|p| ApiPlayer {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    role: p.role,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiAction {
    pub sequence: usize,
    pub action_type: ActionKind,
    pub team_side: Side,
    pub champion_name: String,
}

impl From<&Action> for ApiAction {
    fn from(action: &Action) -> Self {
        Self {
            sequence: action.sequence,
            action_type: action.kind,
            team_side: action.side,
            champion_name: action.champion.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiState {
    pub phase: String,
    pub next_team: Option<Side>,
    pub next_action: Option<ActionKind>,
    pub blue_bans: Vec<String>,
    pub red_bans: Vec<String>,
    pub blue_picks: Vec<String>,
    pub red_picks: Vec<String>,
    pub action_count: usize,
}

impl From<&State> for ApiState {
    fn from(state: &State) -> Self {
        Self {
            phase: state.phase.to_string(),
            next_team: state.next.map(|(side, _)| side),
            next_action: state.next.map(|(_, kind)| kind),
            blue_bans: state.bans(Side::Blue),
            red_bans: state.bans(Side::Red),
            blue_picks: state.picks(Side::Blue),
            red_picks: state.picks(Side::Red),
            action_count: state.action_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiPick {
    pub champion_name: String,
    pub score: Score,
    pub base_score: Score,
    pub synergy_multiplier: Score,
    pub confidence: Score,
    pub suggested_role: Role,
    pub flag: Option<PickFlag>,
    pub reasons: Vec<String>,
    pub components: BTreeMap<String, Score>,
    pub proficiency_player: Option<String>,
}

impl From<&PickRecommendation> for ApiPick {
    fn from(pick: &PickRecommendation) -> Self {
        Self {
            champion_name: pick.champion.clone(),
            score: pick.score,
            base_score: pick.base_score,
            synergy_multiplier: pick.synergy_multiplier,
            confidence: pick.confidence,
            suggested_role: pick.suggested_role,
            flag: pick.flag,
            reasons: pick.reasons.clone(),
            components: BTreeMap::from([
                ("meta".to_string(), pick.components.meta),
                ("proficiency".to_string(), pick.components.proficiency),
                ("matchup".to_string(), pick.components.matchup),
                ("counter".to_string(), pick.components.counter),
                ("synergy".to_string(), pick.components.synergy),
            ]),
            proficiency_player: pick.proficiency_player.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiBan {
    pub champion_name: String,
    pub priority: Score,
    pub target_player: Option<String>,
    pub target_role: Option<Role>,
    pub tier: Option<BanTier>,
    pub reasons: Vec<String>,
    pub components: BTreeMap<String, Score>,
}

impl From<&BanRecommendation> for ApiBan {
    fn from(ban: &BanRecommendation) -> Self {
        Self {
            champion_name: ban.champion.clone(),
            priority: ban.priority,
            target_player: ban.target_player.clone(),
            target_role: ban.target_role,
            tier: ban.tier,
            reasons: ban.reasons.clone(),
            components: ban.components.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiRecommendations {
    pub for_team: Side,
    pub for_action_count: usize,
    pub picks: Vec<ApiPick>,
    pub bans: Vec<ApiBan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_grouped: Option<BTreeMap<String, Vec<ApiPick>>>,
}

impl From<&Recommendations> for ApiRecommendations {
    fn from(recommendations: &Recommendations) -> Self {
        let role_grouped = match recommendations.picks.is_empty() {
            true => None,
            false => {
                let grouped = RoleGrouped::from_picks(&recommendations.picks, 2);
                Some(
                    grouped
                        .roles
                        .into_iter()
                        .map(|(role, picks)| {
                            (
                                role.to_string(),
                                picks.iter().map(ApiPick::from).collect(),
                            )
                        })
                        .collect(),
                )
            }
        };
        Self {
            for_team: recommendations.for_team,
            for_action_count: recommendations.for_action_count,
            picks: recommendations.picks.iter().map(ApiPick::from).collect(),
            bans: recommendations.bans.iter().map(ApiBan::from).collect(),
            role_grouped,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiAssignment {
    pub role: Role,
    pub champion: String,
}

/// replay stream frames, tagged the way the client switches on them
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ApiReplayFrame {
    #[serde(rename = "session_start")]
    Start {
        session_id: String,
        series_id: String,
        game_number: usize,
        blue_team: ApiTeam,
        red_team: ApiTeam,
        total_actions: usize,
        patch: String,
        series_score_before: BTreeMap<String, usize>,
        series_score_after: BTreeMap<String, usize>,
        winner_side: Option<Side>,
    },
    #[serde(rename = "draft_action")]
    Action {
        action: ApiAction,
        draft_state: ApiState,
        recommendations: Option<ApiRecommendations>,
        #[serde(skip_serializing_if = "Option::is_none")]
        insights: Option<RerankerResult>,
    },
    #[serde(rename = "draft_complete")]
    Complete {
        draft_state: ApiState,
        blue_comp: Vec<String>,
        red_comp: Vec<String>,
    },
    #[serde(rename = "error")]
    Error { message: String },
}

impl From<&ReplayEvent> for ApiReplayFrame {
    fn from(event: &ReplayEvent) -> Self {
        match event {
            ReplayEvent::Start {
                session_id,
                series_id,
                game_number,
                blue,
                red,
                total_actions,
                patch,
                score_before,
                score_after,
                winner_side,
            } => Self::Start {
                session_id: session_id.clone(),
                series_id: series_id.clone(),
                game_number: *game_number,
                blue_team: ApiTeam::from(blue),
                red_team: ApiTeam::from(red),
                total_actions: *total_actions,
                patch: patch.clone(),
                series_score_before: score_map(*score_before),
                series_score_after: score_map(*score_after),
                winner_side: *winner_side,
            },
            ReplayEvent::Action {
                action,
                state,
                recommendations,
                insights,
            } => Self::Action {
                action: ApiAction::from(action),
                draft_state: ApiState::from(state),
                recommendations: recommendations.as_ref().map(ApiRecommendations::from),
                insights: insights.clone(),
            },
            ReplayEvent::Complete { state } => Self::Complete {
                draft_state: ApiState::from(state),
                blue_comp: state.picks(Side::Blue),
                red_comp: state.picks(Side::Red),
            },
            ReplayEvent::Error { message } => Self::Error {
                message: message.clone(),
            },
        }
    }
}

fn score_map((blue, red): (usize, usize)) -> BTreeMap<String, usize> {
    BTreeMap::from([("blue".to_string(), blue), ("red".to_string(), red)])
}
