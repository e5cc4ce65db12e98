use crate::draft::Action;
use crate::draft::Side;
use crate::draft::State;
use crate::draft::Team;
use crate::engine::Recommendations;
use crate::reranker::RerankerResult;

/// everything a replay session emits to its driver, in order.
/// the recommendations riding with an action are the ones generated for
/// the state before that action was taken.
#[derive(Debug)]
pub enum ReplayEvent {
    Start {
        session_id: String,
        series_id: String,
        game_number: usize,
        blue: Team,
        red: Team,
        total_actions: usize,
        patch: String,
        score_before: (usize, usize),
        score_after: (usize, usize),
        winner_side: Option<Side>,
    },
    Action {
        action: Action,
        state: State,
        recommendations: Option<Recommendations>,
        insights: Option<RerankerResult>,
    },
    Complete {
        state: State,
    },
    Error {
        message: String,
    },
}
