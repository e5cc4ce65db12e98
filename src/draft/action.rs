use super::kind::ActionKind;
use super::side::Side;
use serde::Deserialize;
use serde::Serialize;

/// one immutable ban or pick. sequence is 1-based within the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub sequence: usize,
    #[serde(rename = "action_type")]
    pub kind: ActionKind,
    #[serde(rename = "team_side")]
    pub side: Side,
    #[serde(rename = "champion_name")]
    pub champion: String,
}

impl Action {
    pub fn new(sequence: usize, kind: ActionKind, side: Side, champion: &str) -> Self {
        Self {
            sequence,
            kind,
            side,
            champion: champion.to_string(),
        }
    }
}
