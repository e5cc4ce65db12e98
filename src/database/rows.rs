use crate::draft::Side;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SeriesRow {
    pub id: String,
    pub match_date: String,
    pub format: String,
    pub blue_team_id: String,
    pub blue_team_name: String,
    pub red_team_id: String,
    pub red_team_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameRow {
    pub id: String,
    pub game_number: usize,
    pub patch_version: Option<String>,
    pub winner_team_id: Option<String>,
    pub duration_seconds: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameInfo {
    pub game_id: String,
    pub series_id: String,
    pub game_number: usize,
    pub patch_version: Option<String>,
    pub winner_team_id: Option<String>,
    pub match_date: String,
    pub blue_team_id: String,
    pub red_team_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamRow {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamGame {
    pub game_id: String,
    pub series_id: String,
    pub game_number: usize,
    pub match_date: String,
    pub side: Side,
    pub opponent_team_id: String,
    pub opponent_team_name: String,
    pub winner_team_id: Option<String>,
}
