use crate::draft::Side;
use crate::session::DraftMode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StartReplay {
    pub series_id: String,
    pub game_number: i32,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_delay")]
    pub delay_seconds: f64,
    #[serde(default)]
    pub llm_enabled: bool,
    #[serde(default)]
    pub llm_api_key: Option<String>,
    #[serde(default)]
    pub wait_for_llm: bool,
    #[serde(default = "default_llm_timeout")]
    pub llm_timeout: f64,
}

#[derive(Debug, Deserialize)]
pub struct StartSimulator {
    pub blue_team_id: String,
    pub red_team_id: String,
    pub coaching_side: Side,
    #[serde(default = "default_series_length")]
    pub series_length: usize,
    #[serde(default = "default_draft_mode")]
    pub draft_mode: DraftMode,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAction {
    pub champion: String,
}

#[derive(Debug, Deserialize)]
pub struct CompleteGame {
    pub winner: Side,
}

#[derive(Debug, Deserialize)]
pub struct Insights {
    pub api_key: String,
    pub action_count: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActionOptions {
    #[serde(default)]
    pub include_recommendations: bool,
    #[serde(default)]
    pub include_evaluation: bool,
}

#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_speed() -> f64 {
    1.0
}
fn default_delay() -> f64 {
    3.0
}
fn default_llm_timeout() -> f64 {
    30.0
}
fn default_series_length() -> usize {
    1
}
fn default_draft_mode() -> DraftMode {
    DraftMode::Normal
}
fn default_limit() -> i64 {
    50
}

impl<'de> Deserialize<'de> for DraftMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DraftMode::try_from(s.as_str()).map_err(serde::de::Error::custom)
    }
}
