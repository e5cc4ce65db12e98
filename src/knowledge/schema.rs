use serde::Deserialize;
use std::collections::BTreeMap;

/// raw serde shapes of the knowledge files, exactly as they sit on disk.
/// role keys arrive in data-file spelling (TOP, JNG, ADC, SUP, ...) and are
/// normalized when the store converts these into typed tables.

#[derive(Debug, Default, Deserialize)]
pub struct RawFlexFile {
    #[serde(default)]
    pub flex_picks: BTreeMap<String, RawFlexEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawFlexEntry {
    #[serde(default)]
    pub is_flex: bool,
    #[serde(flatten)]
    pub roles: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawHistoryFile {
    #[serde(default)]
    pub champions: BTreeMap<String, RawHistoryEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawHistoryEntry {
    #[serde(default)]
    pub canonical_role: Option<String>,
    #[serde(default)]
    pub pro_play_primary_role: Option<String>,
    #[serde(default)]
    pub canonical_all: Vec<String>,
    #[serde(default)]
    pub current_viable_roles: Vec<String>,
    #[serde(default)]
    pub current_distribution: BTreeMap<String, f64>,
    #[serde(default)]
    pub all_time_distribution: BTreeMap<String, f64>,
    #[serde(default)]
    pub pro_play_presence: f64,
    #[serde(default)]
    pub pro_play_win_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMatchupFile {
    #[serde(default)]
    pub counters: BTreeMap<String, RawMatchupEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMatchupEntry {
    #[serde(default)]
    pub vs_lane: BTreeMap<String, BTreeMap<String, RawMatchupRow>>,
    #[serde(default)]
    pub vs_team: BTreeMap<String, RawMatchupRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMatchupRow {
    #[serde(default = "neutral")]
    pub win_rate: f64,
    #[serde(default)]
    pub games: usize,
    #[serde(default)]
    pub confidence: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMetaFile {
    #[serde(default)]
    pub champions: BTreeMap<String, RawMetaEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetaEntry {
    #[serde(default)]
    pub meta_score: Option<f64>,
    #[serde(default)]
    pub meta_tier: Option<String>,
    #[serde(default)]
    pub presence: f64,
    #[serde(default)]
    pub pick_context: Option<RawPickContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPickContext {
    #[serde(default)]
    pub is_counter_pick_dependent: bool,
    #[serde(default)]
    pub blind_early_win_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTournamentFile {
    #[serde(default)]
    pub champions: BTreeMap<String, RawTournamentEntry>,
    #[serde(default)]
    pub defaults: RawTournamentDefaults,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTournamentEntry {
    #[serde(default)]
    pub priority: f64,
    #[serde(default)]
    pub roles: BTreeMap<String, RawTournamentRole>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTournamentRole {
    #[serde(default)]
    pub picks: usize,
    #[serde(default = "neutral")]
    pub winrate: f64,
    #[serde(default)]
    pub adjusted_performance: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RawTournamentDefaults {
    #[serde(default = "missing_priority")]
    pub missing_champion_priority: f64,
    #[serde(default = "missing_performance")]
    pub missing_champion_performance: f64,
}

impl Default for RawTournamentDefaults {
    fn default() -> Self {
        Self {
            missing_champion_priority: missing_priority(),
            missing_champion_performance: missing_performance(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawProficiencyFile {
    #[serde(default)]
    pub proficiencies: BTreeMap<String, BTreeMap<String, RawProficiencyEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProficiencyEntry {
    #[serde(default)]
    pub games_raw: Option<f64>,
    #[serde(default)]
    pub games_weighted: Option<f64>,
    #[serde(default)]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub win_rate_weighted: Option<f64>,
    #[serde(default)]
    pub confidence: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPlayerRolesFile {
    #[serde(default)]
    pub players: BTreeMap<String, RawPlayerRole>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPlayerRole {
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSynergy {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub champions: Vec<String>,
    #[serde(default)]
    pub strength: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comp_archetypes: Vec<String>,
    #[serde(default)]
    pub countered_by: Vec<String>,
    #[serde(default)]
    pub partner_requirement: bool,
    #[serde(default)]
    pub best_partners: Vec<RawPartner>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPartner {
    #[serde(default)]
    pub champion: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawStatSynergyFile {
    #[serde(default)]
    pub synergies: BTreeMap<String, BTreeMap<String, RawStatSynergy>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatSynergy {
    #[serde(default = "neutral")]
    pub synergy_score: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawArchetypeFile {
    #[serde(default)]
    pub champion_archetypes: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub effectiveness_matrix: BTreeMap<String, BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPhaseRates {
    #[serde(default)]
    pub early_p1: Option<f64>,
    #[serde(default)]
    pub late_p1: Option<f64>,
    #[serde(default)]
    pub p2: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTransferFile {
    #[serde(default)]
    pub transfers: BTreeMap<String, Vec<RawTransfer>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransfer {
    #[serde(default)]
    pub champion: String,
    #[serde(default)]
    pub co_play_rate: f64,
}

fn neutral() -> f64 {
    0.5
}
fn missing_priority() -> f64 {
    0.05
}
fn missing_performance() -> f64 {
    0.35
}
