use super::schema::*;
use crate::Probability;
use crate::Score;
use crate::analysis::Archetype;
use crate::analysis::Grade;
use crate::draft::Confidence;
use crate::draft::Role;
use crate::draft::normalize;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// champions whose current viability is read from distributions rather than
/// an explicit viable-role list are admitted at this share of games
pub const CURRENT_ROLE_THRESHOLD: Probability = 0.10;

/// S through D meta tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
    pub const fn is_premier(&self) -> bool {
        matches!(self, Self::S | Self::A)
    }
}

impl TryFrom<&str> for Tier {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_uppercase().as_str() {
            "S" => Ok(Self::S),
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            other => Err(anyhow::anyhow!("unknown tier: {}", other)),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlexEntry {
    pub probabilities: BTreeMap<Role, Probability>,
    pub is_flex: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RoleHistory {
    pub canonical: Option<Role>,
    pub all: Vec<Role>,
    pub current_viable: Vec<Role>,
    pub current_distribution: BTreeMap<Role, Probability>,
    pub all_time: BTreeMap<Role, Probability>,
    pub presence: f64,
    pub win_rate: Option<f64>,
}

impl RoleHistory {
    /// best single-role guess for a champion.
    /// a lone current viable role wins, then the strongest current
    /// distribution entry, then the canonical role.
    pub fn primary(&self) -> Option<Role> {
        if self.current_viable.len() == 1 {
            return Some(self.current_viable[0]);
        }
        self.current_distribution
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(role, _)| *role)
            .or(self.canonical)
    }

    /// the set of roles the champion currently plays, when current data
    /// exists at all. None means only all-time data is available.
    pub fn current_roles(&self) -> Option<BTreeSet<Role>> {
        if !self.current_viable.is_empty() {
            return Some(self.current_viable.iter().copied().collect());
        }
        if !self.current_distribution.is_empty() {
            return Some(
                self.current_distribution
                    .iter()
                    .filter(|(_, p)| **p >= CURRENT_ROLE_THRESHOLD)
                    .map(|(role, _)| *role)
                    .collect(),
            );
        }
        None
    }

    /// every role the champion is known to play, current data first,
    /// all-time distribution at >= 10% as the fallback
    pub fn viable_roles(&self) -> BTreeSet<Role> {
        if let Some(current) = self.current_roles() {
            if !current.is_empty() {
                return current;
            }
        }
        if !self.all.is_empty() {
            return self.all.iter().copied().collect();
        }
        let mut roles = self
            .all_time
            .iter()
            .filter(|(_, p)| **p >= CURRENT_ROLE_THRESHOLD)
            .map(|(role, _)| *role)
            .collect::<BTreeSet<_>>();
        if roles.is_empty() {
            roles.extend(self.primary());
        }
        roles
    }
}

#[derive(Debug, Clone)]
pub struct MatchupRow {
    pub win_rate: Score,
    pub games: usize,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Default)]
pub struct Matchups {
    pub lane: BTreeMap<Role, BTreeMap<String, MatchupRow>>,
    pub team: BTreeMap<String, MatchupRow>,
}

#[derive(Debug, Clone, Default)]
pub struct MetaEntry {
    pub score: Option<Score>,
    pub tier: Option<Tier>,
    pub presence: Score,
    pub counter_dependent: bool,
    pub blind_early_win_rate: Option<Score>,
}

#[derive(Debug, Clone, Default)]
pub struct TournamentRole {
    pub picks: usize,
    pub winrate: Score,
    pub adjusted: Option<Score>,
}

#[derive(Debug, Clone, Default)]
pub struct TournamentEntry {
    pub priority: Score,
    pub roles: BTreeMap<Role, TournamentRole>,
}

#[derive(Debug, Clone)]
pub struct TournamentTable {
    pub champions: BTreeMap<String, TournamentEntry>,
    pub missing_priority: Score,
    pub missing_performance: Score,
}

impl Default for TournamentTable {
    fn default() -> Self {
        Self::from(RawTournamentFile::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProficiencyEntry {
    pub games_raw: f64,
    pub games_weighted: f64,
    pub win_rate: f64,
    pub win_rate_weighted: f64,
    pub confidence: Option<Confidence>,
}

impl ProficiencyEntry {
    pub fn games(&self) -> f64 {
        if self.games_raw > 0.0 {
            self.games_raw
        } else {
            self.games_weighted
        }
    }
    pub fn rate(&self) -> f64 {
        if self.win_rate_weighted > 0.0 {
            self.win_rate_weighted
        } else {
            self.win_rate
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PhaseRates {
    pub early_p1: Option<Probability>,
    pub late_p1: Option<Probability>,
    pub p2: Option<Probability>,
}

#[derive(Debug, Clone)]
pub struct Transfer {
    pub champion: String,
    pub co_play_rate: f64,
}

#[derive(Debug, Clone)]
pub struct CuratedSynergy {
    pub id: String,
    pub champions: Vec<String>,
    pub strength: Grade,
    pub description: String,
    pub comp_archetypes: Vec<String>,
    pub countered_by: Vec<String>,
}

/// process-wide lookup tables, loaded once at startup and immutable after.
/// missing files degrade to empty tables; every scorer has a default for
/// the champions those tables then fail to mention.
#[derive(Debug, Default)]
pub struct Knowledge {
    dir: PathBuf,
    pub flex: BTreeMap<String, FlexEntry>,
    pub history: BTreeMap<String, RoleHistory>,
    pub matchups: BTreeMap<String, Matchups>,
    pub meta: BTreeMap<String, MetaEntry>,
    pub tournament: Arc<TournamentTable>,
    pub proficiencies: BTreeMap<String, BTreeMap<String, ProficiencyEntry>>,
    pub player_roles: BTreeMap<String, Role>,
    pub curated_synergies: Vec<CuratedSynergy>,
    pub synergy_pairs: BTreeMap<(String, String), Grade>,
    pub stat_synergies: BTreeMap<String, BTreeMap<String, Score>>,
    pub archetypes: BTreeMap<String, BTreeMap<Archetype, Score>>,
    pub effectiveness: BTreeMap<(Archetype, Archetype), Score>,
    pub role_phase: BTreeMap<Role, PhaseRates>,
    pub transfers: BTreeMap<String, Vec<Transfer>>,
}

// loading
impl Knowledge {
    pub fn load(dir: &Path) -> Self {
        let flex_file = read::<RawFlexFile>(&dir.join("flex_champions.json"));
        let history_file = read::<RawHistoryFile>(&dir.join("champion_role_history.json"));
        let matchup_file = read::<RawMatchupFile>(&dir.join("matchup_stats.json"));
        let meta_file = read::<RawMetaFile>(&dir.join("meta_stats.json"));
        let tournament_file = read::<RawTournamentFile>(&dir.join("tournament_meta.json"));
        let proficiency_file = read::<RawProficiencyFile>(&dir.join("player_proficiency.json"));
        let roles_file = read::<RawPlayerRolesFile>(&dir.join("player_roles.json"));
        let synergy_file = read::<Vec<RawSynergy>>(&dir.join("synergies.json"));
        let stat_file = read::<RawStatSynergyFile>(&dir.join("champion_synergies.json"));
        let archetype_file = read::<RawArchetypeFile>(&dir.join("archetype_counters.json"));
        let phase_file = read::<BTreeMap<String, RawPhaseRates>>(&dir.join("role_pick_phase.json"));
        let transfer_file = read::<RawTransferFile>(&dir.join("skill_transfer.json"));

        let (curated, pairs) = convert_synergies(synergy_file);
        Self {
            dir: dir.to_path_buf(),
            flex: flex_file
                .flex_picks
                .into_iter()
                .map(|(champion, raw)| (champion, FlexEntry::from(raw)))
                .collect(),
            history: history_file
                .champions
                .into_iter()
                .map(|(champion, raw)| (champion, RoleHistory::from(raw)))
                .collect(),
            matchups: matchup_file
                .counters
                .into_iter()
                .map(|(champion, raw)| (champion, Matchups::from(raw)))
                .collect(),
            meta: meta_file
                .champions
                .into_iter()
                .map(|(champion, raw)| (champion, MetaEntry::from(raw)))
                .collect(),
            tournament: Arc::new(TournamentTable::from(tournament_file)),
            proficiencies: proficiency_file
                .proficiencies
                .into_iter()
                .map(|(player, pool)| {
                    (
                        player,
                        pool.into_iter()
                            .map(|(champion, raw)| (champion, ProficiencyEntry::from(raw)))
                            .collect(),
                    )
                })
                .collect(),
            player_roles: roles_file
                .players
                .into_iter()
                .filter_map(|(name, raw)| {
                    raw.role
                        .as_deref()
                        .and_then(normalize)
                        .map(|role| (name.trim().to_lowercase(), role))
                })
                .collect(),
            curated_synergies: curated,
            synergy_pairs: pairs,
            stat_synergies: stat_file
                .synergies
                .into_iter()
                .map(|(a, row)| {
                    (
                        a,
                        row.into_iter().map(|(b, raw)| (b, raw.synergy_score)).collect(),
                    )
                })
                .collect(),
            archetypes: archetype_file
                .champion_archetypes
                .into_iter()
                .map(|(champion, raw)| {
                    (
                        champion,
                        raw.into_iter()
                            .filter_map(|(tag, score)| {
                                Archetype::try_from(tag.as_str()).ok().map(|a| (a, score))
                            })
                            .collect(),
                    )
                })
                .collect(),
            effectiveness: archetype_file
                .effectiveness_matrix
                .into_iter()
                .filter_map(|(ours, row)| Archetype::try_from(ours.as_str()).ok().map(|o| (o, row)))
                .flat_map(|(ours, row)| {
                    row.into_iter()
                        .filter_map(move |(versus, mult)| {
                            versus
                                .strip_prefix("vs_")
                                .and_then(|tag| Archetype::try_from(tag).ok())
                                .map(|theirs| ((ours, theirs), mult))
                        })
                        .collect::<Vec<_>>()
                })
                .collect(),
            role_phase: phase_file
                .into_iter()
                .filter_map(|(role, raw)| normalize(&role).map(|r| (r, PhaseRates::from(raw))))
                .collect(),
            transfers: transfer_file
                .transfers
                .into_iter()
                .map(|(champion, raws)| {
                    (
                        champion,
                        raws.into_iter()
                            .filter(|t| !t.champion.is_empty())
                            .map(|t| Transfer {
                                champion: t.champion,
                                co_play_rate: t.co_play_rate,
                            })
                            .collect(),
                    )
                })
                .collect(),
        }
    }

    /// per-tournament meta table for historical replays. falls back to the
    /// process-wide default table when the tournament file is absent.
    pub fn tournament_table(&self, file: Option<&str>) -> Arc<TournamentTable> {
        match file {
            None => self.tournament.clone(),
            Some(name) => {
                let path = self.dir.join(name);
                if path.exists() {
                    Arc::new(TournamentTable::from(read::<RawTournamentFile>(&path)))
                } else {
                    log::warn!("tournament file {} missing, using default meta", name);
                    self.tournament.clone()
                }
            }
        }
    }
}

// raw -> typed conversions
impl From<RawFlexEntry> for FlexEntry {
    fn from(raw: RawFlexEntry) -> Self {
        Self {
            is_flex: raw.is_flex,
            probabilities: raw
                .roles
                .into_iter()
                .filter_map(|(role, value)| {
                    normalize(&role).zip(value.as_f64()).map(|(r, p)| (r, p))
                })
                .collect(),
        }
    }
}

impl From<RawHistoryEntry> for RoleHistory {
    fn from(raw: RawHistoryEntry) -> Self {
        Self {
            canonical: raw
                .canonical_role
                .as_deref()
                .and_then(normalize)
                .or(raw.pro_play_primary_role.as_deref().and_then(normalize)),
            all: raw.canonical_all.iter().filter_map(|r| normalize(r)).collect(),
            current_viable: raw
                .current_viable_roles
                .iter()
                .filter_map(|r| normalize(r))
                .collect(),
            current_distribution: normalize_keys(raw.current_distribution),
            all_time: normalize_keys(raw.all_time_distribution),
            presence: raw.pro_play_presence,
            win_rate: raw.pro_play_win_rate,
        }
    }
}

impl From<RawMatchupRow> for MatchupRow {
    fn from(raw: RawMatchupRow) -> Self {
        Self {
            win_rate: raw.win_rate,
            games: raw.games,
            confidence: raw
                .confidence
                .as_deref()
                .and_then(|c| Confidence::try_from(c).ok())
                .unwrap_or(Confidence::Medium),
        }
    }
}

impl From<RawMatchupEntry> for Matchups {
    fn from(raw: RawMatchupEntry) -> Self {
        Self {
            lane: raw
                .vs_lane
                .into_iter()
                .filter_map(|(role, row)| normalize(&role).map(|r| (r, row)))
                .map(|(role, row)| {
                    (
                        role,
                        row.into_iter()
                            .map(|(enemy, raw)| (enemy, MatchupRow::from(raw)))
                            .collect(),
                    )
                })
                .collect(),
            team: raw
                .vs_team
                .into_iter()
                .map(|(enemy, row)| (enemy, MatchupRow::from(row)))
                .collect(),
        }
    }
}

impl From<RawMetaEntry> for MetaEntry {
    fn from(raw: RawMetaEntry) -> Self {
        let context = raw.pick_context.unwrap_or_default();
        Self {
            score: raw.meta_score,
            tier: raw.meta_tier.as_deref().and_then(|t| Tier::try_from(t).ok()),
            presence: raw.presence,
            counter_dependent: context.is_counter_pick_dependent,
            blind_early_win_rate: context.blind_early_win_rate,
        }
    }
}

impl From<RawTournamentFile> for TournamentTable {
    fn from(raw: RawTournamentFile) -> Self {
        Self {
            missing_priority: raw.defaults.missing_champion_priority,
            missing_performance: raw.defaults.missing_champion_performance,
            champions: raw
                .champions
                .into_iter()
                .map(|(champion, entry)| {
                    (
                        champion,
                        TournamentEntry {
                            priority: entry.priority,
                            roles: entry
                                .roles
                                .into_iter()
                                .filter_map(|(role, row)| normalize(&role).map(|r| (r, row)))
                                .map(|(role, row)| {
                                    (
                                        role,
                                        TournamentRole {
                                            picks: row.picks,
                                            winrate: row.winrate,
                                            adjusted: row.adjusted_performance,
                                        },
                                    )
                                })
                                .collect(),
                        },
                    )
                })
                .collect(),
        }
    }
}

impl From<RawProficiencyEntry> for ProficiencyEntry {
    fn from(raw: RawProficiencyEntry) -> Self {
        Self {
            games_raw: raw.games_raw.unwrap_or(0.0),
            games_weighted: raw.games_weighted.unwrap_or(0.0),
            win_rate: raw.win_rate.unwrap_or(0.5),
            win_rate_weighted: raw.win_rate_weighted.or(raw.win_rate).unwrap_or(0.5),
            confidence: raw
                .confidence
                .as_deref()
                .and_then(|c| Confidence::try_from(c).ok()),
        }
    }
}

impl From<RawPhaseRates> for PhaseRates {
    fn from(raw: RawPhaseRates) -> Self {
        Self {
            early_p1: raw.early_p1,
            late_p1: raw.late_p1,
            p2: raw.p2,
        }
    }
}

fn convert_synergies(
    raws: Vec<RawSynergy>,
) -> (Vec<CuratedSynergy>, BTreeMap<(String, String), Grade>) {
    let mut curated = Vec::new();
    let mut pairs = BTreeMap::new();
    for raw in raws {
        let strength = raw
            .strength
            .as_deref()
            .and_then(|s| Grade::try_from(s).ok())
            .unwrap_or(Grade::C);
        if raw.partner_requirement {
            for partner in &raw.best_partners {
                if let (Some(first), Some(champ)) = (raw.champions.first(), partner.champion.as_ref()) {
                    let rating = partner
                        .rating
                        .as_deref()
                        .and_then(|r| Grade::try_from(r).ok())
                        .unwrap_or(strength);
                    pairs.insert(pair_key(first, champ), rating);
                }
            }
        }
        if raw.champions.len() >= 2 {
            pairs.insert(pair_key(&raw.champions[0], &raw.champions[1]), strength);
        }
        curated.push(CuratedSynergy {
            id: raw.id,
            champions: raw.champions,
            strength,
            description: raw.description,
            comp_archetypes: raw.comp_archetypes,
            countered_by: raw.countered_by,
        });
    }
    (curated, pairs)
}

/// unordered champion pair key
pub fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn normalize_keys(raw: BTreeMap<String, f64>) -> BTreeMap<Role, Probability> {
    raw.into_iter()
        .filter_map(|(role, p)| normalize(&role).map(|r| (r, p)))
        .collect()
}

fn read<T: serde::de::DeserializeOwned + Default>(path: &Path) -> T {
    match std::fs::read_to_string(path) {
        Err(_) => {
            log::warn!("knowledge file {} missing, scorers degrade to defaults", path.display());
            T::default()
        }
        Ok(text) => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("knowledge file {} unreadable ({}), using defaults", path.display(), e);
                T::default()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_unordered() {
        assert!(pair_key("Xayah", "Rakan") == pair_key("Rakan", "Xayah"));
    }

    #[test]
    fn history_primary_prefers_lone_viable_role() {
        let history = RoleHistory {
            canonical: Some(Role::Mid),
            current_viable: vec![Role::Top],
            ..RoleHistory::default()
        };
        assert!(history.primary() == Some(Role::Top));
    }

    #[test]
    fn history_primary_falls_back_to_distribution() {
        let history = RoleHistory {
            canonical: Some(Role::Mid),
            current_distribution: [(Role::Top, 0.7), (Role::Jungle, 0.3)].into_iter().collect(),
            ..RoleHistory::default()
        };
        assert!(history.primary() == Some(Role::Top));
    }

    #[test]
    fn missing_tournament_defaults() {
        let table = TournamentTable::default();
        assert!(table.missing_priority == 0.05);
        assert!(table.missing_performance == 0.35);
        assert!(table.champions.is_empty());
    }

    #[test]
    fn missing_directory_degrades_to_empty() {
        let knowledge = Knowledge::load(Path::new("/nonexistent/knowledge"));
        assert!(knowledge.flex.is_empty());
        assert!(knowledge.meta.is_empty());
        assert!(knowledge.tournament.champions.is_empty());
    }
}
