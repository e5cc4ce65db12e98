use super::rows::*;
use crate::draft::Action;
use crate::draft::ActionKind;
use crate::draft::Player;
use crate::draft::Role;
use crate::draft::Side;
use crate::draft::Team;
use crate::draft::normalize;
use crate::draft::sort_by_role;
use crate::knowledge::Knowledge;
use std::sync::Arc;
use tokio_postgres::Client;

const SERIES: &str = "series";
const GAMES: &str = "games";
const TEAMS: &str = "teams";
const STATS: &str = "player_game_stats";
const ACTIONS: &str = "draft_actions";

/// read-only window onto the match store. this is the entire surface the
/// core consumes; ingestion and schema management live elsewhere.
/// the authoritative player-role file overrides database roles wherever a
/// player appears in it.
pub struct Repository {
    client: Arc<Client>,
    knowledge: Arc<Knowledge>,
}

impl From<(Arc<Client>, Arc<Knowledge>)> for Repository {
    fn from((client, knowledge): (Arc<Client>, Arc<Knowledge>)) -> Self {
        Self { client, knowledge }
    }
}

// role resolution
impl Repository {
    /// canonical role for a player, from the authoritative file
    pub fn player_role(&self, name: &str) -> Option<Role> {
        self.knowledge
            .player_roles
            .get(&name.trim().to_lowercase())
            .copied()
    }

    fn resolve_role(&self, name: &str, db_role: Option<&str>) -> Option<Role> {
        self.player_role(name)
            .or_else(|| db_role.and_then(normalize))
    }
}

// series and game listings
impl Repository {
    #[rustfmt::skip]
    pub async fn series_list(&self, limit: i64) -> anyhow::Result<Vec<SeriesRow>> {
        const SQL: &str = const_format::concatcp!(
            "SELECT   s.id, ",
                     "s.match_date::TEXT, ",
                     "s.format, ",
                     "s.blue_team_id, ",
                     "t1.name AS blue_team_name, ",
                     "s.red_team_id, ",
                     "t2.name AS red_team_name ",
            "FROM     ", SERIES, " s ",
            "JOIN     ", TEAMS,  " t1 ON s.blue_team_id = t1.id ",
            "JOIN     ", TEAMS,  " t2 ON s.red_team_id  = t2.id ",
            "ORDER BY s.match_date DESC ",
            "LIMIT    $1"
        );
        Ok(self
            .client
            .query(SQL, &[&limit])
            .await
            .map_err(|e| anyhow::anyhow!("fetch series list: {}", e))?
            .iter()
            .map(|row| SeriesRow {
                id: row.get(0),
                match_date: row.get(1),
                format: row.get(2),
                blue_team_id: row.get(3),
                blue_team_name: row.get(4),
                red_team_id: row.get(5),
                red_team_name: row.get(6),
            })
            .collect())
    }

    #[rustfmt::skip]
    pub async fn games_for_series(&self, series_id: &str) -> anyhow::Result<Vec<GameRow>> {
        const SQL: &str = const_format::concatcp!(
            "SELECT   id, ",
                     "game_number::INTEGER, ",
                     "patch_version, ",
                     "winner_team_id, ",
                     "duration_seconds ",
            "FROM     ", GAMES, " ",
            "WHERE    series_id = $1 ",
            "ORDER BY game_number::INTEGER"
        );
        Ok(self
            .client
            .query(SQL, &[&series_id])
            .await
            .map_err(|e| anyhow::anyhow!("fetch games for series: {}", e))?
            .iter()
            .map(|row| GameRow {
                id: row.get(0),
                game_number: row.get::<_, i32>(1) as usize,
                patch_version: row.get(2),
                winner_team_id: row.get(3),
                duration_seconds: row.try_get(4).ok(),
            })
            .collect())
    }

    #[rustfmt::skip]
    pub async fn game_info(&self, series_id: &str, game_number: i32) -> anyhow::Result<Option<GameInfo>> {
        const SQL: &str = const_format::concatcp!(
            "SELECT g.id, ",
                   "g.series_id, ",
                   "g.game_number::INTEGER, ",
                   "g.patch_version, ",
                   "g.winner_team_id, ",
                   "s.match_date::TEXT, ",
                   "s.blue_team_id, ",
                   "s.red_team_id ",
            "FROM   ", GAMES,  " g ",
            "JOIN   ", SERIES, " s ON g.series_id = s.id ",
            "WHERE  g.series_id = $1 ",
            "AND    g.game_number::INTEGER = $2"
        );
        Ok(self
            .client
            .query_opt(SQL, &[&series_id, &game_number])
            .await
            .map_err(|e| anyhow::anyhow!("fetch game info: {}", e))?
            .map(|row| GameInfo {
                game_id: row.get(0),
                series_id: row.get(1),
                game_number: row.get::<_, i32>(2) as usize,
                patch_version: row.get(3),
                winner_team_id: row.get(4),
                match_date: row.get(5),
                blue_team_id: row.get(6),
                red_team_id: row.get(7),
            }))
    }

    #[rustfmt::skip]
    pub async fn tournament_id_for_game(&self, game_id: &str) -> anyhow::Result<Option<String>> {
        const SQL: &str = const_format::concatcp!(
            "SELECT s.tournament_id ",
            "FROM   ", GAMES,  " g ",
            "JOIN   ", SERIES, " s ON g.series_id = s.id ",
            "WHERE  g.id = $1"
        );
        Ok(self
            .client
            .query_opt(SQL, &[&game_id])
            .await
            .map_err(|e| anyhow::anyhow!("fetch tournament for game: {}", e))?
            .and_then(|row| row.get(0)))
    }
}

// teams and rosters
impl Repository {
    #[rustfmt::skip]
    pub async fn team_name(&self, team_id: &str) -> anyhow::Result<Option<String>> {
        const SQL: &str = const_format::concatcp!(
            "SELECT name FROM ", TEAMS, " WHERE id = $1"
        );
        Ok(self
            .client
            .query_opt(SQL, &[&team_id])
            .await
            .map_err(|e| anyhow::anyhow!("fetch team name: {}", e))?
            .map(|row| row.get(0)))
    }

    #[rustfmt::skip]
    pub async fn teams(&self, limit: i64) -> anyhow::Result<Vec<TeamRow>> {
        const SQL: &str = const_format::concatcp!(
            "SELECT   DISTINCT id, name ",
            "FROM     ", TEAMS, " ",
            "ORDER BY name ",
            "LIMIT    $1"
        );
        Ok(self
            .client
            .query(SQL, &[&limit])
            .await
            .map_err(|e| anyhow::anyhow!("fetch teams: {}", e))?
            .iter()
            .map(|row| TeamRow {
                id: row.get(0),
                name: row.get(1),
            })
            .collect())
    }

    #[rustfmt::skip]
    pub async fn team_for_game_side(&self, game_id: &str, side: Side) -> anyhow::Result<Option<TeamRow>> {
        const SQL: &str = const_format::concatcp!(
            "SELECT DISTINCT pgs.team_id, ",
                            "t.name ",
            "FROM   ", STATS, " pgs ",
            "JOIN   ", TEAMS, " t ON pgs.team_id = t.id ",
            "WHERE  pgs.game_id = $1 ",
            "AND    pgs.team_side = $2 ",
            "LIMIT  1"
        );
        Ok(self
            .client
            .query_opt(SQL, &[&game_id, &side.as_str()])
            .await
            .map_err(|e| anyhow::anyhow!("fetch team for game side: {}", e))?
            .map(|row| TeamRow {
                id: row.get(0),
                name: row.get(1),
            }))
    }

    #[rustfmt::skip]
    pub async fn players_for_game_by_side(&self, game_id: &str, side: Side) -> anyhow::Result<Vec<Player>> {
        const SQL: &str = const_format::concatcp!(
            "SELECT DISTINCT player_id, ",
                            "player_name, ",
                            "role ",
            "FROM   ", STATS, " ",
            "WHERE  game_id = $1 ",
            "AND    team_side = $2"
        );
        let mut players = self
            .client
            .query(SQL, &[&game_id, &side.as_str()])
            .await
            .map_err(|e| anyhow::anyhow!("fetch players for game side: {}", e))?
            .iter()
            .map(|row| {
                let name = row.get::<_, String>(1);
                let db_role = row.get::<_, Option<String>>(2);
                Player {
                    id: row.get(0),
                    role: self.resolve_role(&name, db_role.as_deref()),
                    name,
                }
            })
            .collect::<Vec<_>>();
        sort_by_role(&mut players);
        Ok(players)
    }

    /// latest roster with exactly five players, walking recent games until
    /// one has complete role data
    pub async fn team_roster(&self, team_id: &str) -> anyhow::Result<Vec<Player>> {
        for game in self.team_games(team_id, 10).await? {
            let roster = self.players_for_game_team(&game.game_id, team_id).await?;
            if roster.len() == 5 {
                return Ok(roster);
            }
        }
        Ok(Vec::new())
    }

    #[rustfmt::skip]
    async fn players_for_game_team(&self, game_id: &str, team_id: &str) -> anyhow::Result<Vec<Player>> {
        const SQL: &str = const_format::concatcp!(
            "SELECT DISTINCT player_id, ",
                            "player_name, ",
                            "role ",
            "FROM   ", STATS, " ",
            "WHERE  game_id = $1 ",
            "AND    team_id = $2"
        );
        let mut players = self
            .client
            .query(SQL, &[&game_id, &team_id])
            .await
            .map_err(|e| anyhow::anyhow!("fetch players for game team: {}", e))?
            .iter()
            .map(|row| {
                let name = row.get::<_, String>(1);
                let db_role = row.get::<_, Option<String>>(2);
                Player {
                    id: row.get(0),
                    role: self.resolve_role(&name, db_role.as_deref()),
                    name,
                }
            })
            .collect::<Vec<_>>();
        sort_by_role(&mut players);
        Ok(players)
    }

    /// team plus its latest roster, bound to the side it will play
    pub async fn team_context(&self, team_id: &str, side: Side) -> anyhow::Result<Option<Team>> {
        let Some(name) = self.team_name(team_id).await? else {
            return Ok(None);
        };
        let players = self.team_roster(team_id).await?;
        Ok(Some(Team::new(team_id, &name, side, players)))
    }
}

// draft actions and team history
impl Repository {
    #[rustfmt::skip]
    pub async fn draft_actions(&self, game_id: &str) -> anyhow::Result<Vec<Action>> {
        const SQL: &str = const_format::concatcp!(
            "SELECT   da.sequence_number::INTEGER, ",
                     "da.action_type, ",
                     "da.champion_name, ",
                     "CASE WHEN da.team_id = s.blue_team_id THEN 'blue' ELSE 'red' END AS team_side ",
            "FROM     ", ACTIONS, " da ",
            "JOIN     ", GAMES,   " g ON da.game_id = g.id ",
            "JOIN     ", SERIES,  " s ON g.series_id = s.id ",
            "WHERE    da.game_id = $1 ",
            "ORDER BY da.sequence_number::INTEGER"
        );
        self.client
            .query(SQL, &[&game_id])
            .await
            .map_err(|e| anyhow::anyhow!("fetch draft actions: {}", e))?
            .iter()
            .map(|row| {
                let kind = ActionKind::try_from(row.get::<_, String>(1).as_str())?;
                let side = Side::try_from(row.get::<_, String>(3).as_str())?;
                Ok(Action {
                    sequence: row.get::<_, i32>(0) as usize,
                    kind,
                    side,
                    champion: row.get(2),
                })
            })
            .collect()
    }

    #[rustfmt::skip]
    pub async fn team_games(&self, team_id: &str, limit: i64) -> anyhow::Result<Vec<TeamGame>> {
        const SQL: &str = const_format::concatcp!(
            "WITH team_games AS ( ",
                "SELECT DISTINCT pgs.game_id, ",
                                "g.series_id, ",
                                "g.game_number::INTEGER AS game_number, ",
                                "s.match_date, ",
                                "pgs.team_side, ",
                                "g.winner_team_id, ",
                                "CASE WHEN pgs.team_side = 'blue' THEN s.red_team_id ",
                                     "ELSE s.blue_team_id END AS opponent_team_id ",
                "FROM   ", STATS,  " pgs ",
                "JOIN   ", GAMES,  " g ON pgs.game_id = g.id ",
                "JOIN   ", SERIES, " s ON g.series_id = s.id ",
                "WHERE  pgs.team_id = $1 ",
            ") ",
            "SELECT   tg.game_id, ",
                     "tg.series_id, ",
                     "tg.game_number, ",
                     "tg.match_date::TEXT, ",
                     "tg.team_side, ",
                     "tg.opponent_team_id, ",
                     "t.name AS opponent_team_name, ",
                     "tg.winner_team_id ",
            "FROM     team_games tg ",
            "JOIN     ", TEAMS, " t ON tg.opponent_team_id = t.id ",
            "ORDER BY tg.match_date DESC, tg.game_number DESC ",
            "LIMIT    $2"
        );
        self.client
            .query(SQL, &[&team_id, &limit])
            .await
            .map_err(|e| anyhow::anyhow!("fetch team games: {}", e))?
            .iter()
            .map(|row| {
                let side = Side::try_from(row.get::<_, String>(4).as_str())?;
                Ok(TeamGame {
                    game_id: row.get(0),
                    series_id: row.get(1),
                    game_number: row.get::<_, i32>(2) as usize,
                    match_date: row.get(3),
                    side,
                    opponent_team_id: row.get(5),
                    opponent_team_name: row.get(6),
                    winner_team_id: row.get(7),
                })
            })
            .collect()
    }
}
