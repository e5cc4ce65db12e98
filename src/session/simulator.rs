use super::enemy::EnemyStrategy;
use super::error::SessionError;
use crate::analysis::GameResult;
use crate::draft::Action;
use crate::draft::ActionKind;
use crate::draft::Side;
use crate::draft::State;
use crate::draft::Team;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::time::Instant;

/// provenance of a fearless block, for tooltips
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FearlessBlock {
    pub team: Side,
    pub game: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftMode {
    Normal,
    Fearless,
}

impl TryFrom<&str> for DraftMode {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, anyhow::Error> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "fearless" => Ok(Self::Fearless),
            other => Err(anyhow::anyhow!("unknown draft mode: {}", other)),
        }
    }
}

/// a live drafting session: the coach drives one side, the AI opponent
/// the other, through the standard draft order. single-threaded inside
/// its lock; every mutation flows through submit/complete/next.
pub struct Simulator {
    pub id: String,
    pub blue: Team,
    pub red: Team,
    pub coaching: Side,
    pub series_length: usize,
    pub mode: DraftMode,
    pub state: State,
    pub strategy: EnemyStrategy,
    pub results: Vec<GameResult>,
    pub fearless_blocked: BTreeMap<String, FearlessBlock>,
    pub current_game: usize,
    /// top recommended champions per of-our-pick slots, for post-game
    /// draft-quality comparison
    pub recommended_picks: Vec<Vec<String>>,
    pub last_access: Instant,
}

// construction
impl Simulator {
    pub fn new(
        id: &str,
        blue: Team,
        red: Team,
        coaching: Side,
        series_length: usize,
        mode: DraftMode,
        strategy: EnemyStrategy,
        patch: &str,
    ) -> Self {
        let state = State::root(&format!("{}_g1", id), id, 1, patch, blue.clone(), red.clone());
        Self {
            id: id.to_string(),
            blue,
            red,
            coaching,
            series_length,
            mode,
            state,
            strategy,
            results: Vec::new(),
            fearless_blocked: BTreeMap::new(),
            current_game: 1,
            recommended_picks: Vec::new(),
            last_access: Instant::now(),
        }
    }
}

// turn accounting
impl Simulator {
    pub fn enemy_side(&self) -> Side {
        self.coaching.flip()
    }

    pub fn is_our_turn(&self) -> bool {
        matches!(self.state.next, Some((side, _)) if side == self.coaching)
    }

    pub fn action_count(&self) -> usize {
        self.state.action_count()
    }

    /// rejects requests computed against an older draft state
    pub fn check_fresh(&self, action_count: usize) -> Result<(), SessionError> {
        let current = self.action_count();
        match action_count == current {
            true => Ok(()),
            false => Err(SessionError::Stale {
                requested: action_count,
                current,
            }),
        }
    }

    pub fn touch(&mut self) {
        self.last_access = Instant::now();
    }

    pub fn idle_seconds(&self) -> u64 {
        self.last_access.elapsed().as_secs()
    }
}

// availability
impl Simulator {
    pub fn fearless_blocked_set(&self) -> BTreeSet<String> {
        self.fearless_blocked.keys().cloned().collect()
    }

    pub fn unavailable(&self) -> BTreeSet<String> {
        let mut unavailable = self.state.unavailable();
        unavailable.extend(self.fearless_blocked.keys().cloned());
        unavailable
    }
}

// draft actions
impl Simulator {
    /// the coach's own pick or ban
    pub fn submit(&mut self, champion: &str) -> Result<Action, SessionError> {
        match self.state.next {
            Some((side, _)) if side == self.coaching => self.apply(champion),
            _ => Err(SessionError::InvalidTurn("Not your turn")),
        }
    }

    /// an action on behalf of the AI opponent
    pub fn submit_enemy(&mut self, champion: &str) -> Result<Action, SessionError> {
        match self.state.next {
            Some((side, _)) if side != self.coaching => self.apply(champion),
            _ => Err(SessionError::InvalidTurn("Not enemy's turn")),
        }
    }

    fn apply(&mut self, champion: &str) -> Result<Action, SessionError> {
        let Some((side, kind)) = self.state.next else {
            return Err(SessionError::InvalidTurn("Draft already complete"));
        };
        if self.unavailable().contains(champion) {
            return Err(SessionError::Unavailable(champion.to_string()));
        }
        let action = Action::new(self.state.action_count() + 1, kind, side, champion);
        self.state.apply(action.clone());
        Ok(action)
    }

    /// remembers what we were recommending at one of our pick slots,
    /// once per slot, before the pick lands
    pub fn track_recommendations(&mut self, top: Vec<String>) {
        if !matches!(self.state.next, Some((side, ActionKind::Pick)) if side == self.coaching) {
            return;
        }
        let our_picks = self.state.picks(self.coaching).len();
        if self.recommended_picks.len() == our_picks {
            self.recommended_picks.push(top);
        }
    }
}

// series management
impl Simulator {
    pub fn series_score(&self) -> (usize, usize) {
        let blue = self.results.iter().filter(|r| r.winner == Side::Blue).count();
        let red = self.results.iter().filter(|r| r.winner == Side::Red).count();
        (blue, red)
    }

    pub fn wins_needed(&self) -> usize {
        self.series_length / 2 + 1
    }

    pub fn series_complete(&self) -> bool {
        let (blue, red) = self.series_score();
        blue >= self.wins_needed() || red >= self.wins_needed()
    }

    /// records the winner, locks fearless champions, and returns the result
    pub fn complete_game(&mut self, winner: Side) -> GameResult {
        let result = GameResult {
            game_number: self.current_game,
            winner,
            blue_comp: self.state.picks(Side::Blue),
            red_comp: self.state.picks(Side::Red),
            blue_bans: self.state.bans(Side::Blue),
            red_bans: self.state.bans(Side::Red),
        };
        self.results.push(result.clone());
        if self.mode == DraftMode::Fearless {
            for champion in &result.blue_comp {
                self.fearless_blocked.insert(
                    champion.clone(),
                    FearlessBlock {
                        team: Side::Blue,
                        game: self.current_game,
                    },
                );
            }
            for champion in &result.red_comp {
                self.fearless_blocked.insert(
                    champion.clone(),
                    FearlessBlock {
                        team: Side::Red,
                        game: self.current_game,
                    },
                );
            }
        }
        result
    }

    /// fresh draft for the next game; enemy strategy is re-rolled by the
    /// caller so each game imitates a different reference
    pub fn next_game(&mut self, strategy: EnemyStrategy) -> Result<usize, SessionError> {
        if self.series_complete() {
            return Err(SessionError::Conflict("Series already complete"));
        }
        self.current_game += 1;
        self.state = State::root(
            &format!("{}_g{}", self.id, self.current_game),
            &self.id,
            self.current_game,
            &self.state.patch.clone(),
            self.blue.clone(),
            self.red.clone(),
        );
        self.strategy = strategy;
        self.recommended_picks = Vec::new();
        Ok(self.current_game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Phase;
    use crate::draft::Player;
    use std::collections::BTreeMap;

    fn strategy() -> EnemyStrategy {
        EnemyStrategy {
            team_id: "t2".to_string(),
            team_name: "GEN".to_string(),
            players: Vec::<Player>::new(),
            script: Vec::new(),
            fallback_games: Vec::new(),
            game_sides: BTreeMap::new(),
            weights: BTreeMap::new(),
        }
    }

    fn simulator(series_length: usize, mode: DraftMode) -> Simulator {
        let blue = Team::new("t1", "T1", Side::Blue, Vec::new());
        let red = Team::new("t2", "GEN", Side::Red, Vec::new());
        Simulator::new(
            "sim_1", blue, red, Side::Blue, series_length, mode, strategy(), "15.18",
        )
    }

    fn play_out(simulator: &mut Simulator) {
        let mut n = 0;
        while let Some((side, _)) = simulator.state.next {
            n += 1;
            let champion = format!("Champ{}", n);
            match side == simulator.coaching {
                true => simulator.submit(&champion).unwrap(),
                false => simulator.submit_enemy(&champion).unwrap(),
            };
        }
    }

    #[test]
    fn blue_opens_and_turns_enforced() {
        let mut simulator = simulator(1, DraftMode::Normal);
        assert!(simulator.is_our_turn());
        assert!(matches!(
            simulator.submit_enemy("Azir"),
            Err(SessionError::InvalidTurn(_))
        ));
        simulator.submit("Azir").unwrap();
        assert!(!simulator.is_our_turn());
        assert!(matches!(
            simulator.submit("Rumble"),
            Err(SessionError::InvalidTurn(_))
        ));
    }

    #[test]
    fn duplicates_are_refused() {
        let mut simulator = simulator(1, DraftMode::Normal);
        simulator.submit("Azir").unwrap();
        let refused = simulator.submit_enemy("Azir");
        assert!(matches!(refused, Err(SessionError::Unavailable(_))));
    }

    #[test]
    fn fearless_blocks_repeat_picks() {
        let mut simulator = simulator(3, DraftMode::Fearless);
        play_out(&mut simulator);
        assert!(simulator.state.phase == Phase::Complete);
        simulator.complete_game(Side::Blue);
        assert!(simulator.fearless_blocked.len() == 10);
        simulator.next_game(strategy()).unwrap();
        // a champion picked in game one cannot be picked in game two
        let blocked = simulator.fearless_blocked.keys().next().unwrap().clone();
        let refused = simulator.submit(&blocked);
        assert!(matches!(refused, Err(SessionError::Unavailable(_))));
    }

    #[test]
    fn normal_mode_does_not_block() {
        let mut simulator = simulator(3, DraftMode::Normal);
        play_out(&mut simulator);
        simulator.complete_game(Side::Red);
        assert!(simulator.fearless_blocked.is_empty());
    }

    #[test]
    fn series_ceilings() {
        let mut simulator = simulator(3, DraftMode::Normal);
        assert!(simulator.wins_needed() == 2);
        play_out(&mut simulator);
        simulator.complete_game(Side::Blue);
        assert!(!simulator.series_complete());
        simulator.next_game(strategy()).unwrap();
        play_out(&mut simulator);
        simulator.complete_game(Side::Blue);
        assert!(simulator.series_complete());
        assert!(matches!(
            simulator.next_game(strategy()),
            Err(SessionError::Conflict(_))
        ));
    }

    #[test]
    fn stale_requests_rejected() {
        let mut simulator = simulator(1, DraftMode::Normal);
        simulator.submit("Azir").unwrap();
        simulator.submit_enemy("Rumble").unwrap();
        assert!(simulator.check_fresh(2).is_ok());
        let stale = simulator.check_fresh(0).unwrap_err();
        assert!(stale.to_string().contains("current is 2"));
    }

    #[test]
    fn recommendation_tracking_is_per_slot() {
        let mut simulator = simulator(1, DraftMode::Normal);
        // ban phase: nothing tracked
        simulator.track_recommendations(vec!["Azir".to_string()]);
        assert!(simulator.recommended_picks.is_empty());
        for n in 0..6 {
            let champion = format!("Ban{}", n);
            match simulator.is_our_turn() {
                true => simulator.submit(&champion).unwrap(),
                false => simulator.submit_enemy(&champion).unwrap(),
            };
        }
        // first pick is blue's; track once per slot
        simulator.track_recommendations(vec!["Azir".to_string(), "Orianna".to_string()]);
        simulator.track_recommendations(vec!["Taliyah".to_string()]);
        assert!(simulator.recommended_picks.len() == 1);
        assert!(simulator.recommended_picks[0][0] == "Azir");
    }
}
