use super::bans::BanRecommendation;
use super::bans::BanService;
use super::picks::PickEngine;
use super::picks::PickRecommendation;
use crate::database::Repository;
use crate::draft::ActionKind;
use crate::draft::Side;
use crate::draft::State;
use crate::knowledge::Knowledge;
use crate::scorers::FlexResolver;
use std::sync::Arc;

/// ranked suggestions for one decision point, tagged with the action
/// count they were computed for so stale consumers can tell
#[derive(Debug, Clone)]
pub struct Recommendations {
    pub for_team: Side,
    pub for_action_count: usize,
    pub picks: Vec<PickRecommendation>,
    pub bans: Vec<BanRecommendation>,
}

impl Recommendations {
    pub fn empty(side: Side, action_count: usize) -> Self {
        Self {
            for_team: side,
            for_action_count: action_count,
            picks: Vec::new(),
            bans: Vec::new(),
        }
    }
}

/// unified facade over the pick and ban engines. one service exists per
/// session so replays can pin era-appropriate tournament meta.
pub struct DraftService {
    pub picks: PickEngine,
    pub bans: BanService,
    pub flex: FlexResolver,
    repository: Option<Arc<Repository>>,
}

impl DraftService {
    pub fn new(
        knowledge: Arc<Knowledge>,
        repository: Option<Arc<Repository>>,
        tournament_file: Option<&str>,
    ) -> Self {
        let tournament = knowledge.tournament_table(tournament_file);
        Self {
            picks: PickEngine::new(knowledge.clone(), tournament.clone()),
            bans: BanService::new(knowledge.clone(), tournament.clone()),
            flex: FlexResolver::with_tournament(knowledge, tournament),
            repository,
        }
    }

    pub async fn recommendations(&self, state: &State, side: Side) -> Recommendations {
        let action_count = state.action_count();
        let Some((_, kind)) = state.next else {
            return Recommendations::empty(side, action_count);
        };
        if state.phase.is_complete() {
            return Recommendations::empty(side, action_count);
        }
        let our_picks = state.picks(side);
        let enemy_picks = state.picks(side.flip());
        let banned = state.all_bans();
        match kind {
            ActionKind::Pick => Recommendations {
                for_team: side,
                for_action_count: action_count,
                picks: self.picks.recommend(
                    &state.team(side).players,
                    &our_picks,
                    &enemy_picks,
                    &banned,
                    5,
                ),
                bans: Vec::new(),
            },
            ActionKind::Ban => {
                let enemy = state.team(side.flip());
                let roster = match enemy.players.is_empty() {
                    false => Some(enemy.players.clone()),
                    true => self.lookup_roster(&enemy.id).await,
                };
                Recommendations {
                    for_team: side,
                    for_action_count: action_count,
                    picks: Vec::new(),
                    bans: self.bans.recommend(
                        &our_picks,
                        &enemy_picks,
                        &banned,
                        state.phase,
                        roster.as_deref(),
                        5,
                    ),
                }
            }
        }
    }

    async fn lookup_roster(&self, team_id: &str) -> Option<Vec<crate::draft::Player>> {
        let repository = self.repository.as_ref()?;
        if team_id.is_empty() {
            return None;
        }
        match repository.team_roster(team_id).await {
            Ok(players) if !players.is_empty() => Some(players),
            Ok(_) => None,
            Err(e) => {
                log::warn!("roster lookup failed for {}: {}", team_id, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Action;
    use crate::draft::Player;
    use crate::draft::Role;
    use crate::draft::Team;
    use crate::knowledge::MetaEntry;
    use crate::knowledge::RoleHistory;
    use crate::knowledge::TournamentEntry;
    use std::path::Path;

    fn service() -> DraftService {
        let mut knowledge = Knowledge::load(Path::new("/nonexistent"));
        for (champion, role) in [
            ("Rumble", Role::Top),
            ("Sejuani", Role::Jungle),
            ("Azir", Role::Mid),
            ("Kalista", Role::Bot),
            ("Rell", Role::Support),
        ] {
            knowledge.history.insert(
                champion.to_string(),
                RoleHistory {
                    canonical: Some(role),
                    ..RoleHistory::default()
                },
            );
            knowledge.meta.insert(
                champion.to_string(),
                MetaEntry {
                    score: Some(0.8),
                    presence: 0.4,
                    ..MetaEntry::default()
                },
            );
            let mut table = (*knowledge.tournament).clone();
            table.champions.insert(
                champion.to_string(),
                TournamentEntry {
                    priority: 0.5,
                    roles: Default::default(),
                },
            );
            knowledge.tournament = Arc::new(table);
        }
        DraftService::new(Arc::new(knowledge), None, None)
    }

    fn state() -> State {
        let players = vec![
            Player::new("p1", "Kiin", Some(Role::Top)),
            Player::new("p2", "Canyon", Some(Role::Jungle)),
            Player::new("p3", "Chovy", Some(Role::Mid)),
            Player::new("p4", "Ruler", Some(Role::Bot)),
            Player::new("p5", "Duro", Some(Role::Support)),
        ];
        let blue = Team::new("t1", "T1", Side::Blue, players.clone());
        let red = Team::new("t2", "GEN", Side::Red, players);
        State::root("g1", "s1", 1, "15.18", blue, red)
    }

    #[test]
    fn dispatches_on_next_action_kind() {
        let service = service();
        let mut state = state();
        // opening turn is a blue ban
        let bans = futures::executor::block_on(service.recommendations(&state, Side::Blue));
        assert!(bans.picks.is_empty());
        assert!(!bans.bans.is_empty());
        assert!(bans.for_action_count == 0);
        // play out the ban phase, landing on blue's first pick
        for n in 0..6 {
            let (side, kind) = state.next.unwrap();
            state.apply(Action::new(n + 1, kind, side, &format!("Ban{}", n)));
        }
        let picks = futures::executor::block_on(service.recommendations(&state, Side::Blue));
        assert!(picks.bans.is_empty());
        assert!(!picks.picks.is_empty());
        assert!(picks.for_action_count == 6);
    }

    #[test]
    fn complete_draft_recommends_nothing() {
        let service = service();
        let mut state = state();
        let mut n = 0;
        while let Some((side, kind)) = state.next {
            n += 1;
            state.apply(Action::new(n, kind, side, &format!("Champ{}", n)));
        }
        let recommendations =
            futures::executor::block_on(service.recommendations(&state, Side::Red));
        assert!(recommendations.picks.is_empty());
        assert!(recommendations.bans.is_empty());
        assert!(recommendations.for_action_count == 20);
    }
}
