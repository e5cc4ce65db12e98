use super::action::Action;
use super::kind::ActionKind;
use super::order::ORDER;
use super::phase::Phase;
use super::side::Side;
use super::team::Team;
use std::collections::BTreeSet;

/// an immutable view of the draft after some prefix of actions.
/// `next` is who acts next and how; None once the draft is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub game_id: String,
    pub series_id: String,
    pub game_number: usize,
    pub patch: String,
    pub blue: Team,
    pub red: Team,
    pub actions: Vec<Action>,
    pub phase: Phase,
    pub next: Option<(Side, ActionKind)>,
}

// constructors
impl State {
    /// empty state at the head of a simulator game. the simulator always
    /// follows the standard order, so blue opens with a ban.
    pub fn root(game_id: &str, series_id: &str, game_number: usize, patch: &str, blue: Team, red: Team) -> Self {
        Self {
            game_id: game_id.to_string(),
            series_id: series_id.to_string(),
            game_number,
            patch: patch.to_string(),
            blue,
            red,
            actions: Vec::new(),
            phase: Phase::BanOne,
            next: Some(ORDER[0]),
        }
    }

    /// state after the first `upto` actions of a recorded game.
    /// next-to-act comes from the action list itself rather than any fixed
    /// order, because historical tournament drafts vary.
    pub fn at(base: &Self, actions: &[Action], upto: usize) -> Self {
        let upto = upto.min(actions.len());
        let next = actions.get(upto).map(|a| (a.side, a.kind));
        Self {
            game_id: base.game_id.clone(),
            series_id: base.series_id.clone(),
            game_number: base.game_number,
            patch: base.patch.clone(),
            blue: base.blue.clone(),
            red: base.red.clone(),
            actions: actions[..upto].to_vec(),
            phase: Phase::from(upto),
            next,
        }
    }
}

// advancement
impl State {
    /// append an action and advance phase and turn along the standard order.
    /// simulator-only; replays rebuild through `at` instead.
    pub fn apply(&mut self, action: Action) {
        self.actions.push(action);
        let n = self.actions.len();
        self.phase = Phase::from(n);
        self.next = ORDER.get(n).copied();
    }
}

// projections
impl State {
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }
    pub fn picks(&self, side: Side) -> Vec<String> {
        self.actions
            .iter()
            .filter(|a| a.kind == ActionKind::Pick && a.side == side)
            .map(|a| a.champion.clone())
            .collect()
    }
    pub fn bans(&self, side: Side) -> Vec<String> {
        self.actions
            .iter()
            .filter(|a| a.kind == ActionKind::Ban && a.side == side)
            .map(|a| a.champion.clone())
            .collect()
    }
    pub fn all_bans(&self) -> Vec<String> {
        let mut bans = self.bans(Side::Blue);
        bans.extend(self.bans(Side::Red));
        bans
    }
    /// every champion locked out of the rest of this game
    pub fn unavailable(&self) -> BTreeSet<String> {
        self.actions.iter().map(|a| a.champion.clone()).collect()
    }
    pub fn is_taken(&self, champion: &str) -> bool {
        self.actions.iter().any(|a| a.champion == champion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::team::Player;

    fn teams() -> (Team, Team) {
        let blue = Team::new("b", "Blue", Side::Blue, Vec::<Player>::new());
        let red = Team::new("r", "Red", Side::Red, Vec::<Player>::new());
        (blue, red)
    }

    fn scripted() -> Vec<Action> {
        ORDER
            .iter()
            .enumerate()
            .map(|(i, (side, kind))| Action::new(i + 1, *kind, *side, &format!("Champ{}", i)))
            .collect()
    }

    #[test]
    fn prefix_then_apply_equals_longer_prefix() {
        let (blue, red) = teams();
        let base = State::root("g1", "s1", 1, "15.18", blue, red);
        let actions = scripted();
        for k in 0..actions.len() {
            let mut stepped = State::at(&base, &actions, k);
            stepped.apply(actions[k].clone());
            let direct = State::at(&base, &actions, k + 1);
            assert!(stepped.actions == direct.actions);
            assert!(stepped.phase == direct.phase);
            assert!(stepped.next == direct.next);
        }
    }

    #[test]
    fn full_draft_completes() {
        let (blue, red) = teams();
        let mut state = State::root("g1", "s1", 1, "15.18", blue, red);
        for action in scripted() {
            state.apply(action);
        }
        assert!(state.phase == Phase::Complete);
        assert!(state.next == None);
        assert!(state.picks(Side::Blue).len() == 5);
        assert!(state.picks(Side::Red).len() == 5);
        assert!(state.bans(Side::Blue).len() == 5);
        assert!(state.bans(Side::Red).len() == 5);
        assert!(state.unavailable().len() == 20);
    }

    #[test]
    fn replay_derives_next_from_actions_not_order() {
        let (blue, red) = teams();
        let base = State::root("g1", "s1", 1, "15.18", blue, red);
        // a nonstandard draft where red opens the banning
        let actions = vec![
            Action::new(1, ActionKind::Ban, Side::Red, "Azir"),
            Action::new(2, ActionKind::Ban, Side::Blue, "Wukong"),
        ];
        let state = State::at(&base, &actions, 0);
        assert!(state.next == Some((Side::Red, ActionKind::Ban)));
        let state = State::at(&base, &actions, 1);
        assert!(state.next == Some((Side::Blue, ActionKind::Ban)));
        let state = State::at(&base, &actions, 2);
        assert!(state.next == None);
    }
}
