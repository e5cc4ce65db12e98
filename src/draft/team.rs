use super::role::Role;
use super::side::Side;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub role: Option<Role>,
}

impl Player {
    pub fn new(id: &str, name: &str, role: Option<Role>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role,
        }
    }
}

/// a roster on one side of the draft. complete rosters hold exactly five
/// players ordered top, jungle, mid, bot, support. a team may be referenced
/// by id without a known roster; downstream scorers then fall back to
/// global signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub side: Side,
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(id: &str, name: &str, side: Side, mut players: Vec<Player>) -> Self {
        sort_by_role(&mut players);
        Self {
            id: id.to_string(),
            name: name.to_string(),
            side,
            players,
        }
    }
    pub fn player_in(&self, role: Role) -> Option<&Player> {
        self.players.iter().find(|p| p.role == Some(role))
    }
    pub fn is_complete(&self) -> bool {
        self.players.len() == 5 && Role::all().iter().all(|r| self.player_in(*r).is_some())
    }
}

/// orders players by the fixed role sequence; unknown roles sink to the end
pub fn sort_by_role(players: &mut [Player]) {
    players.sort_by_key(|p| p.role.map(|r| r.sort_key()).unwrap_or(99));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_sorted_by_role() {
        let team = Team::new(
            "t1",
            "T1",
            Side::Blue,
            vec![
                Player::new("p4", "Ruler", Some(Role::Bot)),
                Player::new("p1", "Kiin", Some(Role::Top)),
                Player::new("p5", "Duro", Some(Role::Support)),
                Player::new("p3", "Chovy", Some(Role::Mid)),
                Player::new("p2", "Canyon", Some(Role::Jungle)),
            ],
        );
        let names = team.players.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
        assert!(names == vec!["Kiin", "Canyon", "Chovy", "Ruler", "Duro"]);
        assert!(team.is_complete());
    }

    #[test]
    fn unknown_role_sorts_last() {
        let mut players = vec![
            Player::new("a", "Sub", None),
            Player::new("b", "Carry", Some(Role::Bot)),
        ];
        sort_by_role(&mut players);
        assert!(players[0].name == "Carry");
    }
}
