use crate::database::Repository;
use crate::draft::Action;
use crate::draft::ActionKind;
use crate::draft::Phase;
use crate::draft::Player;
use crate::draft::Side;
use crate::engine::BanService;
use crate::engine::PickEngine;
use crate::knowledge::Knowledge;
use rand::prelude::IndexedRandom;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// how the AI opponent settled on a champion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemySource {
    Smart,
    Reference,
    Fallback,
    Weighted,
}

impl EnemySource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smart => "smart_recommendation",
            Self::Reference => "reference_game",
            Self::Fallback => "fallback_game",
            Self::Weighted => "weighted_random",
        }
    }
}

/// everything the AI opponent knows about the team it is impersonating:
/// a reference draft to imitate, alternates to fall back on, and pick
/// frequencies over its recent games.
#[derive(Debug, Clone)]
pub struct EnemyStrategy {
    pub team_id: String,
    pub team_name: String,
    pub players: Vec<Player>,
    /// the enemy side's actions from the reference game, in order
    pub script: Vec<Action>,
    pub fallback_games: Vec<String>,
    pub game_sides: BTreeMap<String, Side>,
    pub weights: BTreeMap<String, f64>,
}

impl EnemyStrategy {
    /// champions the team has actually played recently
    pub fn pool(&self) -> BTreeSet<String> {
        self.weights.keys().cloned().collect()
    }
}

/// drives the AI opponent. prefers the same scoring the coach sees,
/// restricted to the enemy's demonstrated pool, with scripted and
/// frequency-weighted fallbacks for believability when data runs out.
pub struct EnemyService {
    repository: Arc<Repository>,
    picks: PickEngine,
    bans: BanService,
}

impl EnemyService {
    pub fn new(knowledge: Arc<Knowledge>, repository: Arc<Repository>) -> Self {
        Self {
            repository,
            picks: PickEngine::from(knowledge.clone()),
            bans: BanService::from(knowledge),
        }
    }
}

// strategy construction
impl EnemyService {
    pub async fn strategy(&self, team_id: &str) -> anyhow::Result<EnemyStrategy> {
        let games = self.repository.team_games(team_id, 20).await?;
        if games.is_empty() {
            return Err(anyhow::anyhow!("no games found for team {}", team_id));
        }
        let reference = games
            .choose(&mut rand::rng())
            .cloned()
            .expect("nonempty games");
        let script = self
            .repository
            .draft_actions(&reference.game_id)
            .await?
            .into_iter()
            .filter(|action| action.side == reference.side)
            .collect::<Vec<_>>();

        let mut weights = BTreeMap::<String, f64>::new();
        let mut game_sides = BTreeMap::new();
        let mut total = 0usize;
        for game in &games {
            game_sides.insert(game.game_id.clone(), game.side);
            for action in self.repository.draft_actions(&game.game_id).await? {
                if action.side == game.side && action.kind == ActionKind::Pick {
                    *weights.entry(action.champion).or_insert(0.0) += 1.0;
                    total += 1;
                }
            }
        }
        if total > 0 {
            for weight in weights.values_mut() {
                *weight /= total as f64;
            }
        }

        let team_name = self
            .repository
            .team_name(team_id)
            .await?
            .unwrap_or_default();
        let players = self.repository.team_roster(team_id).await?;

        Ok(EnemyStrategy {
            team_id: team_id.to_string(),
            team_name,
            players,
            fallback_games: games
                .iter()
                .filter(|g| g.game_id != reference.game_id)
                .map(|g| g.game_id.clone())
                .collect(),
            script,
            game_sides,
            weights,
        })
    }
}

// action generation
impl EnemyService {
    /// pick or ban from the enemy's perspective: their own picks are
    /// `our_picks` here and the coach's team is the enemy
    pub async fn act(
        &self,
        strategy: &EnemyStrategy,
        kind: ActionKind,
        our_picks: &[String],
        enemy_picks: &[String],
        banned: &[String],
        unavailable: &BTreeSet<String>,
    ) -> anyhow::Result<(String, EnemySource)> {
        let pool = strategy
            .pool()
            .into_iter()
            .filter(|champion| !unavailable.contains(champion))
            .collect::<BTreeSet<_>>();
        if pool.is_empty() {
            return self.scripted(strategy, 1, unavailable).await;
        }

        let recommended = match kind {
            ActionKind::Ban => {
                let phase = match banned.len() < 6 {
                    true => Phase::BanOne,
                    false => Phase::BanTwo,
                };
                self.bans
                    .recommend(our_picks, enemy_picks, banned, phase, None, 10)
                    .into_iter()
                    .map(|ban| ban.champion)
                    .collect::<Vec<_>>()
            }
            ActionKind::Pick => self
                .picks
                .recommend(&strategy.players, our_picks, enemy_picks, banned, 10)
                .into_iter()
                .map(|pick| pick.champion)
                .collect::<Vec<_>>(),
        };

        let overlapping = recommended
            .into_iter()
            .filter(|champion| pool.contains(champion))
            .collect::<Vec<_>>();
        if overlapping.is_empty() {
            let sequence = banned.len() + our_picks.len() + enemy_picks.len() + 1;
            return self.scripted(strategy, sequence, unavailable).await;
        }

        // sample the top few rather than always the best, so the opponent
        // stays believable across repeated drafts
        let top = &overlapping[..overlapping.len().min(3)];
        let champion = top
            .choose(&mut rand::rng())
            .cloned()
            .expect("nonempty top slice");
        Ok((champion, EnemySource::Smart))
    }

    /// fallback chain: reference script, other recent games, then pick
    /// frequencies as weighted randomness
    async fn scripted(
        &self,
        strategy: &EnemyStrategy,
        sequence: usize,
        unavailable: &BTreeSet<String>,
    ) -> anyhow::Result<(String, EnemySource)> {
        for action in &strategy.script {
            if action.sequence >= sequence && !unavailable.contains(&action.champion) {
                return Ok((action.champion.clone(), EnemySource::Reference));
            }
        }
        for game_id in &strategy.fallback_games {
            let Some(side) = strategy.game_sides.get(game_id) else {
                continue;
            };
            for action in self.repository.draft_actions(game_id).await? {
                if action.side == *side
                    && action.sequence >= sequence
                    && !unavailable.contains(&action.champion)
                {
                    return Ok((action.champion, EnemySource::Fallback));
                }
            }
        }
        let available = strategy
            .weights
            .iter()
            .filter(|(champion, _)| !unavailable.contains(*champion))
            .map(|(champion, weight)| (champion.clone(), *weight))
            .collect::<Vec<_>>();
        if available.is_empty() {
            return Err(anyhow::anyhow!("no available champions for enemy action"));
        }
        let weighted = available
            .choose_weighted(&mut rand::rng(), |(_, weight)| weight.max(1e-9))
            .map(|(champion, _)| champion.clone())
            .unwrap_or_else(|_| available[0].0.clone());
        Ok((weighted, EnemySource::Weighted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> EnemyStrategy {
        EnemyStrategy {
            team_id: "t1".to_string(),
            team_name: "T1".to_string(),
            players: Vec::new(),
            script: vec![
                Action::new(1, ActionKind::Ban, Side::Red, "Azir"),
                Action::new(3, ActionKind::Ban, Side::Red, "Rumble"),
            ],
            fallback_games: Vec::new(),
            game_sides: BTreeMap::new(),
            weights: [("Azir".to_string(), 0.6), ("Rumble".to_string(), 0.4)]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn pool_mirrors_weights() {
        let strategy = strategy();
        let pool = strategy.pool();
        assert!(pool.contains("Azir"));
        assert!(pool.contains("Rumble"));
        assert!(pool.len() == 2);
    }

    #[test]
    fn source_labels() {
        assert!(EnemySource::Smart.as_str() == "smart_recommendation");
        assert!(EnemySource::Weighted.as_str() == "weighted_random");
    }
}
