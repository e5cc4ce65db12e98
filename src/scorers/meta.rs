use crate::Score;
use crate::draft::Role;
use crate::knowledge::Knowledge;
use crate::knowledge::Tier;
use std::sync::Arc;

/// how a meta score is assembled from the stored stats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaMethod {
    /// stored tier-based score
    Default,
    /// presence rescaled into [0.3, 1.0]
    Presence,
    /// mean of the two; balances win-rate and pick-frequency signals
    Hybrid,
}

pub struct MetaScorer(Arc<Knowledge>);

impl From<Arc<Knowledge>> for MetaScorer {
    fn from(knowledge: Arc<Knowledge>) -> Self {
        Self(knowledge)
    }
}

// scoring
impl MetaScorer {
    pub fn score(&self, champion: &str) -> Score {
        self.score_with(champion, MetaMethod::Hybrid)
    }

    pub fn score_with(&self, champion: &str, method: MetaMethod) -> Score {
        let Some(entry) = self.0.meta.get(champion) else {
            return 0.5;
        };
        let stored = entry.score.unwrap_or(0.5);
        let presence = 0.3 + entry.presence * 0.7;
        match method {
            MetaMethod::Default => stored,
            MetaMethod::Presence => presence,
            MetaMethod::Hybrid => (stored + presence) / 2.0,
        }
    }

    pub fn tier(&self, champion: &str) -> Option<Tier> {
        self.0.meta.get(champion).and_then(|entry| entry.tier)
    }

    /// pick rate plus ban rate; how contested the champion is
    pub fn presence(&self, champion: &str) -> Score {
        self.0
            .meta
            .get(champion)
            .map(|entry| entry.presence)
            .unwrap_or(0.0)
    }

    /// multiplier in [0.7, 1.1] penalizing counter-dependent blind picks
    pub fn blind_safety(&self, champion: &str) -> Score {
        let Some(entry) = self.0.meta.get(champion) else {
            return 1.0;
        };
        if entry.counter_dependent {
            return 0.85;
        }
        match entry.blind_early_win_rate {
            Some(rate) => 0.9 + (rate - 0.5) * 0.4,
            None => 1.0,
        }
    }
}

// ranked listings
impl MetaScorer {
    /// strongest meta champions, optionally restricted to one role.
    /// role filtering trusts current viability data and falls back to the
    /// all-time distribution when no current data exists.
    pub fn top_champions(&self, role: Option<Role>, limit: usize) -> Vec<String> {
        let mut ranked = self
            .0
            .meta
            .iter()
            .filter(|(champion, _)| match role {
                Some(role) => self.plays(champion, role),
                None => true,
            })
            .map(|(champion, entry)| (champion.clone(), entry.score.unwrap_or(0.0)))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);
        ranked.into_iter().map(|(champion, _)| champion).collect()
    }

    fn plays(&self, champion: &str, role: Role) -> bool {
        let Some(history) = self.0.history.get(champion) else {
            // no role data at all: include rather than silently hide
            return true;
        };
        if let Some(current) = history.current_roles() {
            return current.contains(&role);
        }
        if history.canonical == Some(role) || history.all.contains(&role) {
            return true;
        }
        history.all_time.get(&role).copied().unwrap_or(0.0) >= 0.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::MetaEntry;
    use crate::knowledge::RoleHistory;
    use std::path::Path;

    fn scorer() -> MetaScorer {
        let mut knowledge = Knowledge::load(Path::new("/nonexistent"));
        knowledge.meta.insert(
            "Azir".to_string(),
            MetaEntry {
                score: Some(0.9),
                tier: Some(Tier::S),
                presence: 0.6,
                ..MetaEntry::default()
            },
        );
        knowledge.meta.insert(
            "Sion".to_string(),
            MetaEntry {
                score: Some(0.4),
                tier: Some(Tier::C),
                presence: 0.1,
                counter_dependent: true,
                ..MetaEntry::default()
            },
        );
        knowledge.history.insert(
            "Azir".to_string(),
            RoleHistory {
                current_viable: vec![Role::Mid],
                ..RoleHistory::default()
            },
        );
        knowledge.history.insert(
            "Sion".to_string(),
            RoleHistory {
                canonical: Some(Role::Top),
                all_time: [(Role::Top, 0.9), (Role::Mid, 0.05)].into_iter().collect(),
                ..RoleHistory::default()
            },
        );
        MetaScorer::from(Arc::new(knowledge))
    }

    #[test]
    fn hybrid_averages_stored_and_presence() {
        let scorer = scorer();
        let stored = scorer.score_with("Azir", MetaMethod::Default);
        let presence = scorer.score_with("Azir", MetaMethod::Presence);
        assert!(stored == 0.9);
        assert!((presence - (0.3 + 0.6 * 0.7)).abs() < 1e-9);
        assert!((scorer.score("Azir") - (stored + presence) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_champion_is_neutral() {
        let scorer = scorer();
        assert!(scorer.score("Whoever") == 0.5);
        assert!(scorer.tier("Whoever") == None);
        assert!(scorer.presence("Whoever") == 0.0);
        assert!(scorer.blind_safety("Whoever") == 1.0);
    }

    #[test]
    fn counter_dependent_blind_penalty() {
        let scorer = scorer();
        assert!(scorer.blind_safety("Sion") == 0.85);
    }

    #[test]
    fn top_champions_respect_role_filter() {
        let scorer = scorer();
        let mids = scorer.top_champions(Some(Role::Mid), 10);
        assert!(mids == vec!["Azir".to_string()]);
        let tops = scorer.top_champions(Some(Role::Top), 10);
        assert!(tops == vec!["Sion".to_string()]);
        let all = scorer.top_champions(None, 10);
        assert!(all == vec!["Azir".to_string(), "Sion".to_string()]);
    }
}
