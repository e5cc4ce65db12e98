use crate::MIN_ROLE_PROBABILITY;
use crate::Probability;
use crate::draft::Role;
use crate::knowledge::Knowledge;
use crate::knowledge::TournamentTable;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// answers, for a champion and a set of already-filled roles, the
/// probability distribution over the roles it could still occupy.
///
/// resolution walks sources from most to least specific: the explicit flex
/// table, the champion's current role-history block, its canonical role,
/// a rescue through tournament pick counts, and finally a deterministic
/// default order. an empty result means the champion cannot play any
/// remaining role and is not a candidate.
pub struct FlexResolver {
    knowledge: Arc<Knowledge>,
    tournament: Arc<TournamentTable>,
}

impl From<Arc<Knowledge>> for FlexResolver {
    fn from(knowledge: Arc<Knowledge>) -> Self {
        let tournament = knowledge.tournament.clone();
        Self {
            knowledge,
            tournament,
        }
    }
}

// construction
impl FlexResolver {
    /// resolver scoped to a historical tournament's meta, so replays see
    /// era-appropriate rescue data
    pub fn with_tournament(knowledge: Arc<Knowledge>, tournament: Arc<TournamentTable>) -> Self {
        Self {
            knowledge,
            tournament,
        }
    }
}

// role distributions
impl FlexResolver {
    pub fn probabilities(
        &self,
        champion: &str,
        filled: &BTreeSet<Role>,
    ) -> BTreeMap<Role, Probability> {
        if let Some(entry) = self.knowledge.flex.get(champion) {
            return restrict(&entry.probabilities, filled);
        }
        if let Some(history) = self.knowledge.history.get(champion) {
            if !history.current_distribution.is_empty() && !history.current_viable.is_empty() {
                return restrict(&history.current_distribution, filled);
            }
            if !history.current_viable.is_empty() {
                let uniform = 1.0 / history.current_viable.len() as Probability;
                let spread = history
                    .current_viable
                    .iter()
                    .map(|role| (*role, uniform))
                    .collect();
                return restrict(&spread, filled);
            }
            if let Some(primary) = history.canonical {
                // the history gave a single role. if that role is taken the
                // champion has nowhere else to go.
                return match filled.contains(&primary) {
                    true => BTreeMap::new(),
                    false => BTreeMap::from([(primary, 1.0)]),
                };
            }
        }
        if let Some(entry) = self.tournament.champions.get(champion) {
            let total = entry.roles.values().map(|r| r.picks).sum::<usize>();
            if total > 0 {
                let spread = entry
                    .roles
                    .iter()
                    .map(|(role, row)| (*role, row.picks as Probability / total as Probability))
                    .collect();
                return restrict(&spread, filled);
            }
        }
        // deterministic assignment for champions nothing knows about
        Role::default_order()
            .iter()
            .find(|role| !filled.contains(role))
            .map(|role| BTreeMap::from([(*role, 1.0)]))
            .unwrap_or_default()
    }

    /// a flex pick keeps two or more roles above the noise threshold
    pub fn is_flex(&self, champion: &str) -> bool {
        self.probabilities(champion, &BTreeSet::new()).len() >= 2
    }
}

// final role assignment
impl FlexResolver {
    /// assigns a finished five-pick composition onto the five roles.
    /// each role takes the champion most likely to play it; ties prefer the
    /// less flexible champion so flex picks slide into the last open slot.
    pub fn finalize(&self, picks: &[String]) -> Vec<(Role, String)> {
        let distributions = picks
            .iter()
            .map(|c| (c.clone(), self.probabilities(c, &BTreeSet::new())))
            .collect::<Vec<_>>();
        let mut assigned = BTreeMap::<Role, String>::new();
        let mut taken = BTreeSet::<String>::new();
        for role in Role::all() {
            let best = distributions
                .iter()
                .filter(|(champion, _)| !taken.contains(champion))
                .filter_map(|(champion, probs)| {
                    probs.get(role).map(|p| (champion, *p, probs.len()))
                })
                .filter(|(_, p, _)| *p > 0.0)
                .max_by(|a, b| {
                    a.1.partial_cmp(&b.1)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(b.2.cmp(&a.2))
                });
            if let Some((champion, _, _)) = best {
                assigned.insert(*role, champion.clone());
                taken.insert(champion.clone());
            }
        }
        // anything still unplaced takes the open roles in canonical order
        let mut leftovers = distributions
            .iter()
            .map(|(champion, _)| champion.clone())
            .filter(|champion| !taken.contains(champion))
            .collect::<Vec<_>>()
            .into_iter();
        for role in Role::all() {
            if !assigned.contains_key(role) {
                if let Some(champion) = leftovers.next() {
                    assigned.insert(*role, champion);
                }
            }
        }
        Role::all()
            .iter()
            .filter_map(|role| assigned.remove(role).map(|champion| (*role, champion)))
            .collect()
    }
}

/// drop noise and filled roles, then renormalize to a unit distribution
fn restrict(
    probabilities: &BTreeMap<Role, Probability>,
    filled: &BTreeSet<Role>,
) -> BTreeMap<Role, Probability> {
    let kept = probabilities
        .iter()
        .filter(|(role, _)| !filled.contains(role))
        .filter(|(_, p)| **p >= MIN_ROLE_PROBABILITY)
        .map(|(role, p)| (*role, *p))
        .collect::<BTreeMap<_, _>>();
    let total = kept.values().sum::<Probability>();
    if total <= 0.0 {
        return BTreeMap::new();
    }
    kept.into_iter().map(|(role, p)| (role, p / total)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::FlexEntry;
    use crate::knowledge::RoleHistory;
    use crate::knowledge::TournamentEntry;
    use crate::knowledge::TournamentRole;
    use std::path::Path;

    fn knowledge() -> Knowledge {
        let mut knowledge = Knowledge::load(Path::new("/nonexistent"));
        knowledge.flex.insert(
            "Flexy".to_string(),
            FlexEntry {
                is_flex: true,
                probabilities: [(Role::Top, 0.4), (Role::Mid, 0.6)].into_iter().collect(),
            },
        );
        knowledge.flex.insert(
            "Viego".to_string(),
            FlexEntry {
                is_flex: false,
                probabilities: [(Role::Jungle, 0.98), (Role::Support, 0.02)]
                    .into_iter()
                    .collect(),
            },
        );
        knowledge.history.insert(
            "Garen".to_string(),
            RoleHistory {
                canonical: Some(Role::Top),
                ..RoleHistory::default()
            },
        );
        knowledge
    }

    fn resolver() -> FlexResolver {
        FlexResolver::from(Arc::new(knowledge()))
    }

    #[test]
    fn distributions_sum_to_one() {
        let resolver = resolver();
        for champion in ["Flexy", "Viego", "Garen", "NeverHeardOfHer"] {
            let probs = resolver.probabilities(champion, &BTreeSet::new());
            let total = probs.values().sum::<Probability>();
            assert!(probs.is_empty() || (total - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn noise_roles_are_dropped() {
        let resolver = resolver();
        let probs = resolver.probabilities("Viego", &BTreeSet::new());
        assert!(probs.get(&Role::Support) == None);
        assert!((probs[&Role::Jungle] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn filled_roles_filter_and_renormalize() {
        let resolver = resolver();
        let filled = BTreeSet::from([Role::Top]);
        let probs = resolver.probabilities("Flexy", &filled);
        assert!((probs[&Role::Mid] - 1.0).abs() < 1e-9);
        let filled = BTreeSet::from([Role::Top, Role::Mid]);
        assert!(resolver.probabilities("Flexy", &filled).is_empty());
    }

    #[test]
    fn canonical_role_fallback_is_deterministic() {
        let resolver = resolver();
        let probs = resolver.probabilities("Garen", &BTreeSet::new());
        assert!(probs == BTreeMap::from([(Role::Top, 1.0)]));
        // primary role taken: no flex data means nowhere else to go
        let filled = BTreeSet::from([Role::Top]);
        assert!(resolver.probabilities("Garen", &filled).is_empty());
    }

    #[test]
    fn tournament_rescue_filters_noise_share() {
        let mut knowledge = knowledge();
        let mut table = TournamentTable::default();
        table.champions.insert(
            "Zaahen".to_string(),
            TournamentEntry {
                priority: 0.4,
                roles: [
                    (Role::Top, TournamentRole { picks: 27, winrate: 0.55, adjusted: None }),
                    (Role::Support, TournamentRole { picks: 1, winrate: 0.5, adjusted: None }),
                ]
                .into_iter()
                .collect(),
            },
        );
        knowledge.tournament = Arc::new(table);
        let resolver = FlexResolver::from(Arc::new(knowledge));
        let probs = resolver.probabilities("Zaahen", &BTreeSet::new());
        assert!(probs == BTreeMap::from([(Role::Top, 1.0)]));
    }

    #[test]
    fn unknown_champion_takes_default_order() {
        let resolver = resolver();
        let probs = resolver.probabilities("NeverHeardOfHer", &BTreeSet::new());
        assert!(probs == BTreeMap::from([(Role::Mid, 1.0)]));
        let filled = BTreeSet::from([Role::Mid, Role::Bot]);
        let probs = resolver.probabilities("NeverHeardOfHer", &filled);
        assert!(probs == BTreeMap::from([(Role::Top, 1.0)]));
    }

    #[test]
    fn flexiness_needs_two_surviving_roles() {
        let resolver = resolver();
        assert!(resolver.is_flex("Flexy"));
        assert!(!resolver.is_flex("Viego"));
        assert!(!resolver.is_flex("Garen"));
    }

    #[test]
    fn finalize_is_a_bijection() {
        let mut knowledge = knowledge();
        knowledge.history.insert(
            "Sejuani".to_string(),
            RoleHistory {
                canonical: Some(Role::Jungle),
                ..RoleHistory::default()
            },
        );
        knowledge.history.insert(
            "Kalista".to_string(),
            RoleHistory {
                canonical: Some(Role::Bot),
                ..RoleHistory::default()
            },
        );
        knowledge.history.insert(
            "Rell".to_string(),
            RoleHistory {
                canonical: Some(Role::Support),
                ..RoleHistory::default()
            },
        );
        let resolver = FlexResolver::from(Arc::new(knowledge));
        let picks = vec![
            "Flexy".to_string(),
            "Sejuani".to_string(),
            "Garen".to_string(),
            "Kalista".to_string(),
            "Rell".to_string(),
        ];
        let assignments = resolver.finalize(&picks);
        assert!(assignments.len() == 5);
        let roles = assignments.iter().map(|(r, _)| *r).collect::<BTreeSet<_>>();
        let champs = assignments.iter().map(|(_, c)| c.clone()).collect::<BTreeSet<_>>();
        assert!(roles.len() == 5);
        assert!(champs.len() == 5);
        // the single-role top laner takes top, pushing the flex onto mid
        assert!(assignments.iter().any(|(r, c)| *r == Role::Top && c == "Garen"));
        assert!(assignments.iter().any(|(r, c)| *r == Role::Mid && c == "Flexy"));
    }
}
