use crate::Score;
use crate::draft::Role;
use crate::knowledge::Knowledge;
use std::sync::Arc;

/// penalizes wrong-phase targeting: spending an early ban on a role that
/// is usually drafted late wastes leverage. multipliers come from observed
/// P(role | phase) against a uniform 20% baseline and never exceed one.
pub struct RolePhaseScorer(Arc<Knowledge>);

const UNIFORM: Score = 0.20;

impl From<Arc<Knowledge>> for RolePhaseScorer {
    fn from(knowledge: Arc<Knowledge>) -> Self {
        Self(knowledge)
    }
}

impl RolePhaseScorer {
    /// pick-phase multiplier in (0, 1], keyed by how many picks both sides
    /// have completed. missing tables are neutral.
    pub fn multiplier(&self, role: Role, total_picks: usize) -> Score {
        let Some(rates) = self.0.role_phase.get(&role) else {
            return 1.0;
        };
        let rate = match total_picks {
            0..=2 => rates.early_p1,
            3..=5 => rates.late_p1,
            _ => rates.p2,
        };
        match rate {
            Some(rate) if rate > 0.0 => (rate / UNIFORM).min(1.0),
            _ => 1.0,
        }
    }

    /// bans pay a softer penalty since the enemy's pick timing is unknown
    pub fn ban_multiplier(&self, role: Role, total_picks: usize) -> Score {
        self.multiplier(role, total_picks).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::PhaseRates;
    use std::path::Path;

    fn scorer() -> RolePhaseScorer {
        let mut knowledge = Knowledge::load(Path::new("/nonexistent"));
        knowledge.role_phase.insert(
            Role::Support,
            PhaseRates {
                early_p1: Some(0.05),
                late_p1: Some(0.18),
                p2: Some(0.32),
            },
        );
        RolePhaseScorer::from(Arc::new(knowledge))
    }

    #[test]
    fn early_support_is_penalized() {
        let scorer = scorer();
        assert!((scorer.multiplier(Role::Support, 0) - 0.25).abs() < 1e-9);
        assert!((scorer.multiplier(Role::Support, 4) - 0.9).abs() < 1e-9);
        assert!(scorer.multiplier(Role::Support, 7) == 1.0);
    }

    #[test]
    fn ban_penalty_is_softer() {
        let scorer = scorer();
        let pick = scorer.multiplier(Role::Support, 0);
        let ban = scorer.ban_multiplier(Role::Support, 0);
        assert!(ban > pick);
        assert!((ban - pick.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn unknown_role_is_neutral() {
        let scorer = scorer();
        assert!(scorer.multiplier(Role::Mid, 0) == 1.0);
        assert!(scorer.ban_multiplier(Role::Mid, 0) == 1.0);
    }
}
