use super::picks::PickRecommendation;
use crate::draft::Role;
use std::collections::BTreeMap;

/// supplemental view bucketing the ranked picks by suggested role,
/// a couple per role, for late-draft role filling in the UI
#[derive(Debug, Clone, Default)]
pub struct RoleGrouped {
    pub roles: BTreeMap<Role, Vec<PickRecommendation>>,
}

impl RoleGrouped {
    pub fn from_picks(picks: &[PickRecommendation], limit_per_role: usize) -> Self {
        let mut roles = BTreeMap::<Role, Vec<PickRecommendation>>::new();
        for pick in picks {
            let bucket = roles.entry(pick.suggested_role).or_default();
            if bucket.len() < limit_per_role {
                bucket.push(pick.clone());
            }
        }
        Self { roles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::picks::PickComponents;

    fn pick(champion: &str, role: Role, score: f64) -> PickRecommendation {
        PickRecommendation {
            champion: champion.to_string(),
            score,
            base_score: score,
            synergy_multiplier: 1.0,
            confidence: 0.8,
            suggested_role: role,
            components: PickComponents::default(),
            flag: None,
            reasons: Vec::new(),
            proficiency_player: None,
        }
    }

    #[test]
    fn buckets_cap_per_role() {
        let picks = vec![
            pick("Azir", Role::Mid, 0.9),
            pick("Orianna", Role::Mid, 0.8),
            pick("Taliyah", Role::Mid, 0.7),
            pick("Rumble", Role::Top, 0.6),
        ];
        let grouped = RoleGrouped::from_picks(&picks, 2);
        assert!(grouped.roles[&Role::Mid].len() == 2);
        assert!(grouped.roles[&Role::Mid][0].champion == "Azir");
        assert!(grouped.roles[&Role::Top].len() == 1);
    }
}
