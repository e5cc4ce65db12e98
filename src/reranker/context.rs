use super::result::DraftContext;
use crate::analysis::Archetype;
use crate::analysis::ArchetypeService;
use crate::analysis::SeriesContext;
use crate::draft::Player;
use crate::draft::Role;
use crate::knowledge::Knowledge;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt::Write;
use std::sync::Arc;

/// assembles the local-knowledge briefing that rides with every prompt:
/// the enemy's detected direction, synergies worth disrupting or
/// completing, counter-archetype champions, and truncated player pools.
pub struct ContextBuilder {
    knowledge: Arc<Knowledge>,
    archetypes: ArchetypeService,
}

impl From<Arc<Knowledge>> for ContextBuilder {
    fn from(knowledge: Arc<Knowledge>) -> Self {
        Self {
            archetypes: ArchetypeService::from(knowledge.clone()),
            knowledge,
        }
    }
}

// role inference over the candidate pre-filter
impl ContextBuilder {
    /// every role a champion can plausibly occupy, for the pre-filter
    pub fn viable_roles(&self, champion: &str) -> BTreeSet<Role> {
        self.knowledge
            .history
            .get(champion)
            .map(|history| history.viable_roles())
            .unwrap_or_default()
    }

    /// (role -> champion holding it, roles still open) for a pick list
    pub fn roles_filled(&self, picks: &[String]) -> (BTreeMap<Role, String>, BTreeSet<Role>) {
        let mut filled = BTreeMap::new();
        for pick in picks {
            if let Some(primary) = self.knowledge.history.get(pick).and_then(|h| h.primary()) {
                filled.entry(primary).or_insert_with(|| pick.clone());
            }
        }
        let unfilled = Role::all()
            .iter()
            .filter(|role| !filled.contains_key(role))
            .copied()
            .collect();
        (filled, unfilled)
    }

    /// strong available champions for a role, by pro-play presence
    pub fn available_by_role(
        &self,
        role: Role,
        taken: &BTreeSet<String>,
        limit: usize,
    ) -> Vec<String> {
        let mut ranked = self
            .knowledge
            .history
            .iter()
            .filter(|(champion, _)| !taken.contains(*champion))
            .filter(|(_, history)| {
                history.primary() == Some(role) || history.viable_roles().contains(&role)
            })
            .map(|(champion, history)| {
                let rate = history.win_rate.unwrap_or(0.5);
                (champion.clone(), history.presence * (0.5 + rate))
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);
        ranked.into_iter().map(|(champion, _)| champion).collect()
    }
}

// archetype direction
impl ContextBuilder {
    /// archetypes that win into the given one, per the effectiveness matrix
    pub fn counter_archetypes(&self, enemy: Archetype) -> Vec<Archetype> {
        Archetype::all()
            .iter()
            .filter(|ours| self.archetypes.effectiveness(**ours, enemy) > 1.0)
            .copied()
            .collect()
    }

    fn detected_strategy(&self, picks: &[String]) -> String {
        let team = self.archetypes.team(picks);
        let Some(primary) = team.primary else {
            return "Unclear direction".to_string();
        };
        let secondary = team
            .secondary
            .filter(|tag| team.scores.get(tag).copied().unwrap_or(0.0) > 0.2);
        match (primary, secondary) {
            (Archetype::Engage, Some(Archetype::Teamfight)) => "Wombo combo / hard engage teamfight",
            (Archetype::Engage, Some(Archetype::Pick)) => "Aggressive dive / assassination",
            (Archetype::Teamfight, Some(Archetype::Protect)) => "Front-to-back teamfight with carry",
            (Archetype::Protect, Some(Archetype::Teamfight)) => "Protect-the-carry / scaling",
            (Archetype::Split, Some(Archetype::Pick)) => "1-3-1 split with pick threat",
            (Archetype::Split, Some(Archetype::Teamfight)) => "Flexible scaling with split option",
            (Archetype::Pick, Some(Archetype::Engage)) => "Pick into engage / snowball comp",
            (Archetype::Teamfight, Some(Archetype::Engage)) => "Teamfight focused with engage tools",
            _ => return format!("{}-focused composition", capitalized(primary)),
        }
        .to_string()
    }
}

// synergy opportunities
impl ContextBuilder {
    /// curated synergies our picks could still complete
    fn completions(&self, picks: &[String]) -> Vec<(String, String, Vec<String>)> {
        let owned = picks.iter().cloned().collect::<BTreeSet<_>>();
        let mut opportunities = Vec::new();
        for synergy in &self.knowledge.curated_synergies {
            let members = synergy.champions.iter().cloned().collect::<BTreeSet<_>>();
            let have = members.intersection(&owned).cloned().collect::<Vec<_>>();
            let need = members.difference(&owned).cloned().collect::<Vec<_>>();
            if !have.is_empty() && !need.is_empty() {
                for champion in need {
                    opportunities.push((champion, synergy.id.clone(), have.clone()));
                }
            }
        }
        opportunities.truncate(10);
        opportunities
    }

    /// synergies the enemy is building that a ban could break
    fn disruptions(&self, enemy_picks: &[String]) -> Vec<(String, String)> {
        let owned = enemy_picks.iter().cloned().collect::<BTreeSet<_>>();
        let mut targets = Vec::new();
        for synergy in &self.knowledge.curated_synergies {
            let members = synergy.champions.iter().cloned().collect::<BTreeSet<_>>();
            let have = members.intersection(&owned).count();
            if have == 0 {
                continue;
            }
            for champion in members.difference(&owned) {
                targets.push((champion.clone(), synergy.description.clone()));
            }
        }
        targets.truncate(5);
        targets
    }
}

// the assembled briefing
impl ContextBuilder {
    pub fn strategic(
        &self,
        context: &DraftContext,
        our_players: &[Player],
        enemy_players: &[Player],
    ) -> String {
        let mut out = String::new();

        if !context.enemy_picks.is_empty() {
            let team = self.archetypes.team(&context.enemy_picks);
            let _ = writeln!(out, "## Enemy Draft Analysis");
            let _ = writeln!(
                out,
                "Detected strategy: {}",
                self.detected_strategy(&context.enemy_picks)
            );
            if let Some(primary) = team.primary {
                let _ = writeln!(out, "Primary archetype: {}", primary);
                let counters = self.counter_archetypes(primary);
                if !counters.is_empty() {
                    let names = counters
                        .iter()
                        .map(|a| a.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    let _ = writeln!(out, "Counter archetypes: {}", names);
                }
            }
            let disruptions = self.disruptions(&context.enemy_picks);
            if !disruptions.is_empty() {
                let _ = writeln!(out, "\n## Enemy Synergies to Disrupt (ban targets)");
                for (champion, description) in disruptions.iter().take(3) {
                    let _ = writeln!(out, "- {}: blocks {}", champion, description);
                }
            }
        }

        if !context.our_picks.is_empty() {
            let _ = writeln!(out, "\n## Our Draft Direction");
            let _ = writeln!(
                out,
                "Current strategy: {}",
                self.detected_strategy(&context.our_picks)
            );
            let completions = self.completions(&context.our_picks);
            if !completions.is_empty() {
                let _ = writeln!(out, "\n## Synergy Completion Opportunities");
                for (champion, id, have) in completions.iter().take(4) {
                    let _ = writeln!(
                        out,
                        "- {}: completes {} with {}",
                        champion,
                        id.replace('_', " "),
                        have.join(", ")
                    );
                }
            }
        }

        if !context.enemy_picks.is_empty() {
            if let Some(primary) = self.archetypes.team(&context.enemy_picks).primary {
                let mut lines = Vec::new();
                for counter in self.counter_archetypes(primary).into_iter().take(2) {
                    let mut champions = self
                        .knowledge
                        .archetypes
                        .iter()
                        .filter_map(|(champion, tags)| {
                            tags.get(&counter).map(|score| (champion.clone(), *score))
                        })
                        .filter(|(_, score)| *score >= 0.7)
                        .collect::<Vec<_>>();
                    champions
                        .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                    let names = champions
                        .into_iter()
                        .take(5)
                        .map(|(champion, _)| champion)
                        .collect::<Vec<_>>();
                    if !names.is_empty() {
                        lines.push(format!("- {} counters enemy: {}", counter, names.join(", ")));
                    }
                }
                if !lines.is_empty() {
                    let _ = writeln!(out, "\n## Counter-Archetype Champions");
                    for line in lines {
                        let _ = writeln!(out, "{}", line);
                    }
                }
            }
        }

        let pools = self.player_pools(our_players, enemy_players);
        if !pools.is_empty() {
            let _ = writeln!(out, "\n## Player Pools (secondary consideration)");
            // keep the strategy sections in front; pools are a tiebreaker
            for line in pools.lines().take(8) {
                let _ = writeln!(out, "{}", line);
            }
        }

        match out.trim().is_empty() {
            true => self.fallback_context(context),
            false => out,
        }
    }

    fn player_pools(&self, our_players: &[Player], enemy_players: &[Player]) -> String {
        let mut out = String::new();
        if self.knowledge.proficiencies.is_empty() {
            return out;
        }
        if !enemy_players.is_empty() {
            let _ = writeln!(out, "Enemy player champion pools (ban targets):");
            for player in enemy_players {
                let _ = writeln!(out, "- {}", self.pool_line(player));
            }
        }
        if !our_players.is_empty() {
            let _ = writeln!(out, "Our player champion pools (pick options):");
            for player in our_players {
                let _ = writeln!(out, "- {}", self.pool_line(player));
            }
        }
        out
    }

    fn pool_line(&self, player: &Player) -> String {
        let role = player
            .role
            .map(|r| r.as_str())
            .unwrap_or("unknown");
        let Some(pool) = self.knowledge.proficiencies.get(&player.name) else {
            return format!("{} ({}): no proficiency data", player.name, role);
        };
        let mut champions = pool.iter().collect::<Vec<_>>();
        champions.sort_by(|a, b| {
            b.1.games_weighted
                .partial_cmp(&a.1.games_weighted)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let listed = champions
            .into_iter()
            .take(5)
            .map(|(champion, entry)| {
                format!(
                    "{} ({}g, {:.0}% WR)",
                    champion,
                    entry.games_raw as usize,
                    entry.win_rate * 100.0
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} ({}): {}", player.name, role, listed)
    }

    fn fallback_context(&self, context: &DraftContext) -> String {
        format!(
            "Meta context for patch {}: prioritize contested flex champions, \
             strong blind picks, and known player comfort. No local data was \
             available for this matchup.",
            context.patch
        )
    }
}

/// series history section, empty string when no previous games exist
pub fn series_section(series: Option<&SeriesContext>) -> String {
    let Some(series) = series.filter(|s| s.is_available()) else {
        return String::new();
    };
    let mut out = String::new();
    let _ = writeln!(out, "## Series Context");
    let _ = writeln!(out, "- Game {} of series", series.game_number);
    let _ = writeln!(
        out,
        "- Series score: Blue {} - {} Red",
        series.score.0, series.score.1
    );
    let _ = writeln!(out, "\n### Previous Games");
    for game in &series.games {
        let _ = writeln!(
            out,
            "Game {} ({} won): blue [{}] vs red [{}], bans blue [{}] red [{}]",
            game.game_number,
            game.winner,
            game.blue_comp.join(", "),
            game.red_comp.join(", "),
            game.blue_bans.join(", "),
            game.red_bans.join(", ")
        );
    }
    let mut tendencies = |title: &str, t: &crate::analysis::Tendencies| {
        if t.prioritized.is_empty() && t.first_picks.is_empty() && t.banned_against.is_empty() {
            return;
        }
        let _ = writeln!(out, "\n### {}", title);
        if !t.prioritized.is_empty() {
            let _ = writeln!(out, "- Priority picks: {}", t.prioritized.join(", "));
        }
        if !t.first_picks.is_empty() {
            let _ = writeln!(out, "- First pick patterns: {}", t.first_picks.join(", "));
        }
        if !t.banned_against.is_empty() {
            let _ = writeln!(out, "- Bans received: {}", t.banned_against.join(", "));
        }
    };
    tendencies("Our Tendencies (observed in series)", &series.ours);
    tendencies("Enemy Tendencies (observed in series)", &series.enemies);
    out
}

fn capitalized(archetype: Archetype) -> String {
    let s = archetype.as_str();
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::GameResult;
    use crate::draft::Side;

    #[test]
    fn empty_series_renders_nothing() {
        assert!(series_section(None).is_empty());
        let series = SeriesContext::build(1, &[], Side::Blue);
        assert!(series_section(Some(&series)).is_empty());
    }

    #[test]
    fn series_section_lists_games() {
        let results = vec![GameResult {
            game_number: 1,
            winner: Side::Blue,
            blue_comp: vec!["Azir".into()],
            red_comp: vec!["Rumble".into()],
            blue_bans: vec![],
            red_bans: vec![],
        }];
        let series = SeriesContext::build(2, &results, Side::Blue);
        let section = series_section(Some(&series));
        assert!(section.contains("Game 2 of series"));
        assert!(section.contains("Azir"));
        assert!(section.contains("Blue 1 - 0 Red"));
    }
}
