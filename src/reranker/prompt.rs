use super::context::ContextBuilder;
use super::result::Candidate;
use super::result::DraftContext;
use crate::draft::Player;
use crate::session::DraftMode;
use std::collections::BTreeSet;
use std::fmt::Write;

/// which flavor of prompt a decision point needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickSituation {
    /// nothing revealed yet: blind-pick safety rules
    FirstPick,
    /// the enemy has shown more than we have: countering is live
    Responding,
    /// phase two, full information
    LateDraft,
}

fn situation(context: &DraftContext) -> PickSituation {
    if !context.phase.is_first() {
        return PickSituation::LateDraft;
    }
    if context.enemy_picks.is_empty() {
        PickSituation::FirstPick
    } else if context.our_picks.len() < context.enemy_picks.len() || context.our_picks.is_empty() {
        PickSituation::Responding
    } else {
        PickSituation::FirstPick
    }
}

/// fixed instruction the chat API receives as the system message
pub const SYSTEM_PROMPT: &str =
    "You are a League of Legends esports draft analyst. Respond only with valid JSON.";

const OUTPUT_SCHEMA: &str = r#"## Output (respond ONLY with valid JSON, no markdown)
{
  "reranked": [
    {"champion": "Name (MUST be from the candidates above)", "original_rank": 1, "new_rank": 1,
     "confidence": 0.85, "reasoning": "why", "strategic_factors": ["factor"]}
  ],
  "additional_suggestions": [
    {"champion": "Name (NOT in the candidates)", "role": "mid", "for_player": "Player",
     "reasoning": "why", "confidence": 0.6}
  ],
  "draft_analysis": "one-paragraph assessment"
}"#;

const RERANK_RULES: &str = "## Rules\n\
1. \"reranked\" MUST only reorder the candidates listed above; never add new champions to it.\n\
2. \"additional_suggestions\" is for champions NOT in the candidate list.";

/// builds the user prompt for a pick decision, keyed on draft phase
pub fn pick_prompt(
    builder: &ContextBuilder,
    candidates: &[Candidate],
    context: &DraftContext,
    our_players: &[Player],
    enemy_players: &[Player],
    series: &str,
) -> String {
    let strategic = builder.strategic(context, our_players, enemy_players);
    let mut out = String::new();
    match context.phase.is_first() {
        true => {
            let _ = writeln!(
                out,
                "You are an expert League of Legends professional draft analyst. \
                 This is PHASE 1 - early draft where information is limited."
            );
        }
        false => {
            let _ = writeln!(
                out,
                "You are an expert League of Legends professional draft analyst. Your PRIMARY \
                 goal is to identify picks that COUNTER the enemy's draft strategy or COMPLETE \
                 powerful team compositions."
            );
        }
    }
    push_state(&mut out, context);
    push_fearless(&mut out, context);

    match situation(context) {
        PickSituation::FirstPick => {
            let _ = writeln!(
                out,
                "\n## Pick Context: BLIND PICK\n\
                 No enemy picks to counter yet. Prioritize, in order: champions that are hard \
                 to counter, flex value that hides information, meta power, and safe laning. \
                 Avoid easily counterable or niche picks."
            );
        }
        PickSituation::Responding => {
            let _ = writeln!(
                out,
                "\n## Pick Context: RESPONDING TO ENEMY PICKS\n\
                 Enemy has picked: {}. Counter-picks to revealed champions are live; balance \
                 countering against becoming counterable yourself.",
                context.enemy_picks.join(", ")
            );
        }
        PickSituation::LateDraft => {
            let (filled, unfilled) = builder.roles_filled(&context.our_picks);
            if !unfilled.is_empty() {
                let filled_names = filled
                    .iter()
                    .map(|(role, champion)| format!("{}: {}", role, champion))
                    .collect::<Vec<_>>()
                    .join(", ");
                let open = unfilled
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(
                    out,
                    "\n## Our Role Status (prioritize picks for unfilled roles)\n\
                     - Filled: {}\n- NEED TO FILL: {}",
                    match filled_names.is_empty() {
                        true => "none".to_string(),
                        false => filled_names,
                    },
                    open
                );
            }
            let _ = writeln!(
                out,
                "\n## Pick Context: LATE DRAFT\n\
                 Full information available. Complete our composition, counter the enemy comp, \
                 and finish our synergies, in that order."
            );
        }
    }

    if !series.is_empty() {
        let _ = writeln!(out, "\n{}", series);
    }
    let _ = writeln!(out, "\n## Strategic Analysis\n{}", strategic);
    push_available(&mut out, builder, context, our_players);
    let _ = writeln!(out, "\n## Algorithm Recommendations\n{}", pick_candidates(candidates));
    match context.phase.is_first() {
        true => {
            let _ = writeln!(
                out,
                "\n## PHASE 1 PICK PRIORITIES (in order)\n\
                 1. META POWER - must-pick champions dominating the patch\n\
                 2. BLIND PICK SAFETY - few hard counters, safe laning\n\
                 3. FLEX VALUE - hides information, respects multiple positions\n\
                 4. PLAYER COMFORT - signature champions at high win rate\n\
                 5. COUNTER POTENTIAL - only against revealed enemy picks"
            );
        }
        false => {
            let _ = writeln!(
                out,
                "\n## PRIORITY RANKING (in order)\n\
                 1. COUNTER ENEMY STRATEGY - what archetype are they building, what beats it\n\
                 2. COMPLETE SYNERGIES - finish combos with our existing picks\n\
                 3. DISRUPT ENEMY WIN CONDITION - deny their key champion or combo\n\
                 4. META POWER - currently strong pro-play champions\n\
                 5. PLAYER COMFORT - tiebreaker only"
            );
        }
    }
    let _ = writeln!(out, "\n{}\n\n{}", RERANK_RULES, OUTPUT_SCHEMA);
    out
}

/// builds the user prompt for a ban decision, keyed on draft phase
pub fn ban_prompt(
    builder: &ContextBuilder,
    candidates: &[Candidate],
    context: &DraftContext,
    our_players: &[Player],
    enemy_players: &[Player],
    series: &str,
) -> String {
    let strategic = builder.strategic(context, our_players, enemy_players);
    let mut out = String::new();
    match context.phase.is_first() {
        true => {
            let _ = writeln!(
                out,
                "You are an expert League of Legends professional draft analyst. \
                 This is BAN PHASE 1 - early bans before any picks."
            );
        }
        false => {
            let _ = writeln!(
                out,
                "You are an expert League of Legends professional draft analyst. Your PRIMARY \
                 goal is to DISRUPT the enemy's draft strategy and DENY their win conditions."
            );
        }
    }
    push_state(&mut out, context);
    push_fearless(&mut out, context);

    if !context.phase.is_first() {
        let (filled, unfilled) = builder.roles_filled(&context.enemy_picks);
        if !filled.is_empty() {
            let filled_names = filled
                .iter()
                .map(|(role, champion)| format!("{}: {}", role, champion))
                .collect::<Vec<_>>()
                .join(", ");
            let open = match unfilled.is_empty() {
                true => "none".to_string(),
                false => unfilled
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            let _ = writeln!(
                out,
                "\n## Enemy Role Status (CRITICAL)\n\
                 Enemy has already picked: {}.\n\
                 Enemy still needs: {}.\n\
                 ONLY recommend bans for champions that can play the roles they still need; \
                 banning a champion for a role they already filled is WASTED.",
                filled_names, open
            );
        }
    }

    if !series.is_empty() {
        let _ = writeln!(out, "\n{}", series);
    }
    let _ = writeln!(out, "\n## Strategic Analysis\n{}", strategic);
    let _ = writeln!(out, "\n## Algorithm Ban Recommendations\n{}", ban_candidates(candidates));
    match context.phase.is_first() {
        true => {
            let _ = writeln!(
                out,
                "\n## PHASE 1 BAN PRIORITIES (in order)\n\
                 1. META POWER BANS - champions that warp the draft if left open\n\
                 2. FLEX THREAT BANS - strong multi-role champions\n\
                 3. ENEMY PLAYER TARGETING - signature and pocket picks\n\
                 4. DENY STRONG BLIND PICKS - safe laners they might first-pick"
            );
        }
        false => {
            let _ = writeln!(
                out,
                "\n## PHASE 2 BAN PRIORITIES (in order)\n\
                 1. BREAK ENEMY SYNERGIES - ban the missing piece of their combo\n\
                 2. DENY COUNTERS TO OUR COMP - what hard counters what we built\n\
                 3. REMOVE ARCHETYPE ENABLERS - the keystone of their strategy\n\
                 4. DENY FLEX AND POWER PICKS\n\
                 5. PLAYER POOLS - tiebreaker only"
            );
        }
    }
    let _ = writeln!(out, "\n{}\n\n{}", RERANK_RULES, OUTPUT_SCHEMA);
    out
}

fn push_state(out: &mut String, context: &DraftContext) {
    let _ = writeln!(
        out,
        "\n## Current Draft State\n\
         - Phase: {}\n- Patch: {}\n- Our Team: {}\n- Enemy Team: {}\n\
         - Our Picks: [{}]\n- Enemy Picks: [{}]\n- Banned: [{}]",
        context.phase,
        context.patch,
        context.our_team,
        context.enemy_team,
        context.our_picks.join(", "),
        context.enemy_picks.join(", "),
        context.banned.join(", ")
    );
}

fn push_fearless(out: &mut String, context: &DraftContext) {
    if context.mode == DraftMode::Fearless && !context.fearless_blocked.is_empty() {
        let _ = writeln!(
            out,
            "\n## FEARLESS DRAFT MODE\n\
             Champions permanently unavailable (picked in previous games): {}.\n\
             These champions CANNOT be picked or banned - do not suggest them.",
            context.fearless_blocked.join(", ")
        );
    }
}

fn push_available(
    out: &mut String,
    builder: &ContextBuilder,
    context: &DraftContext,
    our_players: &[Player],
) {
    let (_, unfilled) = builder.roles_filled(&context.our_picks);
    if unfilled.is_empty() {
        return;
    }
    let taken = context
        .banned
        .iter()
        .chain(&context.our_picks)
        .chain(&context.enemy_picks)
        .cloned()
        .collect::<BTreeSet<_>>();
    let mut lines = Vec::new();
    for role in &unfilled {
        let available = builder.available_by_role(*role, &taken, 8);
        if available.is_empty() {
            continue;
        }
        let player = our_players
            .iter()
            .find(|p| p.role == Some(*role))
            .map(|p| p.name.as_str())
            .unwrap_or("TBD");
        lines.push(format!("{} (for {}): {}", role, player, available.join(", ")));
    }
    if !lines.is_empty() {
        let _ = writeln!(out, "\n## Available Champions by Role (Top Meta Picks)");
        for line in lines {
            let _ = writeln!(out, "- {}", line);
        }
    }
}

fn pick_candidates(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .take(15)
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}. {} (role: {}, score: {:.3}, player: {})\n   Components: {}\n   Reasons: {}",
                i + 1,
                c.champion,
                c.role.map(|r| r.as_str()).unwrap_or("?"),
                c.score,
                c.proficiency_player.as_deref().unwrap_or("unknown"),
                components(c),
                c.reasons.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn ban_candidates(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .take(15)
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}. {} (priority: {:.3}, target: {})\n   Components: {}\n   Reasons: {}",
                i + 1,
                c.champion,
                c.score,
                c.target_player.as_deref().unwrap_or("general"),
                components(c),
                c.reasons.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn components(candidate: &Candidate) -> String {
    candidate
        .components
        .iter()
        .map(|(name, value)| format!("{}:{:.2}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Phase;
    use crate::knowledge::Knowledge;
    use std::path::Path;
    use std::sync::Arc;

    fn context(phase: Phase) -> DraftContext {
        DraftContext {
            phase,
            patch: "15.18".to_string(),
            our_team: "T1".to_string(),
            enemy_team: "GEN".to_string(),
            our_picks: vec!["Orianna".to_string()],
            enemy_picks: vec!["Rumble".to_string(), "Sejuani".to_string()],
            banned: vec!["Azir".to_string()],
            mode: DraftMode::Fearless,
            fearless_blocked: vec!["Kalista".to_string()],
        }
    }

    fn candidate(name: &str) -> Candidate {
        Candidate {
            champion: name.to_string(),
            score: 0.7,
            role: None,
            target_player: None,
            proficiency_player: None,
            components: Default::default(),
            reasons: vec!["Solid overall pick".to_string()],
        }
    }

    #[test]
    fn phase_one_pick_prompt_emphasizes_blind_safety() {
        let builder = ContextBuilder::from(Arc::new(Knowledge::load(Path::new("/nonexistent"))));
        let prompt = pick_prompt(
            &builder,
            &[candidate("Vi")],
            &context(Phase::PickOne),
            &[],
            &[],
            "",
        );
        assert!(prompt.contains("PHASE 1 PICK PRIORITIES"));
        assert!(prompt.contains("BLIND PICK SAFETY"));
        assert!(prompt.contains("FEARLESS DRAFT MODE"));
        assert!(prompt.contains("Kalista"));
        assert!(prompt.contains("respond ONLY with valid JSON"));
    }

    #[test]
    fn phase_two_ban_prompt_emphasizes_disruption() {
        let builder = ContextBuilder::from(Arc::new(Knowledge::load(Path::new("/nonexistent"))));
        let prompt = ban_prompt(
            &builder,
            &[candidate("Poppy")],
            &context(Phase::BanTwo),
            &[],
            &[],
            "",
        );
        assert!(prompt.contains("BREAK ENEMY SYNERGIES"));
        assert!(prompt.contains("Algorithm Ban Recommendations"));
        assert!(prompt.contains("Poppy"));
    }
}
