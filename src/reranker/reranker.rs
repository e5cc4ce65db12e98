use super::client::LlmClient;
use super::context::ContextBuilder;
use super::context::series_section;
use super::extract::extract_json;
use super::prompt::SYSTEM_PROMPT;
use super::prompt::ban_prompt;
use super::prompt::pick_prompt;
use super::result::AdditionalSuggestion;
use super::result::Candidate;
use super::result::DraftContext;
use super::result::RerankedRecommendation;
use super::result::RerankerResult;
use crate::analysis::SeriesContext;
use crate::draft::Player;
use crate::knowledge::Knowledge;
use std::collections::BTreeMap;
use std::sync::Arc;

/// post-processor that asks a language model to refine the algorithmic
/// top candidates into a final order. side-effect free: it never mutates
/// pipeline state, and no failure of any kind crosses the session
/// boundary; the fallback preserves the algorithm's ranking.
pub struct Reranker {
    builder: ContextBuilder,
    client: LlmClient,
}

impl Reranker {
    pub fn new(knowledge: Arc<Knowledge>, api_key: &str, timeout_seconds: Option<f64>) -> Self {
        Self {
            builder: ContextBuilder::from(knowledge),
            client: LlmClient::new(api_key, timeout_seconds),
        }
    }
}

// reranking entry points
impl Reranker {
    pub async fn rerank_picks(
        &self,
        candidates: &[Candidate],
        context: &DraftContext,
        our_players: &[Player],
        enemy_players: &[Player],
        limit: usize,
        series: Option<&SeriesContext>,
    ) -> RerankerResult {
        let filtered = self.filter_by_filled_roles(candidates, &context.our_picks);
        let prompt = pick_prompt(
            &self.builder,
            &filtered,
            context,
            our_players,
            enemy_players,
            &series_section(series),
        );
        self.run(candidates, &filtered, &prompt, limit).await
    }

    pub async fn rerank_bans(
        &self,
        candidates: &[Candidate],
        context: &DraftContext,
        our_players: &[Player],
        enemy_players: &[Player],
        limit: usize,
        series: Option<&SeriesContext>,
    ) -> RerankerResult {
        let filtered = self.filter_by_filled_roles(candidates, &context.enemy_picks);
        let prompt = ban_prompt(
            &self.builder,
            &filtered,
            context,
            our_players,
            enemy_players,
            &series_section(series),
        );
        self.run(candidates, &filtered, &prompt, limit).await
    }

    async fn run(
        &self,
        originals: &[Candidate],
        filtered: &[Candidate],
        prompt: &str,
        limit: usize,
    ) -> RerankerResult {
        match self.client.chat(SYSTEM_PROMPT, prompt).await {
            Err(e) => {
                log::warn!("llm reranking failed: {}", e);
                fallback(originals, limit, &e.to_string())
            }
            Ok(content) => match self.parse(&content, filtered, limit) {
                Ok(result) => result,
                Err(e) => {
                    log::warn!("llm response rejected: {}", e);
                    fallback(originals, limit, &e.to_string())
                }
            },
        }
    }
}

// candidate pre-filter
impl Reranker {
    /// drops candidates whose every viable role is already filled on the
    /// relevant team. flex champions survive if any unfilled role is
    /// viable; champions with no role data are kept. if the filter would
    /// remove everything, the unfiltered list is used instead.
    fn filter_by_filled_roles(&self, candidates: &[Candidate], picks: &[String]) -> Vec<Candidate> {
        if picks.is_empty() {
            return candidates.to_vec();
        }
        let (filled, unfilled) = self.builder.roles_filled(picks);
        if filled.is_empty() {
            return candidates.to_vec();
        }
        let kept = candidates
            .iter()
            .filter(|candidate| {
                let roles = self.builder.viable_roles(&candidate.champion);
                roles.is_empty() || roles.iter().any(|role| unfilled.contains(role))
            })
            .cloned()
            .collect::<Vec<_>>();
        match kept.is_empty() {
            true => candidates.to_vec(),
            false => kept,
        }
    }
}

// response validation
impl Reranker {
    fn parse(
        &self,
        content: &str,
        candidates: &[Candidate],
        limit: usize,
    ) -> anyhow::Result<RerankerResult> {
        let data = extract_json(content)?;
        let Some(items) = data.get("reranked").and_then(|v| v.as_array()) else {
            return Err(anyhow::anyhow!("missing 'reranked' key in response"));
        };

        let originals = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (c.champion.to_lowercase(), (i + 1, c.score)))
            .collect::<BTreeMap<_, _>>();

        let mut reranked = Vec::new();
        for (index, item) in items.iter().take(limit).enumerate() {
            let Some(champion) = item.get("champion").and_then(|v| v.as_str()) else {
                continue;
            };
            if champion.is_empty() {
                continue;
            }
            let (original_rank, original_score) = originals
                .get(&champion.to_lowercase())
                .copied()
                .unwrap_or((99, 0.0));
            reranked.push(RerankedRecommendation {
                champion: champion.to_string(),
                original_rank,
                new_rank: item
                    .get("new_rank")
                    .and_then(|v| v.as_u64())
                    .map(|v| v as usize)
                    .unwrap_or(index + 1),
                original_score,
                confidence: item
                    .get("confidence")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.5),
                reasoning: item
                    .get("reasoning")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                strategic_factors: strings(item.get("strategic_factors")),
            });
        }
        if reranked.is_empty() {
            return Err(anyhow::anyhow!("no valid reranked items in response"));
        }

        let mut additional = Vec::new();
        for item in data
            .get("additional_suggestions")
            .and_then(|v| v.as_array())
            .into_iter()
            .flatten()
        {
            let Some(champion) = item.get("champion").and_then(|v| v.as_str()) else {
                continue;
            };
            if champion.is_empty() {
                continue;
            }
            additional.push(AdditionalSuggestion {
                champion: champion.to_string(),
                reasoning: item
                    .get("reasoning")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                confidence: item
                    .get("confidence")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.5),
                role: item
                    .get("role")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                for_player: item
                    .get("for_player")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
            });
        }

        Ok(RerankerResult {
            reranked,
            additional_suggestions: additional,
            draft_analysis: data
                .get("draft_analysis")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// the algorithm's order, untouched, when the model cannot help
pub fn fallback(candidates: &[Candidate], limit: usize, error: &str) -> RerankerResult {
    let summary = error.chars().take(50).collect::<String>();
    RerankerResult {
        reranked: candidates
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, candidate)| RerankedRecommendation {
                champion: candidate.champion.clone(),
                original_rank: i + 1,
                new_rank: i + 1,
                original_score: candidate.score,
                confidence: 0.5,
                reasoning: "(using algorithm ranking)".to_string(),
                strategic_factors: Vec::new(),
            })
            .collect(),
        additional_suggestions: Vec::new(),
        draft_analysis: format!("LLM unavailable ({}). Using algorithm rankings.", summary),
    }
}

fn strings(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Score;
    use std::path::Path;

    fn candidates() -> Vec<Candidate> {
        ["Rumble", "Poppy", "Aurora", "Vi", "Rakan", "Sylas"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| Candidate {
                champion: name.to_string(),
                score: 0.9 - i as Score * 0.1,
                role: None,
                target_player: None,
                proficiency_player: None,
                components: BTreeMap::new(),
                reasons: Vec::new(),
            })
            .collect()
    }

    fn reranker() -> Reranker {
        let knowledge = Arc::new(Knowledge::load(Path::new("/nonexistent")));
        Reranker::new(knowledge, "test-key", None)
    }

    #[test]
    fn fallback_preserves_order_and_labels() {
        let result = fallback(&candidates(), 5, "This is not JSON at all");
        assert!(result.reranked.len() == 5);
        for (i, item) in result.reranked.iter().enumerate() {
            assert!(item.original_rank == i + 1);
            assert!(item.new_rank == i + 1);
            assert!(item.confidence == 0.5);
            assert!(item.reasoning.contains("algorithm"));
        }
        assert!(result.reranked[0].champion == "Rumble");
        assert!(result.additional_suggestions.is_empty());
        assert!(result.draft_analysis.contains("This is not JSON"));
    }

    #[test]
    fn parse_maps_original_ranks_case_insensitively() {
        let reranker = reranker();
        let content = r#"{
            "reranked": [
                {"champion": "poppy", "new_rank": 1, "confidence": 0.8, "reasoning": "meta"},
                {"champion": "RUMBLE", "new_rank": 2, "confidence": 0.7, "reasoning": "synergy"}
            ],
            "additional_suggestions": [
                {"champion": "Malphite", "reasoning": "combo option", "confidence": 0.6, "role": "top"}
            ],
            "draft_analysis": "engage focus"
        }"#;
        let result = reranker.parse(content, &candidates(), 5).unwrap();
        assert!(result.reranked.len() == 2);
        assert!(result.reranked[0].champion == "poppy");
        assert!(result.reranked[0].original_rank == 2);
        assert!(result.reranked[1].original_rank == 1);
        assert!(result.additional_suggestions.len() == 1);
        assert!(result.additional_suggestions[0].champion == "Malphite");
        assert!(result.draft_analysis == "engage focus");
    }

    #[test]
    fn unknown_champion_gets_sentinel_rank() {
        let reranker = reranker();
        let content = r#"{"reranked": [{"champion": "Teemo", "new_rank": 1}]}"#;
        let result = reranker.parse(content, &candidates(), 5).unwrap();
        assert!(result.reranked[0].original_rank == 99);
        assert!(result.reranked[0].original_score == 0.0);
    }

    #[test]
    fn non_json_is_an_error_not_a_panic() {
        let reranker = reranker();
        assert!(reranker.parse("This is not JSON at all", &candidates(), 5).is_err());
        assert!(reranker.parse("{\"reranked\": []}", &candidates(), 5).is_err());
        assert!(reranker.parse("{\"other\": 1}", &candidates(), 5).is_err());
    }
}
