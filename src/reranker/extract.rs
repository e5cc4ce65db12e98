/// pulls the JSON object out of whatever shape the model wrapped it in:
/// bare JSON, fenced blocks with or without a language tag, `<think>`
/// preambles, and stray prose on either side. the final pass is a
/// brace-balanced scan that respects string boundaries and escapes.
pub fn extract_json(content: &str) -> anyhow::Result<serde_json::Value> {
    let mut content = content.trim();

    // reasoning models prefix a thinking block; keep only what follows
    if let Some(end) = content.rfind("</think>") {
        content = content[end + "</think>".len()..].trim();
    }

    // fenced code block, with or without a "json" tag
    let mut fenced = None;
    if content.contains("```") {
        for part in content.split("```") {
            let mut part = part.trim();
            if let Some(rest) = part.strip_prefix("json") {
                part = rest.trim();
            }
            if part.starts_with('{') {
                fenced = Some(part);
                break;
            }
        }
    }
    let mut content = fenced.unwrap_or(content);

    if !content.starts_with('{') {
        let start = content
            .find('{')
            .ok_or_else(|| anyhow::anyhow!("no JSON object found in response"))?;
        content = &content[start..];
    }

    let end = balanced_end(content)
        .ok_or_else(|| anyhow::anyhow!("no matching closing brace found"))?;
    Ok(serde_json::from_str(&content[..end])?)
}

/// byte offset one past the brace closing the object opened at byte zero
fn balanced_end(content: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in content.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_champion(content: &str) -> String {
        let value = extract_json(content).expect("parses");
        value["reranked"][0]["champion"]
            .as_str()
            .expect("champion string")
            .to_string()
    }

    #[test]
    fn pure_json() {
        let content = r#"{
  "reranked": [{"champion": "Rumble", "new_rank": 1, "confidence": 0.85, "reasoning": "Good synergy"}],
  "additional_suggestions": [],
  "draft_analysis": "Focus on engage"
}"#;
        assert!(first_champion(content) == "Rumble");
    }

    #[test]
    fn fenced_with_language_tag() {
        let content = "```json\n{\"reranked\": [{\"champion\": \"Poppy\", \"new_rank\": 1}]}\n```";
        assert!(first_champion(content) == "Poppy");
    }

    #[test]
    fn fenced_without_language_tag() {
        let content = "```\n{\"reranked\": [{\"champion\": \"Aurora\", \"new_rank\": 1}]}\n```";
        assert!(first_champion(content) == "Aurora");
    }

    #[test]
    fn thinking_block_is_stripped() {
        let content = "<think>\nRumble would be good because...\n{\"fake\": true}\n</think>\n\n{\"reranked\": [{\"champion\": \"Rumble\", \"new_rank\": 1}]}";
        assert!(first_champion(content) == "Rumble");
    }

    #[test]
    fn leading_prose() {
        let content = "Here is my analysis:\n\n{\"reranked\": [{\"champion\": \"Vi\", \"new_rank\": 1}]}";
        assert!(first_champion(content) == "Vi");
    }

    #[test]
    fn trailing_prose() {
        let content = "{\"reranked\": [{\"champion\": \"Rakan\", \"new_rank\": 1}]}\n\nI hope this helps!";
        assert!(first_champion(content) == "Rakan");
    }

    #[test]
    fn fenced_inside_prose() {
        let content = "Based on my analysis:\n\n```json\n{\"reranked\": [{\"champion\": \"Camille\", \"new_rank\": 1}]}\n```\n\nLet me know.";
        assert!(first_champion(content) == "Camille");
    }

    #[test]
    fn minimal_one_liner() {
        let content = r#"{"reranked":[{"champion":"Azir","new_rank":1,"confidence":0.7,"reasoning":"test"}],"additional_suggestions":[],"draft_analysis":"ok"}"#;
        assert!(first_champion(content) == "Azir");
    }

    #[test]
    fn null_and_extra_fields_survive() {
        let content = r#"{
  "thinking": "ignored",
  "reranked": [{"champion": "Syndra", "original_rank": null, "new_rank": 1, "strategic_factors": null}],
  "additional_suggestions": null,
  "meta_notes": "ignored"
}"#;
        assert!(first_champion(content) == "Syndra");
    }

    #[test]
    fn braces_inside_strings_do_not_confuse() {
        let content = r#"{"reranked": [{"champion": "Orianna", "reasoning": "wraps {the team} with \" escapes", "new_rank": 1}]}"#;
        assert!(first_champion(content) == "Orianna");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(extract_json("This is not JSON at all").is_err());
        assert!(extract_json("{\"never\": \"closed\"").is_err());
        assert!(extract_json("").is_err());
    }
}
