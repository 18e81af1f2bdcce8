use crate::schemas::ExpenseSummary;

/// Closes the prompt; the model's answer starts after its last occurrence.
pub const ADVICE_MARKER: &str = "Financial Advice:";

const INSTRUCTIONS: &str = "You are a financial expert. Analyze the user's expenses and provide a \
practical, detailed, and creative savings tip. The tip should be personalized based on their \
spending habits. Make it engaging and helpful.";

pub fn build_prompt(expenses: &[ExpenseSummary]) -> Result<String, serde_json::Error> {
    let expenses = serde_json::to_string(expenses)?;
    Ok(format!(
        "{INSTRUCTIONS}\n\nUser's Expenses: {expenses}\n\n{ADVICE_MARKER}"
    ))
}

pub fn extract_tip(generated: &str) -> &str {
    let answer = match generated.rfind(ADVICE_MARKER) {
        Some(start) => &generated[start + ADVICE_MARKER.len()..],
        None => generated,
    };
    answer.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_renders_empty_list() {
        let prompt = build_prompt(&[]).unwrap();
        assert!(prompt.starts_with("You are a financial expert."));
        assert!(prompt.contains("\n\nUser's Expenses: []\n\n"));
        assert!(prompt.ends_with(ADVICE_MARKER));
    }

    #[test]
    fn expenses_are_listed_in_order() {
        let prompt = build_prompt(&[
            ExpenseSummary {
                amount: Some(12.5),
                category: Some("food".into()),
            },
            ExpenseSummary {
                amount: Some(40.0),
                category: None,
            },
        ])
        .unwrap();
        assert!(prompt.contains(
            r#"User's Expenses: [{"amount":12.5,"category":"food"},{"amount":40.0,"category":null}]"#
        ));
    }

    #[test]
    fn tip_follows_last_marker() {
        let generated = format!("{} Save more by cooking at home.", build_prompt(&[]).unwrap());
        assert_eq!(extract_tip(&generated), "Save more by cooking at home.");
        assert_eq!(
            extract_tip("Financial Advice: a Financial Advice:  Skip takeout.\n"),
            "Skip takeout."
        );
    }

    #[test]
    fn text_without_marker_is_only_trimmed() {
        assert_eq!(extract_tip("  No tip generated.  "), "No tip generated.");
        assert_eq!(extract_tip("Financial Advice:"), "");
    }
}
