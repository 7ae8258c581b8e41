//! Prompt templates for batch labeling and parsing of model replies

use serde_json::Value;

use crate::error::{Error, Result};

/// Prompt builder for batch labeling
pub struct LabelPrompt;

impl LabelPrompt {
    /// Build a prompt asking for one label per text, in order
    pub fn build(instructions: &str, texts: &[String]) -> String {
        let mut items = String::new();
        for (i, text) in texts.iter().enumerate() {
            // Keep one item per line so numbering stays unambiguous
            let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
            items.push_str(&format!("[{}] {}\n", i + 1, flattened));
        }

        format!(
            r#"You are a text annotation assistant.

TASK:
{instructions}

RULES:
1. Produce exactly {count} labels, one for each numbered text, in the same order
2. Do not merge, skip or reorder texts
3. If a text is empty or unintelligible, label it with an empty string
4. Respond with JSON only, in the form {{"labels": ["label for [1]", "label for [2]", ...]}}

TEXTS:
{items}
JSON:"#,
            instructions = instructions.trim(),
            count = texts.len(),
            items = items,
        )
    }

    /// Extract the label list from a model reply.
    ///
    /// Accepts a bare JSON array, an object with a `labels` array, or either of
    /// those embedded in surrounding prose. Non-string array items are rendered
    /// as compact JSON.
    pub fn parse_labels(reply: &str) -> Result<Vec<String>> {
        let reply = reply.trim();

        if let Ok(value) = serde_json::from_str::<Value>(reply) {
            if let Some(labels) = Self::labels_from_value(&value) {
                return Ok(labels);
            }
        }

        // Fall back to the outermost bracketed array in the reply
        if let (Some(start), Some(end)) = (reply.find('['), reply.rfind(']')) {
            if start < end {
                if let Ok(value) = serde_json::from_str::<Value>(&reply[start..=end]) {
                    if let Some(labels) = Self::labels_from_value(&value) {
                        return Ok(labels);
                    }
                }
            }
        }

        let preview: String = reply.chars().take(200).collect();
        Err(Error::labeling(format!(
            "model reply does not contain a label array: {}",
            preview
        )))
    }

    fn labels_from_value(value: &Value) -> Option<Vec<String>> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(map) => match map.get("labels") {
                Some(Value::Array(items)) => items,
                _ => return None,
            },
            _ => return None,
        };

        Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.trim().to_string(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect(),
        )
    }
}
