//! Quiz question generation.
//!
//! Builds one prompt from a bounded excerpt of the document and splits the
//! model's reply on blank lines. Whatever the model writes between blank
//! lines becomes a [`Question`]; nothing checks that it is one.

use anyhow::Result;

use crate::llm::LanguageModel;
use crate::models::{Chunk, Question};

/// Join chunk texts with blank lines and keep the first `max_chars` characters.
///
/// The cut is a hard character cutoff, not aligned to chunk boundaries.
pub fn build_excerpt(chunks: &[Chunk], max_chars: usize) -> String {
    let joined = chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    joined.chars().take(max_chars).collect()
}

pub fn question_prompt(excerpt: &str, count: usize) -> String {
    format!(
        r#"
Here is some document content:

"""
{excerpt}
"""

Please generate {count} clear quiz questions based ONLY on this content.
If possible, make some questions multiple-choice with options labeled A), B), C), D).
List questions separated by blank lines.
"#
    )
}

/// Split a raw model reply into questions on blank-line boundaries.
pub fn parse_questions(response: &str) -> Vec<Question> {
    response
        .trim()
        .split("\n\n")
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| Question(q.to_string()))
        .collect()
}

/// Ask `model` for `count` questions about `excerpt`.
///
/// The result may hold more or fewer than `count` questions; an empty list
/// means the model produced nothing usable.
pub async fn generate_questions(
    model: &dyn LanguageModel,
    excerpt: &str,
    count: usize,
) -> Result<Vec<Question>> {
    let response = model.invoke(&question_prompt(excerpt, count)).await?;
    let questions = parse_questions(&response);
    tracing::info!(
        requested = count,
        parsed = questions.len(),
        "generated questions"
    );
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedModel {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        fn model_name(&self) -> &str {
            "canned"
        }

        async fn invoke(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    fn chunk(text: &str) -> Chunk {
        Chunk {
            id: String::new(),
            page: 0,
            chunk_index: 0,
            text: text.to_string(),
            hash: String::new(),
        }
    }

    #[test]
    fn test_excerpt_joins_with_blank_lines() {
        let excerpt = build_excerpt(&[chunk("one"), chunk("two")], 3500);
        assert_eq!(excerpt, "one\n\ntwo");
    }

    #[test]
    fn test_excerpt_hard_cutoff() {
        let excerpt = build_excerpt(&[chunk("abcdef"), chunk("ghijkl")], 8);
        assert_eq!(excerpt, "abcdef\n\n");
        let excerpt = build_excerpt(&[chunk("abcdef"), chunk("ghijkl")], 10);
        assert_eq!(excerpt, "abcdef\n\ngh");
    }

    #[test]
    fn test_excerpt_counts_chars_not_bytes() {
        let excerpt = build_excerpt(&[chunk("ééééé")], 3);
        assert_eq!(excerpt, "ééé");
    }

    #[test]
    fn test_prompt_contains_excerpt_and_count() {
        let prompt = question_prompt("The mitochondria is the powerhouse.", 7);
        assert!(prompt.contains("\"\"\"\nThe mitochondria is the powerhouse.\n\"\"\""));
        assert!(prompt.contains("generate 7 clear quiz questions"));
        assert!(prompt.contains("A), B), C), D)"));
        assert!(prompt.contains("separated by blank lines"));
    }

    #[test]
    fn test_parse_splits_on_blank_lines() {
        let reply = "\n1. What is X?\n\n2. Which is Y?\nA) a\nB) b\nC) c\nD) d\n\n\n\n3. Why Z?  \n";
        let questions = parse_questions(reply);
        assert_eq!(
            questions,
            vec![
                Question("1. What is X?".to_string()),
                Question("2. Which is Y?\nA) a\nB) b\nC) c\nD) d".to_string()),
                Question("3. Why Z?".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_keeps_non_questions() {
        let questions = parse_questions("Sure! Here are your questions:\n\nWhat is X?");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text(), "Sure! Here are your questions:");
    }

    #[test]
    fn test_parse_empty_reply() {
        assert!(parse_questions("").is_empty());
        assert!(parse_questions("  \n\n \n\n").is_empty());
    }

    #[tokio::test]
    async fn test_generate_single_call() {
        let model = CannedModel {
            reply: "Q one?\n\nQ two?".to_string(),
            prompts: Mutex::new(Vec::new()),
        };
        let questions = generate_questions(&model, "some text", 10).await.unwrap();
        assert_eq!(questions.len(), 2);
        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("some text"));
        assert!(prompts[0].contains("generate 10 clear"));
    }
}
