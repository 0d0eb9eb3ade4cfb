// Offline lead-sentence summarizer, used for development and when no
// inference endpoint is reachable.

use async_trait::async_trait;

use super::{GenerationParams, Summarizer, SummarizerError};

pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    /// Keep whole leading sentences while the word count stays within
    /// `max_words`. A single over-long first sentence is cut at `max_words`.
    pub fn lead_sentences(text: &str, max_words: usize) -> String {
        let mut taken: Vec<String> = Vec::new();
        let mut word_count = 0;

        for sentence in split_sentences(text) {
            let words: Vec<&str> = sentence.split_whitespace().collect();
            if taken.is_empty() && words.len() > max_words {
                taken.push(words[..max_words].join(" "));
                break;
            }
            if word_count + words.len() > max_words {
                break;
            }
            word_count += words.len();
            taken.push(words.join(" "));
        }

        taken.join(" ")
    }
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            let end = idx + c.len_utf8();
            let at_boundary = text[end..].chars().next().map_or(true, char::is_whitespace);
            if at_boundary {
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String, SummarizerError> {
        Ok(Self::lead_sentences(text, params.max_length as usize))
    }
}
