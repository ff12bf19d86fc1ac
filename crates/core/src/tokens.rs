//! Approximate token accounting.
//!
//! Budgets are estimated with a fixed ratio of 0.75 words per token, which
//! is close enough for Portuguese prose to keep prompts inside their limits
//! without pulling a real tokenizer into the pipeline.

/// Appended whenever a text is cut to fit a budget.
pub const TRUNCATION_MARKER: &str = "[…]";

/// Estimated tokens for `text`, rounded up.
pub fn estimate_tokens(text: &str) -> u64 {
    let words = text.split_whitespace().count() as u64;
    (words * 4).div_ceil(3)
}

/// Largest word count whose estimate stays within `budget` tokens.
pub fn words_for_budget(budget: usize) -> usize {
    budget * 3 / 4
}

/// Trim `text` from the end until it fits `budget` tokens.
///
/// The marker counts as a word, so a truncated result still fits. Text that
/// already fits is returned unchanged.
pub fn truncate_to_budget(text: &str, budget: usize) -> String {
    let max_words = words_for_budget(budget);
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() <= max_words {
        return text.trim().to_string();
    }
    if max_words == 0 {
        return String::new();
    }

    let mut kept = words[..max_words - 1].join(" ");
    if !kept.is_empty() {
        kept.push(' ');
    }
    kept.push_str(TRUNCATION_MARKER);
    kept
}
