/// Returned when no sentence fits the word budget
pub const NO_SUMMARY: &str = "Unable to generate summary.";

/// Multiplier for sentences in the leading share of the text
pub const LEAD_BOOST: f64 = 1.5;
/// Leading share, as a fraction of ten, that receives the boost
pub const LEAD_SHARE_TENTHS: usize = 3;

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Deterministic API-free summary: pick the longest sentences, favouring the
/// opening ones, until the word budget is spent, then restore reading order.
pub fn extractive_summary(text: &str, max_words: usize) -> String {
    let sentences: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect();

    if sentences.len() <= 3 {
        return text.to_string();
    }

    let lead_cutoff = sentences.len() * LEAD_SHARE_TENTHS / 10;

    let mut scored: Vec<(f64, usize, &str)> = sentences
        .iter()
        .enumerate()
        .map(|(position, sentence)| {
            let mut score = word_count(sentence) as f64;
            if position < lead_cutoff {
                score *= LEAD_BOOST;
            }
            (score, position, *sentence)
        })
        .collect();

    // Highest score first; ties go to the later sentence
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(b.1.cmp(&a.1)));

    let mut selected: Vec<(usize, &str)> = Vec::new();
    let mut used = 0;
    for (_, position, sentence) in scored {
        let words = word_count(sentence);
        if used + words <= max_words {
            selected.push((position, sentence));
            used += words;
        }
    }

    if selected.is_empty() {
        return NO_SUMMARY.to_string();
    }

    selected.sort_by_key(|(position, _)| *position);
    let summary = selected
        .iter()
        .map(|(_, sentence)| *sentence)
        .collect::<Vec<_>>()
        .join(". ");

    format!("{}.", summary)
}
