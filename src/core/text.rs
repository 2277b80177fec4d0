// ClassDesk - core/text.rs
//
// Word counting and word-limit trimming for free-text fields.

/// Result of `trim_to_words`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trimmed {
    pub text: String,
    pub truncated: bool,
}

/// Byte spans `(start, end)` of each whitespace-separated word.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep at most `max` words of `text`.
///
/// Text within the limit is returned unchanged (including trailing
/// whitespace). Longer text is cut right after the last kept word, so the
/// whitespace between kept words is preserved exactly.
pub fn trim_to_words(text: &str, max: usize) -> Trimmed {
    let spans = word_spans(text);
    if spans.len() <= max {
        return Trimmed {
            text: text.to_string(),
            truncated: false,
        };
    }
    let end = match max {
        0 => 0,
        n => spans[n - 1].1,
    };
    Trimmed {
        text: text[..end].to_string(),
        truncated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count(" one  two\nthree\t"), 3);
    }

    #[test]
    fn test_short_text_is_untouched() {
        let t = trim_to_words("Intro to  algebra ", 5);
        assert_eq!(t.text, "Intro to  algebra ");
        assert!(!t.truncated);
    }

    #[test]
    fn test_exact_limit_is_untouched() {
        let t = trim_to_words("a b c", 3);
        assert_eq!(t.text, "a b c");
        assert!(!t.truncated);
    }

    #[test]
    fn test_long_text_keeps_inner_whitespace() {
        let t = trim_to_words("Weekly  lab\nreports are due Friday", 3);
        assert_eq!(t.text, "Weekly  lab\nreports");
        assert!(t.truncated);
        assert_eq!(word_count(&t.text), 3);
    }

    #[test]
    fn test_leading_whitespace_and_unicode() {
        let t = trim_to_words("  café über naïve résumé", 2);
        assert_eq!(t.text, "  café über");
        assert!(t.truncated);
    }

    #[test]
    fn test_zero_limit() {
        let t = trim_to_words("anything", 0);
        assert_eq!(t.text, "");
        assert!(t.truncated);
    }
}
