//! Shared utilities for channel implementations.

/// Room reserved on every chunk for the "(i/n) " counter prefix.
const COUNTER_RESERVE: usize = 8;

/// Split a long reply into chunks that respect a platform's character
/// limit, prefixing each with a "(i/n) " counter.
///
/// Splits prefer the nearest whitespace boundary before the limit, and
/// all slice boundaries back off to UTF-8 char boundaries so multi-byte
/// content (accents, CJK, emoji) never panics. Text that already fits
/// is returned as a single unprefixed chunk.
pub fn split_chunks(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let budget = max_len.saturating_sub(COUNTER_RESERVE).max(1);
    let mut pieces: Vec<&str> = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + budget).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let break_at = if end < text.len() {
            text[start..end]
                .rfind(|c: char| c.is_whitespace())
                .map(|i| start + i + 1)
                .unwrap_or(end)
        } else {
            end
        };
        let piece = text[start..break_at].trim();
        if !piece.is_empty() {
            pieces.push(piece);
        }
        start = break_at;
    }

    let total = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| format!("({}/{total}) {piece}", i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        let chunks = split_chunks("hello world", 500);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_530_chars_on_500_limit_splits_into_two() {
        let word = "abcd ";
        let text = word.repeat(106); // 530 chars
        let chunks = split_chunks(text.trim_end(), 500);
        assert_eq!(chunks.len(), 2);
        for chunk in &chunks {
            assert!(chunk.len() <= 500, "chunk exceeds limit: {}", chunk.len());
        }
        assert!(chunks[0].starts_with("(1/2) "));
        assert!(chunks[1].starts_with("(2/2) "));
        // Counter plus payload stays within the reserved budget.
        assert!(chunks[0].len() <= 500);
    }

    #[test]
    fn test_split_lands_on_whitespace_boundary() {
        let text = format!("{} {}", "a".repeat(480), "b".repeat(40));
        let chunks = split_chunks(&text, 500);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].ends_with(&"a".repeat(480)));
        assert!(chunks[1].ends_with(&"b".repeat(40)));
    }

    #[test]
    fn test_unbroken_run_falls_back_to_hard_split() {
        let text = "x".repeat(600);
        let chunks = split_chunks(&text, 500);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() <= 500));
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let text = "é".repeat(300); // 600 bytes
        let chunks = split_chunks(&text, 500);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.len() <= 500);
            // Slicing mid-char would have panicked inside split_chunks;
            // also confirm the payload survived intact.
            let payload = chunk.split_once(") ").unwrap().1;
            assert!(payload.chars().all(|c| c == 'é'));
        }
    }
}
