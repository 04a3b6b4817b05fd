//! Reading time estimation

use serde::Serialize;

/// Words per minute used when the configured rate is zero
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

/// Estimated reading time of a piece of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingTime {
    pub words: usize,
    pub minutes: f64,
    /// Display text, e.g. "3 min read"
    pub text: String,
}

impl ReadingTime {
    /// Keep the word count but display an author-supplied text
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.trim().to_string();
        self
    }
}

/// Estimate how long `text` takes to read at `words_per_minute`
///
/// The displayed minutes round the exact value to two decimals, then up to
/// the next whole minute.
pub fn reading_time(text: &str, words_per_minute: usize) -> ReadingTime {
    let wpm = if words_per_minute == 0 {
        DEFAULT_WORDS_PER_MINUTE
    } else {
        words_per_minute
    };

    let words = count_words(text);
    let minutes = words as f64 / wpm as f64;
    let displayed = ((minutes * 100.0).round() / 100.0).ceil() as u64;

    ReadingTime {
        words,
        minutes,
        text: format!("{} min read", displayed),
    }
}

/// Count words in text
///
/// A word is a run of letters or digits, which may contain inner apostrophes
/// or hyphens ("K'é", "well-being"). Each CJK ideograph counts as one word.
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if is_cjk(c) {
            count += 1;
            in_word = false;
        } else if c.is_alphanumeric() {
            if !in_word {
                in_word = true;
                count += 1;
            }
        } else if in_word && matches!(c, '\'' | '’' | '-') {
            // Joiners only continue a word when a letter follows
            let continues = chars
                .peek()
                .map(|next| next.is_alphanumeric() && !is_cjk(*next))
                .unwrap_or(false);
            in_word = continues;
        } else {
            in_word = false;
        }
    }

    count
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{3040}'..='\u{30FF}'
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{F900}'..='\u{FAFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Hello world"), 2);
        assert_eq!(count_words("## Protect *what* matters."), 3);
        assert_eq!(count_words("K'é and well-being"), 3);
        assert_eq!(count_words("Diné Bizaad"), 2);
        assert_eq!(count_words("trailing- dash"), 2);
        assert_eq!(count_words("保险很好"), 4);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let text = "word ".repeat(210);
        let rt = reading_time(&text, 200);
        assert_eq!(rt.words, 210);
        assert_eq!(rt.text, "2 min read");

        let rt = reading_time(&"word ".repeat(200), 200);
        assert_eq!(rt.text, "1 min read");
    }

    #[test]
    fn test_reading_time_tiny_post() {
        // 1 word at 200 wpm is 0.005 minutes, which rounds to 0.01 and up to 1
        assert_eq!(reading_time("hello", 200).text, "1 min read");
        assert_eq!(reading_time("", 200).text, "0 min read");
    }

    #[test]
    fn test_zero_wpm_uses_default() {
        let rt = reading_time(&"word ".repeat(400), 0);
        assert_eq!(rt.text, "2 min read");
    }

    #[test]
    fn test_with_text_override() {
        let rt = reading_time("a b c", 200).with_text(" 7 min read ");
        assert_eq!(rt.words, 3);
        assert_eq!(rt.text, "7 min read");
    }
}
