//! Devanagari normalization and Hindi sentence splitting

use std::collections::HashSet;
use std::sync::LazyLock;

const DANDA: char = '\u{0964}';
const DOUBLE_DANDA: char = '\u{0965}';
const VISARGA: char = '\u{0903}';

/// Characters that end a sentence
const DELIMITERS: [char; 5] = ['.', '?', '!', DANDA, DOUBLE_DANDA];

/// Tokens that keep a following `.` inside the sentence: Hindi spellings of
/// Latin letter names (as in "बी.ए.") and common titles.
static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "ए", "बी", "सी", "डी", "ई", "एफ", "जी", "एच", "आई", "जे", "के", "एल", "एम", "एन", "ओ",
        "पी", "क्यू", "आर", "एस", "टी", "यू", "वी", "डब्ल्यू", "एक्स", "वाई",
        "ज\u{093C}ेड", "जेड", "डॉ", "श्री", "प्रो", "सं", "पृ",
    ]
    .into_iter()
    .collect()
});

/// Hindi sentence segmenter
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter;

impl Segmenter {
    pub fn new() -> Self {
        Self
    }

    /// Canonicalize Devanagari variants:
    /// - drop ZWJ / ZWNJ
    /// - chandra A (ॲ) becomes ए
    /// - precomposed Devanagari letters (the nukta forms) are canonically
    ///   decomposed into base + nukta
    /// - `|` becomes danda, `।।` becomes `॥`
    /// - an ASCII colon after a Devanagari letter becomes visarga
    /// - curly quotes become straight quotes
    pub fn normalize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut prev: Option<char> = None;

        for c in text.chars() {
            match c {
                '\u{200C}' | '\u{200D}' => continue,
                '\u{0972}' => out.push('\u{090F}'),
                c if is_devanagari(c) => {
                    unicode_normalization::char::decompose_canonical(c, |d| out.push(d))
                }
                '|' => out.push(DANDA),
                ':' if prev.is_some_and(is_devanagari) => out.push(VISARGA),
                '\u{201C}' | '\u{201D}' => out.push('"'),
                '\u{2018}' | '\u{2019}' => out.push('\''),
                _ => out.push(c),
            }
            prev = Some(c);
        }

        out.replace("\u{0964}\u{0964}", "\u{0965}")
    }

    /// Normalize and split into sentences, in source order.
    ///
    /// The returned iterator is lazy and can be restarted by cloning it
    /// before consumption or calling [`Sentences::rewind`].
    pub fn split(&self, text: &str) -> Sentences {
        Sentences {
            text: self.normalize(text),
            pos: 0,
        }
    }
}

fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// Lazy sequence of sentences over normalized text
#[derive(Debug, Clone)]
pub struct Sentences {
    text: String,
    pos: usize,
}

impl Sentences {
    /// Start again from the first sentence
    pub fn rewind(&mut self) {
        self.pos = 0;
    }
}

impl Iterator for Sentences {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.pos < self.text.len() {
            let rest = &self.text[self.pos..];
            let end = sentence_end(rest);
            let sentence = rest[..end].trim();
            self.pos += end;
            if !sentence.is_empty() {
                return Some(sentence.to_string());
            }
        }
        None
    }
}

/// Byte offset just past the first sentence in `text`, including any run
/// of consecutive delimiters. The whole length when no boundary exists.
fn sentence_end(text: &str) -> usize {
    let mut chars = text.char_indices().peekable();
    let mut prev: Option<char> = None;

    while let Some((i, c)) = chars.next() {
        if DELIMITERS.contains(&c) && !is_inner_delimiter(&text[..i], c, prev) {
            let mut end = i + c.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if !DELIMITERS.contains(&next) {
                    break;
                }
                end = j + next.len_utf8();
                chars.next();
            }
            return end;
        }
        prev = Some(c);
    }

    text.len()
}

/// A delimiter right after a digit, or a `.` ending an abbreviation
fn is_inner_delimiter(before: &str, c: char, prev: Option<char>) -> bool {
    if prev.is_some_and(char::is_numeric) {
        return true;
    }
    if c != '.' {
        return false;
    }

    let word = before
        .rsplit(|ch: char| ch.is_whitespace() || ch == '.')
        .next()
        .unwrap_or("");
    !word.is_empty() && (word.chars().count() == 1 || ABBREVIATIONS.contains(word))
}
