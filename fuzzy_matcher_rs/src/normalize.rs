use ahash::AHashSet;
use pinyin::ToPinyin;
use unicode_segmentation::UnicodeSegmentation;

use crate::token::Token;

mod constants;

/// Converts text into a canonical ordered sequence of syllable tokens.
///
/// Three classes of grapheme are distinguished:
///
/// - Han characters are read through the pinyin dictionary; a character with
///   several readings yields its first canonical one. The tone digit is kept
///   at the end of the syllable unless `ignore_tones` is set.
/// - Runs of ASCII letters are case-folded and segmented into syllables by
///   greedy longest-prefix match against the standard syllable inventory, so
///   a romanized query like `beijing` lines up with the readings of `北京`.
///   A position where no syllable matches consumes a single letter. When
///   tones are kept, a digit `1`-`5` attaches to the syllable it follows.
/// - Anything else passes through unchanged as a grapheme token.
///
/// Empty input yields an empty sequence; any other input yields at least one
/// token.
///
/// # Example
///
/// ```
/// use fuzzy_matcher_rs::{PinyinNormalizer, Token};
///
/// let normalizer = PinyinNormalizer::new(true);
/// assert_eq!(
///     normalizer.normalize("北京"),
///     vec![Token::syllable("bei"), Token::syllable("jing")],
/// );
/// assert_eq!(
///     normalizer.normalize("beijing"),
///     vec![Token::syllable("bei"), Token::syllable("jing")],
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PinyinNormalizer {
    ignore_tones: bool,
    syllable_set: AHashSet<&'static str>,
    max_syllable_len: usize,
}

impl PinyinNormalizer {
    pub fn new(ignore_tones: bool) -> Self {
        let syllable_set: AHashSet<&'static str> = constants::SYLLABLES
            .trim()
            .lines()
            .collect();
        let max_syllable_len = syllable_set.iter().map(|s| s.len()).max().unwrap_or(0);

        PinyinNormalizer {
            ignore_tones,
            syllable_set,
            max_syllable_len,
        }
    }

    pub fn ignore_tones(&self) -> bool {
        self.ignore_tones
    }

    /// Normalizes `text` into its pinyin token sequence.
    pub fn normalize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut letter_run = String::new();

        for grapheme in text.graphemes(true) {
            if let Some(reading) = self.han_reading(grapheme) {
                self.flush_letter_run(&mut letter_run, &mut tokens);
                tokens.push(Token::Syllable(reading));
                continue;
            }

            let mut chars = grapheme.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => {
                    letter_run.push(c.to_ascii_lowercase());
                }
                (Some(c), None)
                    if !self.ignore_tones && ('1'..='5').contains(&c) && !letter_run.is_empty() =>
                {
                    letter_run.push(c);
                }
                _ => {
                    self.flush_letter_run(&mut letter_run, &mut tokens);
                    tokens.push(Token::grapheme(grapheme));
                }
            }
        }
        self.flush_letter_run(&mut letter_run, &mut tokens);

        tokens
    }

    /// First canonical reading of a single-codepoint Han grapheme, or `None`
    /// for anything the dictionary cannot romanize.
    fn han_reading(&self, grapheme: &str) -> Option<String> {
        let mut chars = grapheme.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let reading = c.to_pinyin()?;
        let syllable = if self.ignore_tones {
            reading.plain()
        } else {
            reading.with_tone_num_end()
        };
        Some(syllable.replace('ü', "v"))
    }

    /// Greedy longest-prefix segmentation of a romanized letter run.
    fn flush_letter_run(&self, letter_run: &mut String, tokens: &mut Vec<Token>) {
        if letter_run.is_empty() {
            return;
        }

        let run = letter_run.as_str();
        let mut start = 0;
        while start < run.len() {
            let mut matched_len = 0;
            let upper = self.max_syllable_len.min(run.len() - start);
            for len in (1..=upper).rev() {
                if self.syllable_set.contains(&run[start..start + len]) {
                    matched_len = len;
                    break;
                }
            }
            // No syllable starts here; a lone letter keeps the walk moving.
            if matched_len == 0 {
                matched_len = 1;
            }

            let mut end = start + matched_len;
            if !self.ignore_tones
                && run[end..].starts_with(|c: char| ('1'..='5').contains(&c))
            {
                end += 1;
            }
            tokens.push(Token::syllable(&run[start..end]));
            start = end;
        }

        letter_run.clear();
    }
}
