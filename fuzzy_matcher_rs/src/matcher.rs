use std::borrow::Cow;
use std::path::PathBuf;
use std::str::FromStr;

use ahash::AHashMap;
use nohash_hasher::IntMap;
use serde::{Deserialize, Serialize};

use crate::confusion::ConfusionTable;
use crate::distance::{similarity, weighted_edit_distance_within};
use crate::error::{MatchError, Result};
use crate::index::TokenIndex;
use crate::normalize::PinyinNormalizer;
use crate::token::{Token, char_tokens};

/// The matching strategy for a single query.
///
/// - [Char](MatchMode::Char): weighted edit distance over grapheme tokens.
/// - [Pinyin](MatchMode::Pinyin): weighted edit distance over pinyin
///   syllable tokens, so homophones and romanized queries line up.
/// - [Hybrid](MatchMode::Hybrid): both rankings fused at equal weight,
///   privileging words that score in both dimensions while keeping words
///   strong in either one.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Char,
    Pinyin,
    #[default]
    Hybrid,
}

impl FromStr for MatchMode {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "char" => Ok(MatchMode::Char),
            "pinyin" => Ok(MatchMode::Pinyin),
            "hybrid" => Ok(MatchMode::Hybrid),
            other => Err(MatchError::InvalidArgument(format!(
                "unknown match mode `{other}`, expected one of `char`, `pinyin`, `hybrid`"
            ))),
        }
    }
}

/// Configuration for a [FuzzyMatcher].
///
/// # Fields
///
/// - `max_distance`: candidates with a weighted edit distance strictly
///   greater than this are discarded. Defaults to `2`.
/// - `ignore_tones`: strip tone digits from pinyin syllables. Defaults to
///   `true`.
/// - `similarity_threshold`: default similarity floor for queries, may be
///   overridden per call. Defaults to `0.0`.
/// - `char_confusion_path` / `pinyin_confusion_path`: optional JSON files of
///   substitution costs for confusable graphemes / syllables. Absent paths
///   leave the corresponding table empty, so every substitution costs `1.0`.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct MatcherConfig {
    pub max_distance: usize,
    pub ignore_tones: bool,
    pub similarity_threshold: f64,
    pub char_confusion_path: Option<PathBuf>,
    pub pinyin_confusion_path: Option<PathBuf>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            max_distance: 2,
            ignore_tones: true,
            similarity_threshold: 0.0,
            char_confusion_path: None,
            pinyin_confusion_path: None,
        }
    }
}

/// A single scored match.
///
/// `word` borrows from the matcher's dictionary; `similarity` is in
/// `[0, 1]`, `1.0` meaning the query normalizes to the exact token sequence
/// of the word under the queried mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    pub word: Cow<'a, str>,
    pub similarity: f64,
}

#[derive(Debug, Clone)]
struct WordEntry {
    word: String,
    char_tokens: Vec<Token>,
    pinyin_tokens: Vec<Token>,
}

#[derive(Clone, Copy)]
enum Alphabet {
    Char,
    Pinyin,
}

/// A fuzzy matcher over a mixed Chinese/English vocabulary.
///
/// The matcher owns a dictionary of words, each normalized twice at build
/// time: into grapheme tokens and into pinyin syllable tokens. Both forms
/// are indexed by an Aho-Corasick automaton for candidate generation, and
/// candidates are scored with a confusion-weighted edit distance. Queries
/// return the most similar words sorted by descending similarity, ties
/// broken by ascending word.
///
/// Queries take `&self` and mutations take `&mut self`; every mutation
/// reindexes eagerly, so readers always observe a fully built state and a
/// built matcher can be shared freely across threads for querying.
///
/// # Example
///
/// ```
/// use fuzzy_matcher_rs::{FuzzyMatcher, MatchMode, MatcherConfig};
///
/// let mut matcher = FuzzyMatcher::new(MatcherConfig::default()).unwrap();
/// matcher.build(&["北京", "南京"]).unwrap();
///
/// let results = matcher.match_text("beijing", MatchMode::Pinyin).unwrap();
/// assert_eq!(results[0].word, "北京");
/// assert_eq!(results[0].similarity, 1.0);
/// ```
#[derive(Clone)]
pub struct FuzzyMatcher {
    config: MatcherConfig,
    normalizer: PinyinNormalizer,
    char_confusion: ConfusionTable,
    pinyin_confusion: ConfusionTable,
    word_list: Vec<WordEntry>,
    word_id_map: AHashMap<String, u32>,
    char_index: Option<TokenIndex>,
    pinyin_index: Option<TokenIndex>,
}

impl FuzzyMatcher {
    /// Creates a matcher with no dictionary.
    ///
    /// Loads both confusion tables if their paths are configured; an
    /// unreadable or malformed file is fatal here. A configured
    /// `similarity_threshold` outside `[0, 1]` is rejected.
    pub fn new(config: MatcherConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.similarity_threshold) {
            return Err(MatchError::InvalidArgument(format!(
                "similarity_threshold must be in [0, 1], got {}",
                config.similarity_threshold
            )));
        }

        let char_confusion = match &config.char_confusion_path {
            Some(path) => ConfusionTable::from_path(path)?,
            None => ConfusionTable::new(),
        };
        let pinyin_confusion = match &config.pinyin_confusion_path {
            Some(path) => ConfusionTable::from_path(path)?,
            None => ConfusionTable::new(),
        };
        let normalizer = PinyinNormalizer::new(config.ignore_tones);

        Ok(FuzzyMatcher {
            config,
            normalizer,
            char_confusion,
            pinyin_confusion,
            word_list: Vec::new(),
            word_id_map: AHashMap::new(),
            char_index: None,
            pinyin_index: None,
        })
    }

    /// Replaces the dictionary with `words` and rebuilds both indexes.
    ///
    /// Duplicates are dropped, keeping the first occurrence; uniqueness is
    /// byte identity of the original string. Empty words are rejected. On
    /// error the matcher keeps its previous state.
    pub fn build<I>(&mut self, words: &[I]) -> Result<()>
    where
        I: AsRef<str>,
    {
        let mut word_list = Vec::with_capacity(words.len());
        let mut word_id_map = AHashMap::with_capacity(words.len());

        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                return Err(MatchError::InvalidArgument(
                    "dictionary words must be non-empty".to_owned(),
                ));
            }
            if word_id_map.contains_key(word) {
                continue;
            }
            word_id_map.insert(word.to_owned(), word_list.len() as u32);
            word_list.push(self.new_entry(word));
        }

        let (char_index, pinyin_index) = Self::build_indexes(&word_list)?;
        self.word_list = word_list;
        self.word_id_map = word_id_map;
        self.char_index = Some(char_index);
        self.pinyin_index = Some(pinyin_index);
        Ok(())
    }

    /// Matches `text` against the dictionary with the configured defaults.
    ///
    /// Equivalent to [match_text_with](FuzzyMatcher::match_text_with) with
    /// no threshold override and no result cap.
    pub fn match_text(&self, text: &str, mode: MatchMode) -> Result<Vec<MatchResult<'_>>> {
        self.match_text_with(text, mode, None, None)
    }

    /// Matches `text` against the dictionary.
    ///
    /// Returns `(word, similarity)` pairs with `similarity >= threshold`
    /// (the per-call override, or the configured default when `None`),
    /// sorted by descending similarity then ascending word, truncated to
    /// `max_results` when given. An empty query, or querying before any
    /// dictionary was built, yields an empty list.
    pub fn match_text_with(
        &self,
        text: &str,
        mode: MatchMode,
        threshold: Option<f64>,
        max_results: Option<usize>,
    ) -> Result<Vec<MatchResult<'_>>> {
        if let Some(threshold) = threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(MatchError::InvalidArgument(format!(
                    "threshold must be in [0, 1], got {threshold}"
                )));
            }
        }
        let threshold = threshold.unwrap_or(self.config.similarity_threshold);

        if text.is_empty() {
            return Ok(Vec::new());
        }

        let ranked = match mode {
            MatchMode::Char => self.rank(text, Alphabet::Char, threshold, max_results),
            MatchMode::Pinyin => self.rank(text, Alphabet::Pinyin, threshold, max_results),
            MatchMode::Hybrid => self.rank_hybrid(text, threshold, max_results),
        };

        Ok(ranked
            .into_iter()
            .map(|(word_id, similarity)| MatchResult {
                word: Cow::Borrowed(self.word_list[word_id as usize].word.as_str()),
                similarity,
            })
            .collect())
    }

    /// Whether `text` matches any dictionary word under `mode` with the
    /// configured defaults.
    pub fn is_match(&self, text: &str, mode: MatchMode) -> Result<bool> {
        Ok(!self.match_text(text, mode)?.is_empty())
    }

    /// Inserts `word` into the dictionary.
    ///
    /// Returns `Ok(true)` if it was absent and has been inserted, `Ok(false)`
    /// on a duplicate. The indexes are rebuilt before returning, so the next
    /// query already sees the word. Empty words are rejected.
    pub fn add_word(&mut self, word: &str) -> Result<bool> {
        if word.is_empty() {
            return Err(MatchError::InvalidArgument(
                "word must be non-empty".to_owned(),
            ));
        }
        if self.word_id_map.contains_key(word) {
            return Ok(false);
        }

        self.word_id_map
            .insert(word.to_owned(), self.word_list.len() as u32);
        self.word_list.push(self.new_entry(word));
        self.reindex()?;
        Ok(true)
    }

    /// Removes `word` from the dictionary.
    ///
    /// Returns `Ok(true)` if it was present, `Ok(false)` otherwise. Same
    /// reindex obligation as [add_word](FuzzyMatcher::add_word).
    pub fn remove_word(&mut self, word: &str) -> Result<bool> {
        let Some(word_id) = self.word_id_map.remove(word) else {
            return Ok(false);
        };

        self.word_list.remove(word_id as usize);
        // Ids after the removed slot shift down.
        for (word_id, entry) in self.word_list.iter().enumerate().skip(word_id as usize) {
            self.word_id_map.insert(entry.word.clone(), word_id as u32);
        }
        self.reindex()?;
        Ok(true)
    }

    /// Current dictionary size.
    pub fn word_count(&self) -> usize {
        self.word_list.len()
    }

    /// An independent snapshot of the dictionary in insertion order.
    pub fn words(&self) -> Vec<String> {
        self.word_list
            .iter()
            .map(|entry| entry.word.clone())
            .collect()
    }

    fn new_entry(&self, word: &str) -> WordEntry {
        WordEntry {
            word: word.to_owned(),
            char_tokens: char_tokens(word),
            pinyin_tokens: self.normalizer.normalize(word),
        }
    }

    fn build_indexes(word_list: &[WordEntry]) -> Result<(TokenIndex, TokenIndex)> {
        let char_sequences: Vec<&[Token]> = word_list
            .iter()
            .map(|entry| entry.char_tokens.as_slice())
            .collect();
        let pinyin_sequences: Vec<&[Token]> = word_list
            .iter()
            .map(|entry| entry.pinyin_tokens.as_slice())
            .collect();
        Ok((
            TokenIndex::build(&char_sequences)?,
            TokenIndex::build(&pinyin_sequences)?,
        ))
    }

    fn reindex(&mut self) -> Result<()> {
        let (char_index, pinyin_index) = Self::build_indexes(&self.word_list)?;
        self.char_index = Some(char_index);
        self.pinyin_index = Some(pinyin_index);
        Ok(())
    }

    /// Ranks the dictionary against `text` over one token alphabet.
    fn rank(
        &self,
        text: &str,
        alphabet: Alphabet,
        threshold: f64,
        max_results: Option<usize>,
    ) -> Vec<(u32, f64)> {
        let index = match alphabet {
            Alphabet::Char => self.char_index.as_ref(),
            Alphabet::Pinyin => self.pinyin_index.as_ref(),
        };
        let Some(index) = index else {
            return Vec::new();
        };
        let confusion = match alphabet {
            Alphabet::Char => &self.char_confusion,
            Alphabet::Pinyin => &self.pinyin_confusion,
        };
        let query_tokens = match alphabet {
            Alphabet::Char => char_tokens(text),
            Alphabet::Pinyin => self.normalizer.normalize(text),
        };
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let max_distance = self.config.max_distance as f64;
        let mut ranked = Vec::new();

        for word_id in index.candidates(&query_tokens, self.config.max_distance) {
            let entry = &self.word_list[word_id as usize];
            let entry_tokens = match alphabet {
                Alphabet::Char => &entry.char_tokens,
                Alphabet::Pinyin => &entry.pinyin_tokens,
            };
            let Some(distance) =
                weighted_edit_distance_within(&query_tokens, entry_tokens, confusion, max_distance)
            else {
                continue;
            };
            let similarity = similarity(distance, query_tokens.len(), entry_tokens.len());
            if similarity >= threshold {
                ranked.push((word_id, similarity));
            }
        }

        self.sort_ranked(&mut ranked);
        if let Some(max_results) = max_results {
            ranked.truncate(max_results);
        }
        ranked
    }

    /// Fuses the char and pinyin rankings at equal weight.
    ///
    /// Both lists are computed independently (each already truncated to
    /// `max_results`); a word missing from one side contributes `0` there,
    /// so the fused score of a word present in both is the mean of its two
    /// similarities.
    fn rank_hybrid(
        &self,
        text: &str,
        threshold: f64,
        max_results: Option<usize>,
    ) -> Vec<(u32, f64)> {
        let char_ranked = self.rank(text, Alphabet::Char, threshold, max_results);
        let pinyin_ranked = self.rank(text, Alphabet::Pinyin, threshold, max_results);

        let mut fused: IntMap<u32, f64> =
            IntMap::with_capacity_and_hasher(char_ranked.len() + pinyin_ranked.len(), Default::default());
        for &(word_id, similarity) in &char_ranked {
            fused.insert(word_id, 0.5 * similarity);
        }
        for &(word_id, similarity) in &pinyin_ranked {
            *fused.entry(word_id).or_insert(0.0) += 0.5 * similarity;
        }

        let mut ranked: Vec<(u32, f64)> = fused
            .into_iter()
            .filter(|&(_, similarity)| similarity >= threshold)
            .collect();
        self.sort_ranked(&mut ranked);
        if let Some(max_results) = max_results {
            ranked.truncate(max_results);
        }
        ranked
    }

    fn sort_ranked(&self, ranked: &mut [(u32, f64)]) {
        ranked.sort_unstable_by(|x, y| {
            y.1.total_cmp(&x.1).then_with(|| {
                self.word_list[x.0 as usize]
                    .word
                    .cmp(&self.word_list[y.0 as usize].word)
            })
        });
    }
}
