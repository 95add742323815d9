use ahash::AHashMap;
use daachorse::{
    CharwiseDoubleArrayAhoCorasick, CharwiseDoubleArrayAhoCorasickBuilder,
    MatchKind as DoubleArrayAhoCorasickMatchKind,
};
use nohash_hasher::IntSet;

use crate::error::Result;
use crate::token::{Token, join_tokens};

/// A single-alphabet dictionary index: one Aho-Corasick automaton over the
/// words' joined token surfaces plus a reverse token map.
///
/// Words whose token sequences join to the same surface (pinyin homophones,
/// typically) share one automaton pattern, so patterns are deduplicated at
/// build time and each pattern id fans out to the word ids it covers.
///
/// Candidate generation unions three sources:
/// - automaton hits: words whose whole surface occurs inside the query,
/// - reverse-map hits: words sharing at least one token with the query,
/// - the length window: words whose token count differs from the query's by
///   at most `max_distance`.
///
/// The length window alone already covers every word that can score within
/// `max_distance`, so the set is complete; the first two sources are the
/// cheap recall paths that keep the common case from degenerating into a
/// full scan when callers tighten the window.
#[derive(Clone)]
pub(crate) struct TokenIndex {
    automaton: Option<CharwiseDoubleArrayAhoCorasick<u32>>,
    pattern_word_ids: Vec<Vec<u32>>,
    token_word_ids: AHashMap<String, Vec<u32>>,
    word_token_counts: Vec<u32>,
}

impl TokenIndex {
    /// Builds the index over one token sequence per word, indexed by word id.
    pub(crate) fn build(token_sequences: &[&[Token]]) -> Result<Self> {
        let mut pattern_id_map: AHashMap<&str, u32> =
            AHashMap::with_capacity(token_sequences.len());
        let mut pattern_list: Vec<String> = Vec::with_capacity(token_sequences.len());
        let mut pattern_word_ids: Vec<Vec<u32>> = Vec::with_capacity(token_sequences.len());
        let mut token_word_ids: AHashMap<String, Vec<u32>> = AHashMap::default();
        let mut word_token_counts = Vec::with_capacity(token_sequences.len());

        let joined_surfaces: Vec<String> = token_sequences
            .iter()
            .map(|tokens| join_tokens(tokens))
            .collect();

        for (word_id, (tokens, joined)) in
            token_sequences.iter().zip(joined_surfaces.iter()).enumerate()
        {
            let word_id = word_id as u32;

            match pattern_id_map.get(joined.as_str()) {
                Some(&pattern_id) => pattern_word_ids[pattern_id as usize].push(word_id),
                None => {
                    pattern_id_map.insert(joined.as_str(), pattern_list.len() as u32);
                    pattern_list.push(joined.clone());
                    pattern_word_ids.push(vec![word_id]);
                }
            }

            for token in tokens.iter() {
                let word_ids = token_word_ids.entry(token.as_str().to_owned()).or_default();
                // Word ids arrive in order, so repeated tokens within one
                // word dedupe against the list tail.
                if word_ids.last() != Some(&word_id) {
                    word_ids.push(word_id);
                }
            }

            word_token_counts.push(tokens.len() as u32);
        }

        let automaton = if pattern_list.is_empty() {
            None
        } else {
            Some(
                CharwiseDoubleArrayAhoCorasickBuilder::new()
                    .match_kind(DoubleArrayAhoCorasickMatchKind::Standard)
                    .build_with_values(
                        pattern_list.iter().map(|pattern| pattern.as_str()).zip(0u32..),
                    )?,
            )
        };

        Ok(TokenIndex {
            automaton,
            pattern_word_ids,
            token_word_ids,
            word_token_counts,
        })
    }

    /// Word ids whose whole token surface occurs as a contiguous infix of the
    /// query's token sequence.
    pub(crate) fn search(&self, query_tokens: &[Token]) -> IntSet<u32> {
        let mut word_id_set = IntSet::default();
        let Some(automaton) = &self.automaton else {
            return word_id_set;
        };
        let joined = join_tokens(query_tokens);
        for mat in automaton.find_overlapping_iter(&joined) {
            for &word_id in &self.pattern_word_ids[mat.value() as usize] {
                word_id_set.insert(word_id);
            }
        }
        word_id_set
    }

    /// Every word id that could score within `max_distance` of the query,
    /// plus the automaton and shared-token hits.
    pub(crate) fn candidates(&self, query_tokens: &[Token], max_distance: usize) -> IntSet<u32> {
        if query_tokens.is_empty() {
            return IntSet::default();
        }

        let mut candidate_ids = self.search(query_tokens);

        for token in query_tokens {
            if let Some(word_ids) = self.token_word_ids.get(token.as_str()) {
                candidate_ids.extend(word_ids.iter().copied());
            }
        }

        let query_len = query_tokens.len();
        for (word_id, &token_count) in self.word_token_counts.iter().enumerate() {
            if (token_count as usize).abs_diff(query_len) <= max_distance {
                candidate_ids.insert(word_id as u32);
            }
        }

        candidate_ids
    }
}
