use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ahash::AHashMap;

use crate::error::{MatchError, Result};

/// A symmetric sparse table of substitution costs for confusable symbol pairs.
///
/// The table maps pairs of token surfaces to a cost in `(0, 1]`. Pairs absent
/// from the table substitute at the full Levenshtein cost of `1.0`, and a
/// surface always substitutes for itself at `0.0`. Files may be written
/// asymmetrically; symmetry is enforced at load time by keeping the cheaper
/// direction for both orders.
///
/// Two independent instances exist per matcher: one over graphemes for
/// character-level matching and one over pinyin syllables.
///
/// # Example
///
/// ```
/// use fuzzy_matcher_rs::ConfusionTable;
///
/// let table = ConfusionTable::from_json_str(r#"{"b": {"p": 0.4}}"#).unwrap();
/// assert_eq!(table.lookup("b", "p"), 0.4);
/// assert_eq!(table.lookup("p", "b"), 0.4);
/// assert_eq!(table.lookup("b", "b"), 0.0);
/// assert_eq!(table.lookup("b", "x"), 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfusionTable {
    cost_map: AHashMap<String, AHashMap<String, f64>>,
}

impl ConfusionTable {
    /// Creates an empty table under which every substitution costs `1.0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a table from a JSON file shaped as `{"a": {"b": cost}}`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Loads a table from a reader yielding the nested JSON object schema.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let entries: HashMap<String, HashMap<String, f64>> = serde_json::from_reader(reader)?;
        Self::from_entries(entries)
    }

    /// Parses a table from an in-memory JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, HashMap<String, f64>> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    fn from_entries(entries: HashMap<String, HashMap<String, f64>>) -> Result<Self> {
        let mut table = ConfusionTable::new();
        for (a, pair_costs) in entries {
            for (b, cost) in pair_costs {
                if !(cost > 0.0 && cost <= 1.0) {
                    return Err(MatchError::InvalidConfusionCost { a, b, cost });
                }
                if a == b {
                    continue;
                }
                table.insert(&a, &b, cost);
            }
        }
        Ok(table)
    }

    // The file may carry both directions with different costs; the cheaper
    // one wins and is mirrored so lookup never has to order its arguments.
    fn insert(&mut self, a: &str, b: &str, cost: f64) {
        for (from, to) in [(a, b), (b, a)] {
            self.cost_map
                .entry(from.to_owned())
                .or_default()
                .entry(to.to_owned())
                .and_modify(|existing| *existing = existing.min(cost))
                .or_insert(cost);
        }
    }

    /// Returns the substitution cost between two token surfaces.
    pub fn lookup(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 0.0;
        }
        self.cost_map
            .get(a)
            .and_then(|pair_costs| pair_costs.get(b))
            .copied()
            .unwrap_or(1.0)
    }

    /// Number of directed entries held by the table.
    pub fn len(&self) -> usize {
        self.cost_map.values().map(|pair_costs| pair_costs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cost_map.is_empty()
    }
}
