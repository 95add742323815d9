#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod confusion;
pub use confusion::ConfusionTable;

mod distance;
pub use distance::{similarity, weighted_edit_distance, weighted_edit_distance_within};

mod error;
pub use error::{MatchError, Result};

mod index;

mod matcher;
pub use matcher::{FuzzyMatcher, MatchMode, MatchResult, MatcherConfig};

mod normalize;
pub use normalize::PinyinNormalizer;

mod token;
pub use token::Token;
