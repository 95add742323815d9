use std::borrow::Cow;
use std::fmt;

use unicode_segmentation::UnicodeSegmentation;

/// A single unit of the matching alphabet.
///
/// Character-level matching works over [Token::Grapheme] sequences, one per
/// extended grapheme cluster. Pinyin-level matching works over
/// [Token::Syllable] sequences; graphemes the normalizer cannot romanize are
/// carried through as [Token::Grapheme] and never compare equal to a syllable
/// with the same surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Grapheme(String),
    Syllable(String),
}

impl Token {
    pub fn as_str(&self) -> &str {
        match self {
            Token::Grapheme(s) => s,
            Token::Syllable(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Token::Grapheme(s) => s,
            Token::Syllable(s) => s,
        }
    }

    pub fn grapheme<I>(s: I) -> Self
    where
        I: AsRef<str>,
    {
        Token::Grapheme(s.as_ref().to_owned())
    }

    pub fn syllable<I>(s: I) -> Self
    where
        I: AsRef<str>,
    {
        Token::Syllable(s.as_ref().to_owned())
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> From<Cow<'a, str>> for Token {
    fn from(value: Cow<'a, str>) -> Self {
        Token::Grapheme(value.into_owned())
    }
}

/// Separator for joining a token sequence into a single searchable surface.
///
/// A joined pattern occurs inside a joined text whenever the pattern's token
/// sequence is a contiguous infix of the text's. Surface hits are only used
/// for candidate generation, so a stray `\u{1}` in the input can at worst
/// over-generate candidates that scoring filters back out.
pub(crate) const TOKEN_SEPARATOR: char = '\u{1}';

/// Segments text into one [Token::Grapheme] per extended grapheme cluster,
/// the character-level alphabet.
pub(crate) fn char_tokens(text: &str) -> Vec<Token> {
    text.graphemes(true).map(Token::grapheme).collect()
}

pub(crate) fn join_tokens(tokens: &[Token]) -> String {
    let mut joined = String::with_capacity(tokens.iter().map(|t| t.as_str().len() + 1).sum());
    for (index, token) in tokens.iter().enumerate() {
        if index > 0 {
            joined.push(TOKEN_SEPARATOR);
        }
        joined.push_str(token.as_str());
    }
    joined
}
