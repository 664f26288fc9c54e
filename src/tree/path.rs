//! Path lexing for tree resolution.
//!
//! A path is a `/`-delimited string. Each portion is one of `..` (parent),
//! `.` or the empty portion (stay), `.first` / `.last` (child by index), or
//! a literal child identifier. Because a literal may contain dots, the lexer
//! relies on longest-match: `..banner` is a single literal, not `..` + text.

use logos::Logos;

/// One lexed path portion (or the `/` separating two portions).
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    /// Portion separator.
    #[token("/")]
    Separator,

    /// `..` — resolve to the parent.
    #[token("..")]
    Parent,

    /// `.first` — resolve to the first child.
    #[token(".first")]
    First,

    /// `.last` — resolve to the last child.
    #[token(".last")]
    Last,

    /// `.` — stay at the current node.
    #[token(".")]
    Stay,

    /// Any other portion — a literal child identifier. Lower priority than
    /// the special portions so equal-length matches lex as those.
    #[regex(r"[^/]+", |lex| lex.slice().to_owned(), priority = 1)]
    Name(String),
}

/// Lex a path into tokens. Empty portions produce no token at all (two
/// adjacent separators), which resolution treats as a stay.
pub fn lex(path: &str) -> Vec<PathToken> {
    // The token set covers every non-empty input, so the lexer cannot fail.
    PathToken::lexer(path).flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_simple_name() {
        assert_eq!(lex("foo"), vec![PathToken::Name("foo".into())]);
    }

    #[test]
    fn lex_parent_and_separator() {
        assert_eq!(
            lex("../bar"),
            vec![
                PathToken::Parent,
                PathToken::Separator,
                PathToken::Name("bar".into())
            ]
        );
    }

    #[test]
    fn lex_first_last_stay() {
        assert_eq!(
            lex(".first/.last/."),
            vec![
                PathToken::First,
                PathToken::Separator,
                PathToken::Last,
                PathToken::Separator,
                PathToken::Stay,
            ]
        );
    }

    #[test]
    fn lex_dotted_literal_is_one_name() {
        // Longest match: these are literals, not special portions.
        assert_eq!(lex("..banner"), vec![PathToken::Name("..banner".into())]);
        assert_eq!(lex(".firstborn"), vec![PathToken::Name(".firstborn".into())]);
        assert_eq!(lex("..."), vec![PathToken::Name("...".into())]);
    }

    #[test]
    fn lex_empty_portions() {
        assert_eq!(
            lex("//"),
            vec![PathToken::Separator, PathToken::Separator]
        );
        assert!(lex("").is_empty());
    }
}
