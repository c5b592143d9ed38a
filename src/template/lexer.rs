//! Lexer for placeholder expressions using logos
//!
//! Only the text between the delimiters is lexed here; finding the delimiters
//! themselves is the scanner's job since they are configurable at runtime.

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    #[token(".")]
    Dot,

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<usize>().ok())]
    Index(usize),

    // Hyphens are common in TOML and YAML keys
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice().to_string())]
    Ident(String),
}

/// Lex an expression into tokens with spans relative to `input`.
///
/// Returns the span of the first unrecognised character on failure.
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, Span> {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| match tok {
            Ok(t) => Ok((t, span)),
            Err(()) => Err(span),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(tokens(" name "), vec![Token::Ident("name".to_string())]);
    }

    #[test]
    fn test_dotted_path() {
        assert_eq!(
            tokens(".server.ports.0"),
            vec![
                Token::Dot,
                Token::Ident("server".to_string()),
                Token::Dot,
                Token::Ident("ports".to_string()),
                Token::Dot,
                Token::Index(0),
            ]
        );
    }

    #[test]
    fn test_hyphenated_ident() {
        assert_eq!(tokens("api-key"), vec![Token::Ident("api-key".to_string())]);
    }

    #[test]
    fn test_unknown_character() {
        assert_eq!(lex("name | upper"), Err(5..6));
    }

    #[test]
    fn test_index_overflow_is_error() {
        assert!(lex("list.99999999999999999999999").is_err());
    }
}
