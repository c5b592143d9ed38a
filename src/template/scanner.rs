//! Splits template text into literal runs and placeholders

use super::error::TemplateError;
use super::lexer::{lex, Span, Token};
use super::Delimiters;
use crate::value::PathSegment;

/// Escapes a left delimiter when placed directly before it
pub const ESCAPE: char = '\\';

/// A piece of a parsed template
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Byte range copied verbatim from the source
    Literal(Span),
    Placeholder(Placeholder),
}

/// A `{{ name.path }}` reference
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    /// Top-level variable name
    pub name: String,
    /// Steps into nested values after `name`
    pub path: Vec<PathSegment>,
    /// Span of the whole placeholder, delimiters included
    pub span: Span,
}

impl Placeholder {
    /// Dotted form of the full path, e.g. `server.ports.0`
    pub fn dotted(&self) -> String {
        std::iter::once(self.name.clone())
            .chain(self.path.iter().map(|s| s.to_string()))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Scan `source` for placeholders bounded by `delims`
pub fn scan(source: &str, delims: &Delimiters) -> Result<Vec<Segment>, TemplateError> {
    let left = delims.left();
    let right = delims.right();

    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while let Some(found) = source[pos..].find(left) {
        let open = pos + found;

        if source[..open].ends_with(ESCAPE) {
            // Drop the escape character, keep the delimiter as literal text
            let escape_at = open - ESCAPE.len_utf8();
            if escape_at > literal_start {
                segments.push(Segment::Literal(literal_start..escape_at));
            }
            literal_start = open;
            pos = open + left.len();
            continue;
        }

        if open > literal_start {
            segments.push(Segment::Literal(literal_start..open));
        }

        let inner_start = open + left.len();
        let close = source[inner_start..]
            .find(right)
            .map(|i| inner_start + i)
            .ok_or_else(|| TemplateError::Unclosed {
                right: right.to_string(),
                span: open..inner_start,
            })?;
        let end = close + right.len();

        let placeholder = parse_expression(&source[inner_start..close], inner_start, open..end)?;
        segments.push(Segment::Placeholder(placeholder));

        pos = end;
        literal_start = end;
    }

    if literal_start < source.len() {
        segments.push(Segment::Literal(literal_start..source.len()));
    }

    Ok(segments)
}

/// Parse the text between delimiters: `[.]ident(.ident|.index)*`
fn parse_expression(inner: &str, offset: usize, span: Span) -> Result<Placeholder, TemplateError> {
    if inner.trim().is_empty() {
        return Err(TemplateError::EmptyPlaceholder { span });
    }

    let invalid = |reason: String, at: Span| TemplateError::InvalidExpression {
        text: inner.trim().to_string(),
        reason,
        span: offset + at.start..offset + at.end,
    };

    let tokens = lex(inner).map_err(|bad| {
        let ch = inner.get(bad.clone()).unwrap_or("?");
        invalid(format!("unexpected character '{}'", ch), bad)
    })?;

    let mut iter = tokens.into_iter().peekable();

    // Optional leading dot
    if matches!(iter.peek(), Some((Token::Dot, _))) {
        iter.next();
    }

    let name = match iter.next() {
        Some((Token::Ident(name), _)) => name,
        Some((_, at)) => return Err(invalid("expected a variable name".to_string(), at)),
        None => {
            let at = inner.len()..inner.len();
            return Err(invalid("expected a variable name after '.'".to_string(), at));
        }
    };

    let mut path = Vec::new();
    while let Some((tok, at)) = iter.next() {
        if tok != Token::Dot {
            return Err(invalid("expected '.' between path segments".to_string(), at));
        }
        match iter.next() {
            Some((Token::Ident(key), _)) => path.push(PathSegment::Key(key)),
            Some((Token::Index(index), _)) => path.push(PathSegment::Index(index)),
            Some((_, at)) => return Err(invalid("expected a key or index".to_string(), at)),
            None => return Err(invalid("path ends with '.'".to_string(), at)),
        }
    }

    Ok(Placeholder { name, path, span })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn braces() -> Delimiters {
        Delimiters::default()
    }

    fn placeholder(segment: &Segment) -> &Placeholder {
        match segment {
            Segment::Placeholder(p) => p,
            other => panic!("expected placeholder, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_text_is_one_literal() {
        let segments = scan("no placeholders here", &braces()).unwrap();
        assert_eq!(segments, vec![Segment::Literal(0..20)]);
    }

    #[test]
    fn test_empty_template() {
        assert!(scan("", &braces()).unwrap().is_empty());
    }

    #[test]
    fn test_literal_placeholder_literal() {
        let segments = scan("Hello, {{name}}!", &braces()).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Literal(0..7));
        let p = placeholder(&segments[1]);
        assert_eq!(p.name, "name");
        assert!(p.path.is_empty());
        assert_eq!(p.span, 7..15);
        assert_eq!(segments[2], Segment::Literal(15..16));
    }

    #[test]
    fn test_leading_dot_and_whitespace() {
        let segments = scan("{{ .server.ports.1 }}", &braces()).unwrap();
        let p = placeholder(&segments[0]);
        assert_eq!(p.name, "server");
        assert_eq!(
            p.path,
            vec![PathSegment::Key("ports".into()), PathSegment::Index(1)]
        );
        assert_eq!(p.dotted(), "server.ports.1");
    }

    #[test]
    fn test_custom_delimiters() {
        let delims = Delimiters::new("<%", "%>").unwrap();
        let segments = scan("a {{ b }} <% c %>", &delims).unwrap();
        assert_eq!(segments[0], Segment::Literal(0..10));
        assert_eq!(placeholder(&segments[1]).name, "c");
    }

    #[test]
    fn test_escaped_left_delimiter() {
        let source = r"keep \{{ this }} and {{x}}";
        let segments = scan(source, &braces()).unwrap();
        // "keep " then "{{ this }} and " then placeholder
        assert_eq!(segments[0], Segment::Literal(0..5));
        assert_eq!(segments[1], Segment::Literal(6..21));
        assert_eq!(&source[6..21], "{{ this }} and ");
        assert_eq!(placeholder(&segments[2]).name, "x");
    }

    #[test]
    fn test_stray_right_delimiter_is_literal() {
        let segments = scan("a }} b", &braces()).unwrap();
        assert_eq!(segments, vec![Segment::Literal(0..6)]);
    }

    #[test]
    fn test_unclosed() {
        let err = scan("Hello {{ name", &braces()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::Unclosed {
                right: "}}".to_string(),
                span: 6..8
            }
        );
    }

    #[test]
    fn test_empty_placeholder() {
        let err = scan("x {{   }} y", &braces()).unwrap_err();
        assert_eq!(err, TemplateError::EmptyPlaceholder { span: 2..9 });
    }

    #[test]
    fn test_invalid_expressions() {
        for bad in ["{{ a b }}", "{{ 0 }}", "{{ a. }}", "{{ a | b }}", "{{ . }}", "{{ a..b }}"] {
            let err = scan(bad, &braces()).unwrap_err();
            assert!(
                matches!(err, TemplateError::InvalidExpression { .. }),
                "{bad}: {err:?}"
            );
        }
    }

    #[test]
    fn test_invalid_expression_span_points_inside() {
        let err = scan("{{ a | b }}", &braces()).unwrap_err();
        match err {
            TemplateError::InvalidExpression { span, .. } => assert_eq!(span, 5..6),
            other => panic!("unexpected {other:?}"),
        }
    }
}
