//! Shared `(message, token)` -> multi-line diagnostic formatting.
use colored::Colorize;

use crate::token::Token;

/// Render a diagnostic pointing at the token's source position:
///
/// ```text
/// error: MESSAGE
/// FILE:LINE:COL
/// <source line>
/// <spaces><carets> here
/// ```
///
/// Caret width is `max(1, literal length)`, plus 2 for string tokens to
/// account for the surrounding quotes that the decoded literal no longer
/// carries.
pub fn format_error(message: &str, token: &Token) -> String {
    let (line, col) = token.position;
    let file = token.file.as_deref().unwrap_or("");

    let mut caret_width = token.literal.len().max(1);
    if token.kind == crate::token::TokenKind::Str {
        caret_width += 2;
    }

    let padding = " ".repeat(col.saturating_sub(1));
    let carets = "^".repeat(caret_width);

    format!(
        "{}: {message}\n{file}:{line}:{col}\n{}\n{padding}{} here",
        "error".red().bold(),
        token.line_text,
        carets.red(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn points_at_the_token_column() {
        colored::control::set_override(false);
        let token = Token::new(TokenKind::Ident, "foo", (3, 5), "so foo = 1;", None);
        let out = format_error("identifier 'foo' not found", &token);
        assert!(out.contains(":3:5"));
        assert!(out.contains("so foo = 1;"));
        assert!(out.contains("^^^"));
    }

    #[test]
    fn widens_carets_for_strings() {
        colored::control::set_override(false);
        let token = Token::new(TokenKind::Str, "hi", (1, 1), "\"hi\"", None);
        let out = format_error("oops", &token);
        assert!(out.contains("^^^^"));
    }
}
