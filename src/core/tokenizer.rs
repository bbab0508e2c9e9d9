//! Line tokenizer for the interactive prompt.
//!
//! A character-by-character scanner with three pieces of state: the token
//! buffer, the quote state, and an escape-pending flag. Escape takes
//! precedence over quote tracking, so a backslash marks the next character
//! literal even inside quotes.

/// Quote state of the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QuoteState {
    Inactive,
    Single,
    Double,
}

/// Split a raw input line into shell tokens honoring quotes and escapes.
///
/// Quote characters themselves are not copied into tokens. Consecutive
/// unquoted spaces never produce empty tokens. An unterminated quote at end
/// of line is accepted silently: the scanner just flushes whatever was
/// accumulated.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut quote = QuoteState::Inactive;
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            buf.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '\'' => match quote {
                QuoteState::Inactive => quote = QuoteState::Single,
                QuoteState::Single => quote = QuoteState::Inactive,
                QuoteState::Double => buf.push(c),
            },
            '"' => match quote {
                QuoteState::Inactive => quote = QuoteState::Double,
                QuoteState::Double => quote = QuoteState::Inactive,
                QuoteState::Single => buf.push(c),
            },
            ' ' if quote == QuoteState::Inactive => {
                if !buf.is_empty() {
                    tokens.push(std::mem::take(&mut buf));
                }
            }
            _ => buf.push(c),
        }
    }

    if !buf.is_empty() {
        tokens.push(buf);
    }
    tokens
}
