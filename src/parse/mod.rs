//! Line classification and `KEY=VALUE` expression parsing.

pub mod tokenize;

pub use tokenize::split_n;

use uuid::Uuid;

use crate::error::ParseError;

/// True when a line holds no declaration: empty, whitespace only, or a
/// `#` comment with optional leading whitespace.
pub fn is_blank(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return true;
    };
    if first == '#' {
        return true;
    }
    if !first.is_whitespace() {
        return false;
    }
    let rest = text.trim_start();
    rest.is_empty() || rest.starts_with('#')
}

/// Parse one declaration line into `(key, value)`.
///
/// The line must have the shape `[export ]KEY=VALUE[ #comment]` with
/// `KEY` matching `[A-Za-z_][A-Za-z0-9_]*` and a non-empty value that
/// begins right after the `=`. A bare value ends at the first `#` or
/// space; a value wrapped in `'`, `"`, or backticks keeps `#` and
/// whitespace, must close its quote, and `\` before the quote character
/// yields a literal quote.
pub fn parse_expression(line: &str) -> Result<(String, String), ParseError> {
    let expr = line.trim_start();

    // `export` is a prefix only when whitespace follows; otherwise it is
    // part of the key itself (`exportKEY=5` declares `exportKEY`).
    let expr = match expr.strip_prefix("export") {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => expr,
    };

    let Some(eq) = expr.find('=') else {
        return Err(ParseError::MissingKeyName(line.to_string()));
    };
    let key = &expr[..eq];
    if key.is_empty()
        || !key
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ParseError::MissingKeyName(line.to_string()));
    }

    // No whitespace may follow the `=`, and the value must be non-empty:
    // `KEY= x` and `KEY=` are both rejected.
    let raw = &expr[eq + 1..];
    if raw.is_empty() || raw.starts_with(char::is_whitespace) {
        return Err(ParseError::IncorrectValue(line.to_string()));
    }

    let value = raw.trim();
    let quote = match value.chars().next() {
        Some(c @ ('\'' | '"' | '`')) => Some(c),
        _ => None,
    };

    let value = match quote {
        Some(q) => parse_quoted(line, value, q)?,
        None if value.contains('#') => {
            // Bare value: cut at the first `#` or space outside a group,
            // whichever comes first.
            let chunk = first_field(value, "#");
            first_field(&chunk, " ").trim().to_string()
        }
        None => value.to_string(),
    };

    Ok((key.to_string(), value))
}

/// First `split_n` field of `text`, or empty when there is none.
fn first_field(text: &str, sep: &str) -> String {
    split_n(text, sep, -1).into_iter().next().unwrap_or_default()
}

/// Unwrap a `q`-quoted value: strip any trailing comment, check quote
/// balance, drop the outer quotes, and turn `\q` escapes into literal
/// quote characters.
fn parse_quoted(line: &str, value: &str, q: char) -> Result<String, ParseError> {
    // Escaped quotes are masked with a one-shot marker so the comment
    // scan below cannot mistake them for group delimiters.
    let escaped = format!("\\{q}");
    let marker = format!("<::{}::>", Uuid::new_v4().simple());
    let masked = value.replace(&escaped, &marker);

    let stripped = remove_inline_comment(&masked, q);
    if stripped.matches(q).count() % 2 != 0 {
        return Err(ParseError::IncorrectValue(line.to_string()));
    }

    // Drop the opening and closing quote characters.
    let mut inner = stripped.chars();
    inner.next();
    inner.next_back();
    Ok(inner.as_str().replace(&marker, &q.to_string()))
}

/// Strip a `#` comment from `value`, treating `#` between unescaped `q`
/// characters as content. Returns the input unchanged when it has no `#`.
fn remove_inline_comment(value: &str, q: char) -> String {
    if !value.contains('#') {
        return value.to_string();
    }

    let mut result = String::with_capacity(value.len());
    let mut inside = false;
    let mut prev: Option<char> = None;
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c == q {
            if inside {
                if prev.is_some_and(|p| p != '\\') {
                    inside = false;
                }
            } else {
                inside = true;
            }
            result.push(c);
        } else if c == '#' && !inside {
            return result.trim().to_string();
        } else if c == '\\' && inside && chars.peek() == Some(&q) {
            // Keep the escape sequence intact inside the quoted region.
            result.push(c);
            result.push(q);
            chars.next();
            prev = Some(q);
            continue;
        } else {
            result.push(c);
        }
        prev = Some(c);
    }

    result
}
