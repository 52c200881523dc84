/// Characters that open a protected group when seen outside one.
fn is_group_opener(c: char) -> bool {
    matches!(c, '\'' | '"' | '`' | '(' | '[' | '{')
}

/// Closing bracket paired with `open`, or `None` for quote characters.
fn closing_bracket(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// True when `c` closes a group opened by `host`.
/// Quotes close on the same character, brackets on their counterpart.
fn closes_group(host: char, c: char) -> bool {
    match closing_bracket(host) {
        Some(close) => c == close,
        None => c == host,
    }
}

/// Split `text` on `sep`, ignoring separators inside a quote group
/// (`'…'`, `"…"`, `` `…` ``) or a bracket group (`(…)`, `[…]`, `{…}`).
///
/// Only one group is tracked at a time: an opener seen while a group is
/// already open does not start a second one, and the open group closes at
/// the first matching closer. Group delimiters stay part of the field.
/// An unmatched quote or bracket is not an error; the group simply runs
/// to the end of the string and no further splits happen.
///
/// `limit` controls the number of fields:
///
///   - `0` → no fields at all;
///   - `1` → the whole string as the single field;
///   - `n > 1` → at most `n` fields, the last absorbing the unsplit
///     remainder;
///   - negative → as many fields as separators allow.
///
/// A trailing single-character separator yields a trailing empty field,
/// so `split_n("a,b,", ",", -1)` has three fields.
pub fn split_n(text: &str, sep: &str, limit: isize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }
    if limit == 1 || sep.is_empty() {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    let sep_chars: Vec<char> = sep.chars().collect();
    let mut fields = Vec::new();
    let mut buf = String::new();
    let mut group: Option<char> = None;
    let mut last = '\0';
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        last = c;

        if group.is_none() && is_group_opener(c) {
            group = Some(c);
        } else if group.is_some_and(|host| closes_group(host, c)) {
            group = None;
        } else if group.is_none() && chars[i..].starts_with(&sep_chars) {
            fields.push(std::mem::take(&mut buf));
            i += sep_chars.len();
            if limit > 0 && fields.len() + 1 == limit as usize {
                buf = chars[i..].iter().collect();
                break;
            }
            continue;
        }

        buf.push(c);
        i += 1;
    }

    // The tail survives when non-empty, or when the last examined
    // character was the separator itself (single-character separators).
    if !buf.is_empty() || (sep_chars.len() == 1 && last == sep_chars[0]) {
        fields.push(buf);
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain() {
        assert_eq!(split_n("a,b,c,d", ",", -1), ["a", "b", "c", "d"]);
    }

    #[test]
    fn split_empty_fields() {
        assert_eq!(split_n("a,,c", ",", -1), ["a", "", "c"]);
    }

    #[test]
    fn split_trailing_separator() {
        assert_eq!(split_n("a,,", ",", -1), ["a", "", ""]);
    }

    #[test]
    fn split_parenthesized_group() {
        assert_eq!(split_n("a,(b,c),d", ",", -1), ["a", "(b,c)", "d"]);
    }

    #[test]
    fn split_braced_group() {
        assert_eq!(split_n("a,{b,c},d", ",", -1), ["a", "{b,c}", "d"]);
    }

    #[test]
    fn split_single_quoted_group() {
        assert_eq!(split_n("'a,b',c,d", ",", -1), ["'a,b'", "c", "d"]);
    }

    #[test]
    fn split_double_quoted_group() {
        assert_eq!(split_n("a,\"b,c\",d", ",", -1), ["a", "\"b,c\"", "d"]);
    }

    #[test]
    fn split_backquoted_group() {
        assert_eq!(split_n("`a,b`,c", ",", -1), ["`a,b`", "c"]);
    }

    #[test]
    fn split_limit_zero() {
        assert!(split_n("a,b,c", ",", 0).is_empty());
    }

    #[test]
    fn split_limit_one() {
        assert_eq!(split_n("a,b,c", ",", 1), ["a,b,c"]);
    }

    #[test]
    fn split_limit_two_absorbs_remainder() {
        assert_eq!(split_n("a,b,c,d", ",", 2), ["a", "b,c,d"]);
    }

    #[test]
    fn split_limit_with_trailing_content() {
        assert_eq!(split_n("a_b_c,, ,", ",", 3), ["a_b_c", "", " ,"]);
    }

    #[test]
    fn split_unlimited_with_trailing_separator() {
        assert_eq!(split_n("a_b_c,, ,", ",", -1), ["a_b_c", "", " ", ""]);
    }

    #[test]
    fn split_empty_input() {
        assert!(split_n("", ",", -1).is_empty());
    }

    #[test]
    fn split_empty_input_limit_one() {
        assert_eq!(split_n("", ",", 1), [""]);
    }

    #[test]
    fn split_multichar_separator() {
        assert_eq!(split_n("a, b, c", ", ", -1), ["a", "b", "c"]);
    }

    #[test]
    fn split_multichar_separator_no_trailing_field() {
        // The trailing-separator rule only applies to one-char separators.
        assert_eq!(split_n("a, b, ", ", ", -1), ["a", "b"]);
    }

    #[test]
    fn split_quote_spanning_separator() {
        assert_eq!(split_n("x='a,b' y", " ", -1), ["x='a,b'", "y"]);
    }

    #[test]
    fn split_unmatched_quote_runs_to_end() {
        // A stray quote swallows the rest of the string; no error.
        assert_eq!(split_n("'a,b,c", ",", -1), ["'a,b,c"]);
    }

    #[test]
    fn split_unmatched_bracket_runs_to_end() {
        assert_eq!(split_n("a,(b,c", ",", -1), ["a", "(b,c"]);
    }

    #[test]
    fn split_nested_group_closes_at_first_closer() {
        // Only one group is open at a time, so the inner `(` is not
        // tracked and the first `)` closes the group.
        assert_eq!(
            split_n("a,(b,(c,d),e),f", ",", -1),
            ["a", "(b,(c,d)", "e)", "f"]
        );
    }

    #[test]
    fn split_mixed_quotes_inside_group() {
        // A different quote inside an open group does not close it.
        assert_eq!(split_n("\"a'b,c\",d", ",", -1), ["\"a'b,c\"", "d"]);
    }

    #[test]
    fn split_rejoining_restores_input() {
        let input = "one,'two,three',(four,five),six";
        assert_eq!(split_n(input, ",", -1).join(","), input);
    }
}
