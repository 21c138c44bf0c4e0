//! Whitespace tokenizer and strict decimal integer parsing.

use crate::errors::{instance_error, solution_error, HtdError};

/// Selects the error channel used when a token fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Instance input: failures carry a line number and are always fatal.
    Instance,
    /// Decomposition input: failures carry no line number.
    Solution,
}

/// Splits a line on whitespace runs, dropping empty tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Returns whether a tokenized line carries no record (blank or `c` comment).
pub fn is_skippable(tokens: &[&str]) -> bool {
    tokens.first().map_or(true, |first| *first == "c")
}

/// Parses an optionally negative decimal integer.
///
/// Only `-?[0-9]+` is accepted; a leading `+`, embedded whitespace or any
/// other character is rejected, as is a value outside the `i64` range.
pub fn parse_int(mode: ParseMode, token: &str, line: Option<usize>) -> Result<i64, HtdError> {
    if token.is_empty() {
        return Err(malformed(mode, "Expected integer, got empty string", token, line));
    }
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if digits.is_empty() {
        return Err(malformed(
            mode,
            "Expected integer, got non-integer string",
            token,
            line,
        ));
    }
    let mut value: i64 = 0;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(10) else {
            return Err(malformed(
                mode,
                "Expected integer, got non-integer string",
                token,
                line,
            ));
        };
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(digit)))
            .ok_or_else(|| malformed(mode, "Integer out of range", token, line))?;
    }
    Ok(if negative { -value } else { value })
}

fn malformed(mode: ParseMode, message: &str, token: &str, line: Option<usize>) -> HtdError {
    let err = match mode {
        ParseMode::Instance => instance_error("malformed-integer", message, line),
        ParseMode::Solution => solution_error("malformed-integer", message),
    };
    match err {
        HtdError::Instance(info) => HtdError::Instance(info.with_context("token", token)),
        HtdError::Solution(info) => HtdError::Solution(info.with_context("token", token)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_whitespace_runs() {
        assert_eq!(tokenize("  b 1\t 2   3 "), vec!["b", "1", "2", "3"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn comments_and_blank_lines_are_skippable() {
        assert!(is_skippable(&tokenize("")));
        assert!(is_skippable(&tokenize("c anything goes")));
        assert!(!is_skippable(&tokenize("cc 1")));
        assert!(!is_skippable(&tokenize("1 2")));
    }

    #[test]
    fn parses_signed_integers() {
        assert_eq!(parse_int(ParseMode::Solution, "42", None).unwrap(), 42);
        assert_eq!(parse_int(ParseMode::Solution, "-7", None).unwrap(), -7);
        assert_eq!(parse_int(ParseMode::Solution, "007", None).unwrap(), 7);
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["", "-", "+3", "1a", "--1", "1.0"] {
            let err = parse_int(ParseMode::Solution, token, None).unwrap_err();
            assert!(err.is_solution());
            assert_eq!(err.info().code, "malformed-integer");
        }
    }

    #[test]
    fn instance_mode_keeps_line_number() {
        let err = parse_int(ParseMode::Instance, "x", Some(9)).unwrap_err();
        assert!(err.is_instance());
        assert_eq!(err.line(), Some(9));
    }

    #[test]
    fn overflow_is_malformed() {
        let err = parse_int(ParseMode::Instance, "99999999999999999999", Some(1)).unwrap_err();
        assert_eq!(err.info().code, "malformed-integer");
    }
}
