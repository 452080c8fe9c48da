//! Command pattern matching.
//!
//! A pattern is a regex anchored at the start of the actual command; a
//! plain literal string is just a regex with no metacharacters, so one
//! matching code path covers both. A command equal character-for-character
//! to its pattern always matches, even when the pattern does not compile
//! as a regex.

use std::borrow::Cow;

use regex::Regex;

use crate::error::MockError;

/// Matching behaviour, set once per dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// Collapse runs of spaces in both pattern and command before
    /// matching.
    ///
    /// Off by default: the matcher does literal regex matching only and
    /// the fixture author owns whitespace (tolerating variation with
    /// `\s+` or `.*` where needed). Enable for fixtures whose doubled
    /// spaces are rendering artifacts of the tool under test.
    pub normalize_whitespace: bool,
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_was_space = false;
    for ch in text.chars() {
        if ch == ' ' {
            if !previous_was_space {
                out.push(' ');
            }
            previous_was_space = true;
        } else {
            out.push(ch);
            previous_was_space = false;
        }
    }
    out
}

/// Check `actual` against `pattern`.
///
/// The match is anchored at the start of `actual` and may stop short of
/// its end, mirroring how the fixture patterns are written (a trailing
/// `.*` is not required to tolerate extra flags).
///
/// # Errors
///
/// [`MockError::InvalidPattern`] when the pattern fails to compile as a
/// regex and is not an exact literal match for the command.
pub fn matches(pattern: &str, actual: &str, options: &MatchOptions) -> Result<bool, MockError> {
    let (pattern, actual): (Cow<'_, str>, Cow<'_, str>) = if options.normalize_whitespace {
        (
            Cow::Owned(collapse_spaces(pattern)),
            Cow::Owned(collapse_spaces(actual)),
        )
    } else {
        (Cow::Borrowed(pattern), Cow::Borrowed(actual))
    };

    if pattern == actual {
        return Ok(true);
    }

    let anchored = format!("^(?:{pattern})");
    let regex = Regex::new(&anchored).map_err(|source| MockError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(regex.is_match(&actual))
}
