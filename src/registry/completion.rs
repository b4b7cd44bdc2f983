//! Autocomplete resolution for command names and command arguments.
//!
//! The shell owns completion of the command name (token 0). Every later
//! position is delegated to the matched command's own provider, with the
//! index and tokens shifted so the provider sees only its arguments.
//!
//! Resolution is stateless and never filters by prefix; the line editor
//! narrows candidates against the partial token (see [`filter_candidates`]).
//! Uses the stub function pattern: without the `completion` feature every
//! lookup yields no candidates.

#![cfg_attr(not(feature = "completion"), allow(unused_variables))]

use super::Registry;
use crate::io::{LineEditor, Terminal};

/// Resolve candidates for the token at `index`.
///
/// `tokens[0]` is the (possibly partial) command name, `tokens[1..]` its
/// arguments so far.
#[cfg(feature = "completion")]
pub fn resolve<E: LineEditor, T: Terminal>(
    registry: &Registry<E, T>,
    index: usize,
    tokens: &[String],
) -> Vec<String> {
    if index == 0 {
        return registry.names();
    }

    let Some((name, args)) = tokens.split_first() else {
        return Vec::new();
    };

    match registry.get(name).and_then(|entry| entry.autocomplete()) {
        Some(provider) => provider.complete(index - 1, args),
        None => Vec::new(),
    }
}

/// Resolve candidates (stub version - always empty).
#[cfg(not(feature = "completion"))]
pub fn resolve<E: LineEditor, T: Terminal>(
    registry: &Registry<E, T>,
    index: usize,
    tokens: &[String],
) -> Vec<String> {
    Vec::new()
}

/// Keep candidates starting with `partial`, preserving order.
pub fn filter_candidates<I, S>(candidates: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    candidates
        .into_iter()
        .map(Into::into)
        .filter(|c| c.starts_with(partial))
        .collect()
}
