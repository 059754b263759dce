//! Interactive selection of direction filter and granularity.
//!
//! Values given on the command line are used as-is; anything missing is
//! asked for on the terminal, filter first. Answers are trimmed and
//! lowercased. The filter is validated before the granularity, and an
//! invalid answer aborts before any database access.

use crate::aggregator::Granularity;
use crate::store::DirectionFilter;
use crate::utils::error::SelectionError;
use std::io::{BufRead, Write};

pub const FILTER_PROMPT: &str = "Enter packet type filter ('all', 'outgoing', 'incoming'): ";
pub const GRANULARITY_PROMPT: &str = "Enter time granularity ('minute' or 'hour'): ";

/// The two choices needed before querying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub filter: DirectionFilter,
    pub granularity: Granularity,
}

/// Resolve the selection from flags, prompting for whatever is missing
pub fn resolve_selection<R: BufRead, W: Write>(
    filter_flag: Option<&str>,
    granularity_flag: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<Selection, SelectionError> {
    let filter_raw = match filter_flag {
        Some(value) => value.to_string(),
        None => ask(input, output, FILTER_PROMPT)?,
    };
    let granularity_raw = match granularity_flag {
        Some(value) => value.to_string(),
        None => ask(input, output, GRANULARITY_PROMPT)?,
    };

    let filter: DirectionFilter = filter_raw.parse()?;
    let granularity: Granularity = granularity_raw.parse()?;

    Ok(Selection { filter, granularity })
}

/// Prompt for both values
pub fn prompt_selection<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Selection, SelectionError> {
    resolve_selection(None, None, input, output)
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<String, SelectionError> {
    write!(output, "{}", prompt).map_err(|e| SelectionError::Io(e.to_string()))?;
    output.flush().map_err(|e| SelectionError::Io(e.to_string()))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| SelectionError::Io(e.to_string()))?;

    Ok(line.trim().to_lowercase())
}
