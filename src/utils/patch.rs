//! Positional text changes applied to source strings.
//!
//! Changes are expressed against byte offsets of the ORIGINAL text, so a
//! caller can compute several of them from one scan and apply them at once.

use crate::error::{Error, Result};
use serde::Serialize;

/// A single edit against the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StringChange {
    Insert { index: usize, text: String },
    Delete { start: usize, length: usize },
}

impl StringChange {
    fn position(&self) -> usize {
        match self {
            StringChange::Insert { index, .. } => *index,
            StringChange::Delete { start, .. } => *start,
        }
    }

    fn is_delete(&self) -> bool {
        matches!(self, StringChange::Delete { .. })
    }
}

/// Apply `changes` to `text` and return the new string.
///
/// Changes are applied from the highest offset down so earlier offsets stay
/// valid. Inserts at the same offset appear in the order given, after any
/// delete starting there. Deletes may not overlap one another and inserts may
/// not fall strictly inside a deleted range. Everything outside the changed
/// ranges is copied through untouched.
pub fn apply_changes_to_string(text: &str, changes: &[StringChange]) -> Result<String> {
    let mut deletes: Vec<(usize, usize)> = Vec::new();
    for change in changes {
        let (start, end) = match change {
            StringChange::Insert { index, .. } => (*index, *index),
            StringChange::Delete { start, length } => {
                let end = start.checked_add(*length).ok_or_else(|| {
                    Error::internal_unexpected(format!("Delete at {} overflows", start))
                })?;
                deletes.push((*start, end));
                (*start, end)
            }
        };
        if end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(Error::internal_unexpected(format!(
                "Change at {}..{} is outside the text (length {})",
                start,
                end,
                text.len()
            )));
        }
    }

    deletes.sort_unstable();
    if let Some(pair) = deletes.windows(2).find(|pair| pair[1].0 < pair[0].1) {
        return Err(Error::internal_unexpected(format!(
            "Delete at {}..{} overlaps delete at {}..{}",
            pair[1].0, pair[1].1, pair[0].0, pair[0].1
        )));
    }
    for change in changes {
        if let StringChange::Insert { index, .. } = change {
            if let Some((start, end)) = deletes.iter().find(|(s, e)| s < index && index < e) {
                return Err(Error::internal_unexpected(format!(
                    "Insert at {} falls inside delete at {}..{}",
                    index, start, end
                )));
            }
        }
    }

    // Equal offsets apply deletes first, then the later insert first so
    // inserts read in caller order.
    let mut ordered: Vec<(usize, &StringChange)> = changes.iter().enumerate().collect();
    ordered.sort_by(|(ia, a), (ib, b)| {
        b.position()
            .cmp(&a.position())
            .then(b.is_delete().cmp(&a.is_delete()))
            .then(ib.cmp(ia))
    });

    let mut result = text.to_string();
    for (_, change) in ordered {
        match change {
            StringChange::Insert { index, text } => result.insert_str(*index, text),
            StringChange::Delete { start, length } => {
                result.replace_range(*start..start + length, "");
            }
        }
    }

    Ok(result)
}
