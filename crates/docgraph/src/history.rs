//! Cross-version signature history.
//!
//! [`SignatureHistory`] consumes one snapshot per version and must see the
//! versions in the exact order of its [`VersionOrder`]. Anything else is
//! rejected with [`DocError::OutOfOrder`]; completions that arrive early have
//! to be held back by the caller (see [`ReorderBuffer`](crate::reorder::ReorderBuffer)).

use crate::error::{DocError, Result};
use crate::snapshot::DocumentSnapshot;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Compare version identifiers with numeric runs compared by value
///
/// `v0.10.0` sorts after `v0.9.0`. Non-numeric runs compare bytewise.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = runs(a);
    let mut right = runs(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = match (is_numeric(l), is_numeric(r)) {
                    (true, true) => compare_numeric(l, r),
                    _ => l.cmp(r),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

fn is_numeric(run: &str) -> bool {
    run.starts_with(|c: char| c.is_ascii_digit())
}

fn compare_numeric(l: &str, r: &str) -> Ordering {
    let l = l.trim_start_matches('0');
    let r = r.trim_start_matches('0');
    l.len().cmp(&r.len()).then_with(|| l.cmp(r))
}

/// Split into maximal runs of digits and non-digits
fn runs(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(run)
    })
}

/// Chronological list of versions, the current snapshot last
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionOrder {
    versions: Vec<String>,
}

impl VersionOrder {
    /// Use `versions` as given, oldest first
    pub fn new(versions: Vec<String>) -> Self {
        Self { versions }
    }

    /// Sort release tags by version and append `head`
    ///
    /// Duplicate tags are dropped and `head` is always last, even when it is
    /// also one of the tags.
    pub fn from_unsorted<I, S>(tags: I, head: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let head = head.into();
        let mut versions: Vec<String> = tags
            .into_iter()
            .map(Into::into)
            .filter(|tag| *tag != head)
            .collect();
        versions.sort_by(|a, b| compare_versions(a, b));
        versions.dedup();
        versions.push(head);
        Self { versions }
    }

    /// All versions, oldest first
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Number of versions
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// True when there are no versions
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Chronological position of a version
    pub fn index_of(&self, version: &str) -> Option<usize> {
        self.versions.iter().position(|v| v == version)
    }

    /// Version at a chronological position
    pub fn get(&self, index: usize) -> Option<&str> {
        self.versions.get(index).map(String::as_str)
    }

    /// The current snapshot
    pub fn latest(&self) -> Option<&str> {
        self.versions.last().map(String::as_str)
    }

    /// Iterate versions, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(String::as_str)
    }
}

/// Where a function existed and where its signature changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Versions that declare the function, oldest first
    pub exists_in: Vec<String>,
    /// Versions whose signature differs from the previous version that
    /// declared the function, oldest first
    pub changed_at: Vec<String>,
}

/// Per-function history built one version at a time
#[derive(Debug)]
pub struct SignatureHistory {
    order: VersionOrder,
    next: usize,
    entries: BTreeMap<String, HistoryEntry>,
    last_signature: BTreeMap<String, String>,
}

impl SignatureHistory {
    /// Start an empty history over `order`
    pub fn new(order: VersionOrder) -> Self {
        Self {
            order,
            next: 0,
            entries: BTreeMap::new(),
            last_signature: BTreeMap::new(),
        }
    }

    fn advance(&mut self, version: &str) -> Result<()> {
        let index = self
            .order
            .index_of(version)
            .ok_or_else(|| DocError::UnknownVersion {
                version: version.to_string(),
            })?;

        if index != self.next {
            return Err(DocError::OutOfOrder {
                expected: self
                    .order
                    .get(self.next)
                    .unwrap_or("<none, history is complete>")
                    .to_string(),
                got: version.to_string(),
            });
        }

        self.next += 1;
        Ok(())
    }

    /// Apply the functions of `version`
    ///
    /// A function seen for the first time starts an entry. Otherwise its
    /// signature is compared with the one it had the last time it was seen,
    /// which need not be the previous version.
    pub fn record(&mut self, version: &str, snapshot: &DocumentSnapshot) -> Result<()> {
        self.advance(version)?;

        let mut changed = 0;
        for (name, function) in &snapshot.functions {
            let entry = self.entries.entry(name.clone()).or_default();

            match self.last_signature.get_mut(name) {
                Some(previous) => {
                    if *previous != function.signature {
                        trace!("{name}: {previous:?} -> {:?} at {version}", function.signature);
                        entry.changed_at.push(version.to_string());
                        *previous = function.signature.clone();
                        changed += 1;
                    }
                }
                None => {
                    self.last_signature
                        .insert(name.clone(), function.signature.clone());
                }
            }

            entry.exists_in.push(version.to_string());
        }

        debug!(
            "history {version}: {} functions, {changed} changed",
            snapshot.functions.len()
        );
        Ok(())
    }

    /// Move past a version that has no snapshot
    pub fn skip(&mut self, version: &str) -> Result<()> {
        self.advance(version)?;
        debug!("history skips {version}");
        Ok(())
    }

    /// The version the next `record` or `skip` must name
    pub fn next_version(&self) -> Option<&str> {
        self.order.get(self.next)
    }

    /// True once every version was recorded or skipped
    pub fn is_complete(&self) -> bool {
        self.next >= self.order.len()
    }

    /// History of one function so far
    pub fn get(&self, name: &str) -> Option<&HistoryEntry> {
        self.entries.get(name)
    }

    /// All histories so far
    pub fn entries(&self) -> &BTreeMap<String, HistoryEntry> {
        &self.entries
    }

    /// Functions whose signature changed at `version`
    pub fn changed_in(&self, version: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.changed_at.iter().any(|v| v == version))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// The finished history with every version list in chronological order
    pub fn finalize(self) -> BTreeMap<String, HistoryEntry> {
        if !self.is_complete() {
            warn!(
                "finalizing history before {} was recorded",
                self.next_version().unwrap_or_default()
            );
        }

        let order = self.order;
        let position = |v: &String| order.index_of(v).unwrap_or(usize::MAX);

        let mut entries = self.entries;
        for entry in entries.values_mut() {
            entry.exists_in.sort_by_key(position);
            entry.changed_at.sort_by_key(position);
        }
        entries
    }
}
