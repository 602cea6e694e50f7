//! Environment variable overlays.
//!
//! An [`EnvironmentOverlay`] pairs variables to add or override with names
//! to remove. Overlays are layered with [`EnvironmentOverlay::merge`] from
//! lowest to highest priority and resolved with
//! [`EnvironmentOverlay::filtered`], where a removal always beats an addition.

use std::collections::{BTreeMap, BTreeSet};

use berth_common::error::{BerthError, Result};
use serde::{Deserialize, Serialize};

/// Immutable set of environment variable additions and removals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentOverlay {
    #[serde(default)]
    additions: BTreeMap<String, String>,
    #[serde(default)]
    removals: BTreeSet<String>,
}

impl EnvironmentOverlay {
    /// Creates an overlay from explicit additions and removals.
    #[must_use]
    pub const fn new(additions: BTreeMap<String, String>, removals: BTreeSet<String>) -> Self {
        Self {
            additions,
            removals,
        }
    }

    /// Creates an overlay that only adds variables.
    #[must_use]
    pub const fn from_additions(additions: BTreeMap<String, String>) -> Self {
        Self::new(additions, BTreeSet::new())
    }

    /// Parses `NAME=VALUE` tokens. `NAME=` marks `NAME` for removal.
    ///
    /// A name given both a value and a removal keeps both; the removal wins
    /// once the overlay is filtered.
    ///
    /// # Errors
    ///
    /// Returns [`BerthError::MalformedOverlayToken`] for the first token that
    /// is not of the form `NAME=VALUE`.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut additions = BTreeMap::new();
        let mut removals = BTreeSet::new();

        for token in tokens {
            let (name, value) = split_token(token.as_ref())?;
            if value.is_empty() {
                let _ = removals.insert(name.to_owned());
            } else {
                let _ = additions.insert(name.to_owned(), value.to_owned());
            }
        }

        Ok(Self::new(additions, removals))
    }

    /// Parses a comma-separated list of tokens, as accepted by `--envvars`.
    ///
    /// # Errors
    ///
    /// Returns [`BerthError::MalformedOverlayToken`] if any token is invalid.
    pub fn from_delimited(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self::default());
        }
        Self::from_tokens(input.split(','))
    }

    /// Variables to add or override.
    pub const fn additions(&self) -> &BTreeMap<String, String> {
        &self.additions
    }

    /// Names to remove.
    pub const fn removals(&self) -> &BTreeSet<String> {
        &self.removals
    }

    /// Returns `true` if the overlay neither adds nor removes anything.
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Layers `higher_priority` on top of `self`.
    ///
    /// On a key present in both, the value from `higher_priority` wins.
    /// Removals from both sides are kept and only applied by [`Self::filtered`].
    #[must_use]
    pub fn merge(&self, higher_priority: &Self) -> Self {
        let mut additions = self.additions.clone();
        additions.extend(
            higher_priority
                .additions
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        let removals = self.removals.union(&higher_priority.removals).cloned().collect();
        Self::new(additions, removals)
    }

    /// Applies the pending removals, returning an overlay with no removals.
    #[must_use]
    pub fn filtered(&self) -> Self {
        let additions = self
            .additions
            .iter()
            .filter(|(k, _)| !self.removals.contains(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self::from_additions(additions)
    }

    /// Consumes the overlay, returning its additions.
    #[must_use]
    pub fn into_additions(self) -> BTreeMap<String, String> {
        self.additions
    }
}

fn split_token(token: &str) -> Result<(&str, &str)> {
    let malformed = || BerthError::MalformedOverlayToken {
        token: token.to_owned(),
    };
    let (name, value) = token.split_once('=').ok_or_else(malformed)?;
    if !is_valid_name(name) {
        return Err(malformed());
    }
    Ok((name, value))
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let first_ok = first.is_alphanumeric() || "_\\.:/+@-".contains(first);
    first_ok && chars.all(|c| c != '"')
}
