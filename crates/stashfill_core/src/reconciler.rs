//! Working set of tag suggestions awaiting an accept or ignore decision.
//!
//! Each entry is pending until it is decided, at which point it is settled and
//! dropped from the set. Deciding produces a [`SuggestionSubmission`] for the
//! backend; the set never waits on the backend's reply.

use thiserror::Error;

use crate::SuggestionRowView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionEntry {
    pub source: String,
    /// Suggested target tag, editable until the entry settles.
    pub target: String,
    pub ignore: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept { source: String, final_tag: String },
    Ignore { source: String },
}

/// One batch of decisions sent to the backend in a single call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestionSubmission {
    pub decisions: Vec<Decision>,
}

impl SuggestionSubmission {
    /// `(source, final_tag)` pairs in decision order.
    pub fn accepted(&self) -> Vec<(&str, &str)> {
        self.decisions
            .iter()
            .filter_map(|decision| match decision {
                Decision::Accept { source, final_tag } => {
                    Some((source.as_str(), final_tag.as_str()))
                }
                Decision::Ignore { .. } => None,
            })
            .collect()
    }

    pub fn ignored(&self) -> Vec<&str> {
        self.decisions
            .iter()
            .filter_map(|decision| match decision {
                Decision::Ignore { source } => Some(source.as_str()),
                Decision::Accept { .. } => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("no pending suggestion for tag '{0}'")]
    UnknownTag(String),
    #[error("suggested tag for '{0}' is empty")]
    EmptyTarget(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestionReconciler {
    entries: Vec<SuggestionEntry>,
    ignore_all: bool,
}

impl SuggestionReconciler {
    /// Builds the working set. Duplicate source tags keep their first position
    /// and take the last suggested value.
    pub fn new(map: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut entries: Vec<SuggestionEntry> = Vec::new();
        for (source, target) in map {
            match entries.iter_mut().find(|entry| entry.source == source) {
                Some(existing) => existing.target = target,
                None => entries.push(SuggestionEntry {
                    source,
                    target,
                    ignore: false,
                }),
            }
        }
        Self {
            entries,
            ignore_all: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[SuggestionEntry] {
        &self.entries
    }

    pub fn ignore_all(&self) -> bool {
        self.ignore_all
    }

    pub fn rows(&self) -> Vec<SuggestionRowView> {
        self.entries
            .iter()
            .map(|entry| SuggestionRowView {
                source: entry.source.clone(),
                target: entry.target.clone(),
                ignore: entry.ignore,
            })
            .collect()
    }

    /// Returns false when `source` is not pending.
    pub fn edit(&mut self, source: &str, target: impl Into<String>) -> bool {
        match self.entry_mut(source) {
            Some(entry) => {
                entry.target = target.into();
                true
            }
            None => false,
        }
    }

    pub fn set_ignored(&mut self, source: &str, ignore: bool) -> bool {
        match self.entry_mut(source) {
            Some(entry) => {
                entry.ignore = ignore;
                true
            }
            None => false,
        }
    }

    /// Propagates the master flag to every pending entry without settling any.
    pub fn set_ignore_all(&mut self, ignore: bool) {
        self.ignore_all = ignore;
        for entry in &mut self.entries {
            entry.ignore = ignore;
        }
    }

    /// Settles a single entry and returns the one-decision submission for it.
    ///
    /// `final_tag` overrides the entry's current target when given.
    pub fn decide_one(
        &mut self,
        source: &str,
        ignore: bool,
        final_tag: Option<&str>,
    ) -> Result<SuggestionSubmission, ReconcileError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.source == source)
            .ok_or_else(|| ReconcileError::UnknownTag(source.to_string()))?;

        let decision = if ignore {
            Decision::Ignore {
                source: source.to_string(),
            }
        } else {
            let target = final_tag.unwrap_or(&self.entries[index].target).trim();
            if target.is_empty() {
                return Err(ReconcileError::EmptyTarget(source.to_string()));
            }
            Decision::Accept {
                source: source.to_string(),
                final_tag: target.to_string(),
            }
        };

        self.entries.remove(index);
        Ok(SuggestionSubmission {
            decisions: vec![decision],
        })
    }

    /// Settles every pending entry using its current target and ignore flag.
    ///
    /// Returns `Ok(None)` when nothing is pending. Nothing settles if any
    /// accepted entry has an empty target.
    pub fn decide_all(&mut self) -> Result<Option<SuggestionSubmission>, ReconcileError> {
        if self.entries.is_empty() {
            return Ok(None);
        }
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| !entry.ignore && entry.target.trim().is_empty())
        {
            return Err(ReconcileError::EmptyTarget(entry.source.clone()));
        }

        let decisions = self
            .entries
            .drain(..)
            .map(|entry| {
                if entry.ignore {
                    Decision::Ignore {
                        source: entry.source,
                    }
                } else {
                    Decision::Accept {
                        final_tag: entry.target.trim().to_string(),
                        source: entry.source,
                    }
                }
            })
            .collect();
        self.ignore_all = false;
        Ok(Some(SuggestionSubmission { decisions }))
    }

    fn entry_mut(&mut self, source: &str) -> Option<&mut SuggestionEntry> {
        self.entries.iter_mut().find(|entry| entry.source == source)
    }
}
