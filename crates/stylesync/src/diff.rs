//! Matching of a previous style set against a new one.
//!
//! Styles are matched by identifier only. Names and attributes never take
//! part in matching, so a renamed style is recognized as the same style.
//! When a set holds the same identifier twice, the first occurrence wins.

use std::collections::HashSet;

use crate::model::StyleRecord;
use crate::projection::VariableCase;

/// The difference between two lists of one style category.
#[derive(Debug, Clone, Copy)]
pub struct StyleDiff<'a, S> {
    previous: &'a [S],
    new: &'a [S],
}

/// A style that kept its identifier and name but changed attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleUpdate<S> {
    pub previous: S,
    pub current: S,
    /// Changed projection attributes, in key order.
    pub changed_attributes: Vec<String>,
}

impl<'a, S: StyleRecord> StyleDiff<'a, S> {
    pub fn new(previous: &'a [S], new: &'a [S]) -> Self {
        Self { previous, new }
    }

    /// Previous styles whose identifier is gone from the new set, flagged as
    /// deprecated, in previous order.
    pub fn deprecated_styles(&self) -> Vec<S> {
        let new_identifiers = identifiers(self.new);
        self.previous
            .iter()
            .filter(|style| !new_identifiers.contains(style.identifier()))
            .map(StyleRecord::deprecated)
            .collect()
    }

    /// `(old, new)` pairs for styles that were renamed, in new-set order.
    ///
    /// Attribute-only changes are not included.
    pub fn current_and_migrated_styles(&self) -> Vec<(S, S)> {
        self.new
            .iter()
            .filter_map(|current| {
                let previous = self.previous_for(current)?;
                (previous.name() != current.name()).then(|| (previous.clone(), current.clone()))
            })
            .collect()
    }

    /// New styles with no previous counterpart.
    pub fn added_styles(&self) -> Vec<S> {
        self.new
            .iter()
            .filter(|current| self.previous_for(current).is_none())
            .cloned()
            .collect()
    }

    /// Styles with the same identifier and name whose projection changed.
    pub fn updated_styles(&self, case: VariableCase) -> Vec<StyleUpdate<S>> {
        self.new
            .iter()
            .filter_map(|current| {
                let previous = self.previous_for(current)?;
                if previous.name() != current.name() {
                    return None;
                }
                let before = previous.replaceable(case);
                let after = current.replaceable(case);
                (before != after).then(|| StyleUpdate {
                    previous: previous.clone(),
                    current: current.clone(),
                    changed_attributes: before.changed_attributes(&after),
                })
            })
            .collect()
    }

    fn previous_for(&self, current: &S) -> Option<&'a S> {
        self.previous
            .iter()
            .find(|previous| previous.identifier() == current.identifier())
    }
}

fn identifiers<S: StyleRecord>(styles: &[S]) -> HashSet<&str> {
    styles.iter().map(StyleRecord::identifier).collect()
}
