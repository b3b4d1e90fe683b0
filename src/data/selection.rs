use std::collections::BTreeSet;

use super::filter::FilteredView;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Selection state: which species labels are currently chosen
// ---------------------------------------------------------------------------

/// Published whenever the selected set actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChanged {
    pub revision: u64,
}

/// The set of chosen labels, always a subset of the declared labels.
///
/// Every mutator returns `Some(SelectionChanged)` only if the set changed,
/// so callers can drive their dependents off the event instead of
/// recomputing after every click.
#[derive(Debug, Clone)]
pub struct SelectionState {
    declared: Vec<String>,
    selected: BTreeSet<String>,
    revision: u64,
}

impl SelectionState {
    /// Initial state: every declared label selected.
    pub fn all(declared: Vec<String>) -> Self {
        let selected = declared.iter().cloned().collect();
        Self {
            declared,
            selected,
            revision: 0,
        }
    }

    /// Labels in display order.
    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn contains(&self, label: &str) -> bool {
        self.selected.contains(label)
    }

    /// Number of changes published so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Select or deselect one label.
    pub fn set(
        &mut self,
        label: &str,
        on: bool,
    ) -> Result<Option<SelectionChanged>, DashboardError> {
        if !self.declared.iter().any(|d| d == label) {
            return Err(DashboardError::UnknownLabel {
                label: label.to_string(),
            });
        }
        let changed = if on {
            self.selected.insert(label.to_string())
        } else {
            self.selected.remove(label)
        };
        Ok(self.publish(changed))
    }

    /// Flip one label, as a checkbox click does.
    pub fn toggle(&mut self, label: &str) -> Result<Option<SelectionChanged>, DashboardError> {
        let on = !self.contains(label);
        self.set(label, on)
    }

    pub fn select_all(&mut self) -> Option<SelectionChanged> {
        let all: BTreeSet<String> = self.declared.iter().cloned().collect();
        let changed = all != self.selected;
        self.selected = all;
        self.publish(changed)
    }

    pub fn select_none(&mut self) -> Option<SelectionChanged> {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        self.publish(changed)
    }

    fn publish(&mut self, changed: bool) -> Option<SelectionChanged> {
        if !changed {
            return None;
        }
        self.revision += 1;
        Some(SelectionChanged {
            revision: self.revision,
        })
    }
}

// ---------------------------------------------------------------------------
// Dependents of the filtered view
// ---------------------------------------------------------------------------

/// Anything derived from the filtered view. Rebuilt on every
/// [`SelectionChanged`] and whenever the underlying table is replaced.
pub trait ViewConsumer {
    fn refresh(&mut self, view: &FilteredView<'_>) -> Result<(), DashboardError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species() -> SelectionState {
        SelectionState::all(vec!["Adelie".into(), "Gentoo".into(), "Chinstrap".into()])
    }

    #[test]
    fn starts_with_every_label_selected() {
        let sel = species();
        assert_eq!(sel.selected().len(), 3);
        assert_eq!(sel.revision(), 0);
        assert_eq!(sel.declared()[0], "Adelie");
    }

    #[test]
    fn change_publishes_event_with_new_revision() {
        let mut sel = species();
        let event = sel.set("Gentoo", false).unwrap();
        assert_eq!(event, Some(SelectionChanged { revision: 1 }));
        assert!(!sel.contains("Gentoo"));
    }

    #[test]
    fn no_op_publishes_nothing() {
        let mut sel = species();
        assert_eq!(sel.set("Adelie", true).unwrap(), None);
        assert_eq!(sel.select_all(), None);
        assert_eq!(sel.revision(), 0);
    }

    #[test]
    fn undeclared_label_is_rejected() {
        let mut sel = species();
        let err = sel.set("Emperor", true).unwrap_err();
        assert_eq!(err, DashboardError::UnknownLabel { label: "Emperor".into() });
        assert!(!sel.contains("Emperor"));
    }

    #[test]
    fn toggle_none_and_all() {
        let mut sel = species();
        sel.toggle("Chinstrap").unwrap();
        assert!(!sel.contains("Chinstrap"));
        sel.toggle("Chinstrap").unwrap();
        assert!(sel.contains("Chinstrap"));

        assert!(sel.select_none().is_some());
        assert!(sel.selected().is_empty());
        assert!(sel.select_none().is_none());

        assert_eq!(sel.select_all(), Some(SelectionChanged { revision: 4 }));
        assert_eq!(sel.selected().len(), 3);
    }
}
