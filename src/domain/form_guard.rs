//! Unsaved-changes navigation guard for the admin editors.
//!
//! Models the "confirm before discarding edits" rule as an explicit
//! Clean/Dirty state machine behind a small capability interface
//! (`mark_dirty`, `mark_clean`, `guard`), independent of any UI event
//! system. The admin frontend drives it from field-change and submit
//! events; the same machine backs its unload interception.

/// Editing state of a guarded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Clean,
    Dirty,
}

/// How a navigation leaves the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// An in-page link that would replace the current document.
    InPage,
    /// A link to a different origin; never intercepted.
    External,
    /// A new-tab or modified-click navigation; the document stays put.
    NewTab,
}

/// Outcome of asking the guard whether a navigation may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Cancelled,
}

#[derive(Debug, Default)]
pub struct FormGuard {
    state: FormState,
}

impl FormGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// A recognized field change; Dirty → Dirty is a no-op.
    pub fn mark_dirty(&mut self) {
        self.state = FormState::Dirty;
    }

    /// A successful submit returns the form to Clean.
    pub fn mark_clean(&mut self) {
        self.state = FormState::Clean;
    }

    /// Whether a browser-level unload must ask for native confirmation.
    pub fn unload_requires_confirmation(&self) -> bool {
        self.state == FormState::Dirty
    }

    /// Decide whether a navigation may proceed. While Dirty, an in-page
    /// navigation consults `confirm` and is cancelled unless it returns
    /// `true`; the state stays Dirty on cancellation. External and new-tab
    /// navigations are exempt from interception.
    pub fn guard<F>(&self, kind: NavigationKind, confirm: F) -> NavigationDecision
    where
        F: FnOnce() -> bool,
    {
        match (self.state, kind) {
            (FormState::Clean, _) => NavigationDecision::Proceed,
            (FormState::Dirty, NavigationKind::External | NavigationKind::NewTab) => {
                NavigationDecision::Proceed
            }
            (FormState::Dirty, NavigationKind::InPage) => {
                if confirm() {
                    NavigationDecision::Proceed
                } else {
                    NavigationDecision::Cancelled
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clean_and_lets_navigation_through() {
        let guard = FormGuard::new();
        assert_eq!(guard.state(), FormState::Clean);
        assert!(!guard.unload_requires_confirmation());
        assert_eq!(
            guard.guard(NavigationKind::InPage, || panic!("no prompt while clean")),
            NavigationDecision::Proceed
        );
    }

    #[test]
    fn field_change_transitions_are_idempotent() {
        let mut guard = FormGuard::new();
        guard.mark_dirty();
        guard.mark_dirty();
        assert_eq!(guard.state(), FormState::Dirty);
        assert!(guard.unload_requires_confirmation());
    }

    #[test]
    fn dirty_in_page_navigation_requires_confirmation() {
        let mut guard = FormGuard::new();
        guard.mark_dirty();

        assert_eq!(
            guard.guard(NavigationKind::InPage, || true),
            NavigationDecision::Proceed
        );
        assert_eq!(
            guard.guard(NavigationKind::InPage, || false),
            NavigationDecision::Cancelled
        );
        // Cancellation leaves the edits guarded.
        assert_eq!(guard.state(), FormState::Dirty);
    }

    #[test]
    fn external_and_new_tab_navigations_are_exempt() {
        let mut guard = FormGuard::new();
        guard.mark_dirty();

        for kind in [NavigationKind::External, NavigationKind::NewTab] {
            assert_eq!(
                guard.guard(kind, || panic!("exempt navigations never prompt")),
                NavigationDecision::Proceed
            );
        }
    }

    #[test]
    fn successful_submit_returns_to_clean() {
        let mut guard = FormGuard::new();
        guard.mark_dirty();
        guard.mark_clean();
        assert_eq!(guard.state(), FormState::Clean);
        assert_eq!(
            guard.guard(NavigationKind::InPage, || false),
            NavigationDecision::Proceed
        );
    }
}
