//! Browser session state machine.
//!
//! One `BrowserSession` holds the paging and filter state bound to a single
//! rendered message. Control activations arrive as `BrowserAction` values
//! through [`BrowserSession::apply`], which returns what the caller must do
//! next (re-render, fetch a detail, report no matches, ...). The session
//! itself performs no I/O, which keeps every transition unit-testable.

use super::model::{ControlFlags, DisplayRecord, RenderedPage, ResultSet};

/// A control activation on a browser message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserAction {
    /// Previous page; no-op on the first page.
    Prev,
    /// Next page; no-op on the last page.
    Next,
    /// Drop the active filter and return to page 1 of the base set.
    Reset,
    /// Apply a case-insensitive substring filter over the base set.
    Filter(String),
    /// Select one row for a secondary detail fetch.
    Select(String),
}

/// Result of applying an action to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// State changed; the rendered message must be edited in place.
    Updated(RenderedPage),
    /// The action was a no-op (boundary page turn, reset while unfiltered).
    Unchanged,
    /// A filter matched nothing; state is untouched.
    NoMatches { query: String },
    /// A row was selected; the caller fetches and shows the detail view.
    Detail { record: DisplayRecord },
    /// The selected row id is not part of the active set.
    UnknownRow { row_id: String },
    /// The session already expired; the event must be rejected.
    Expired,
}

/// Mutable paging/filter state for one outstanding browse interaction.
#[derive(Debug, Clone)]
pub struct BrowserSession {
    title: String,
    /// The original, unfiltered set. Restored by Reset; Filter always
    /// searches this, never the active subset.
    base: ResultSet,
    /// The set currently being paged.
    active: ResultSet,
    /// 1-indexed; invariant `1 <= current_page <= active.page_count()`.
    current_page: usize,
    is_filtered: bool,
    expired: bool,
}

impl BrowserSession {
    /// Opens a session over a (possibly empty) result set at page 1.
    ///
    /// Returns the session together with the initial render. An empty set
    /// produces an explicit "no records" page rather than a blank one.
    pub fn open(title: impl Into<String>, base: ResultSet) -> (Self, RenderedPage) {
        let session = Self {
            title: title.into(),
            active: base.clone(),
            base,
            current_page: 1,
            is_filtered: false,
            expired: false,
        };
        let page = session.render();
        (session, page)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.active.page_count()
    }

    pub fn is_filtered(&self) -> bool {
        self.is_filtered
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn active_set(&self) -> &ResultSet {
        &self.active
    }

    pub fn base_set(&self) -> &ResultSet {
        &self.base
    }

    /// Applies one control activation and reports what changed.
    ///
    /// Page turns clamp at the boundaries, so the page-index invariant can
    /// not be violated from the outside. After expiry every action is
    /// rejected without touching state.
    pub fn apply(&mut self, action: BrowserAction) -> Activation {
        if self.expired {
            return Activation::Expired;
        }

        match action {
            BrowserAction::Prev => {
                if self.current_page <= 1 {
                    return Activation::Unchanged;
                }
                self.current_page -= 1;
                Activation::Updated(self.render())
            }
            BrowserAction::Next => {
                if self.current_page >= self.active.page_count() {
                    return Activation::Unchanged;
                }
                self.current_page += 1;
                Activation::Updated(self.render())
            }
            BrowserAction::Reset => {
                // Allowed while unfiltered, but nothing changes then.
                if !self.is_filtered {
                    return Activation::Unchanged;
                }
                self.active = self.base.clone();
                self.is_filtered = false;
                self.current_page = 1;
                Activation::Updated(self.render())
            }
            BrowserAction::Filter(query) => {
                let matches = self.base.matching(&query);
                if matches.is_empty() {
                    return Activation::NoMatches { query };
                }
                self.active = ResultSet::new(matches);
                self.is_filtered = true;
                self.current_page = 1;
                Activation::Updated(self.render())
            }
            BrowserAction::Select(row_id) => {
                // Selection never moves the visible page.
                match self
                    .active
                    .records()
                    .iter()
                    .find(|r| r.id == row_id)
                    .cloned()
                {
                    Some(record) => Activation::Detail { record },
                    None => Activation::UnknownRow { row_id },
                }
            }
        }
    }

    /// Marks the session expired and returns the final render with every
    /// control disabled. Fires at most once; later calls return `None`.
    pub fn expire(&mut self) -> Option<RenderedPage> {
        if self.expired {
            return None;
        }
        self.expired = true;
        Some(self.render())
    }

    /// Renders the current page and control surface.
    pub fn render(&self) -> RenderedPage {
        let total = self.active.page_count();
        let lines: Vec<String> = if self.active.is_empty() {
            vec!["no records".to_string()]
        } else {
            self.active
                .page_slice(self.current_page)
                .iter()
                .map(|r| r.text.clone())
                .collect()
        };

        let controls = if self.expired || self.active.is_empty() {
            ControlFlags::DISABLED
        } else {
            ControlFlags {
                prev: self.current_page > 1,
                next: self.current_page < total,
                filter: !self.is_filtered,
                reset: self.is_filtered,
            }
        };

        RenderedPage {
            title: self.title.clone(),
            lines,
            footer: format!("Page {} of {}", self.current_page, total),
            controls,
            expired: self.expired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::model::DisplayRecord;

    fn records(n: usize) -> ResultSet {
        (0..n)
            .map(|i| DisplayRecord::new(format!("id-{i}"), format!("🚌 {i} - route {i}")))
            .collect()
    }

    #[test]
    fn open_starts_unfiltered_on_page_one() {
        let (session, page) = BrowserSession::open("Bus Routes", records(45));
        assert_eq!(session.current_page(), 1);
        assert!(!session.is_filtered());
        assert_eq!(page.lines.len(), 20);
        assert_eq!(page.footer, "Page 1 of 3");
        assert!(!page.controls.prev);
        assert!(page.controls.next);
        assert!(page.controls.filter);
        assert!(!page.controls.reset);
    }

    #[test]
    fn open_with_empty_set_renders_no_records() {
        let (_, page) = BrowserSession::open("Bus Routes", ResultSet::new(vec![]));
        assert_eq!(page.lines, vec!["no records".to_string()]);
        assert_eq!(page.footer, "Page 1 of 1");
        assert_eq!(page.controls, ControlFlags::DISABLED);
    }

    #[test]
    fn next_twice_then_next_is_a_noop_on_last_page() {
        let (mut session, _) = BrowserSession::open("Bus Routes", records(45));

        assert!(matches!(
            session.apply(BrowserAction::Next),
            Activation::Updated(_)
        ));
        let third = match session.apply(BrowserAction::Next) {
            Activation::Updated(page) => page,
            other => panic!("expected update, got {other:?}"),
        };
        assert_eq!(session.current_page(), 3);
        assert_eq!(third.lines.len(), 5);
        assert!(!third.controls.next);

        assert_eq!(session.apply(BrowserAction::Next), Activation::Unchanged);
        assert_eq!(session.current_page(), 3);
    }

    #[test]
    fn prev_on_first_page_is_a_noop() {
        let (mut session, _) = BrowserSession::open("Bus Routes", records(45));
        assert_eq!(session.apply(BrowserAction::Prev), Activation::Unchanged);
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn prev_then_next_returns_to_the_same_render() {
        let (mut session, _) = BrowserSession::open("Bus Routes", records(60));
        session.apply(BrowserAction::Next);
        let before = session.render();

        session.apply(BrowserAction::Prev);
        session.apply(BrowserAction::Next);

        assert_eq!(session.render(), before);
    }

    #[test]
    fn filter_matches_from_base_and_reset_restores_open_state() {
        let set = ResultSet::new(vec![
            DisplayRecord::new("a1", "A1 - Alpha"),
            DisplayRecord::new("b2", "B2 - Beta"),
        ]);
        let (mut session, opened) = BrowserSession::open("Bus Routes", set.clone());

        let filtered = match session.apply(BrowserAction::Filter("alpha".into())) {
            Activation::Updated(page) => page,
            other => panic!("expected update, got {other:?}"),
        };
        assert!(session.is_filtered());
        assert_eq!(filtered.lines, vec!["A1 - Alpha".to_string()]);
        assert!(!filtered.controls.filter);
        assert!(filtered.controls.reset);

        // A second filter still searches the full base set.
        let refiltered = match session.apply(BrowserAction::Filter("beta".into())) {
            Activation::Updated(page) => page,
            other => panic!("expected update, got {other:?}"),
        };
        assert_eq!(refiltered.lines, vec!["B2 - Beta".to_string()]);

        let restored = match session.apply(BrowserAction::Reset) {
            Activation::Updated(page) => page,
            other => panic!("expected update, got {other:?}"),
        };
        assert!(!session.is_filtered());
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.active_set(), &set);
        assert_eq!(restored, opened);
    }

    #[test]
    fn filter_without_matches_leaves_state_untouched() {
        let (mut session, _) = BrowserSession::open("Bus Routes", records(45));
        session.apply(BrowserAction::Next);
        let before = session.render();
        let active_before = session.active_set().clone();

        let outcome = session.apply(BrowserAction::Filter("zzz".into()));
        assert_eq!(
            outcome,
            Activation::NoMatches {
                query: "zzz".into()
            }
        );
        assert_eq!(session.current_page(), 2);
        assert!(!session.is_filtered());
        assert_eq!(session.active_set(), &active_before);
        assert_eq!(session.render(), before);
    }

    #[test]
    fn reset_while_unfiltered_is_allowed_but_unchanged() {
        let (mut session, _) = BrowserSession::open("Bus Routes", records(5));
        assert_eq!(session.apply(BrowserAction::Reset), Activation::Unchanged);
    }

    #[test]
    fn select_surfaces_the_record_without_moving_the_page() {
        let (mut session, _) = BrowserSession::open("Bus Routes", records(45));
        session.apply(BrowserAction::Next);

        let outcome = session.apply(BrowserAction::Select("id-3".into()));
        match outcome {
            Activation::Detail { record } => assert_eq!(record.id, "id-3"),
            other => panic!("expected detail, got {other:?}"),
        }
        assert_eq!(session.current_page(), 2);
    }

    #[test]
    fn select_with_unknown_row_reports_it() {
        let (mut session, _) = BrowserSession::open("Bus Routes", records(3));
        assert_eq!(
            session.apply(BrowserAction::Select("nope".into())),
            Activation::UnknownRow {
                row_id: "nope".into()
            }
        );
    }

    #[test]
    fn expiry_disables_controls_and_rejects_everything_after() {
        let (mut session, _) = BrowserSession::open("Bus Routes", records(45));
        session.apply(BrowserAction::Next);

        let last = session.expire().expect("first expiry yields a render");
        assert!(last.expired);
        assert_eq!(last.controls, ControlFlags::DISABLED);
        assert_eq!(last.footer, "Page 2 of 3");

        // Fires only once.
        assert!(session.expire().is_none());

        for action in [
            BrowserAction::Prev,
            BrowserAction::Next,
            BrowserAction::Reset,
            BrowserAction::Filter("1".into()),
            BrowserAction::Select("id-1".into()),
        ] {
            assert_eq!(session.apply(action), Activation::Expired);
        }
        assert_eq!(session.current_page(), 2);
    }
}
