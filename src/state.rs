use std::error::Error;
use std::sync::Arc;

use crate::charts::StaticFigures;
use crate::charts::bar::{DisplayAttribute, GroupBy, Selection};
use crate::data::model::SurveyTable;
use crate::error::ResolveError;
use crate::resolver::ChartResolver;
use crate::ui::layout::{self, Page};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full state of one dashboard window, independent of rendering.
pub struct AppState {
    /// Cleaned survey, shared read-only with resolver workers.
    pub table: Arc<SurveyTable>,

    /// Figures computed once at startup.
    pub figures: StaticFigures,

    /// Fixed page structure.
    pub page: Page,

    /// Recomputes the interactive chart on selection changes.
    pub resolver: ChartResolver,

    /// Show full error chains instead of a short notice.
    pub debug: bool,
}

impl AppState {
    pub fn new(table: Arc<SurveyTable>, figures: StaticFigures, debug: bool) -> Self {
        let resolver = ChartResolver::new(Arc::clone(&table), Selection::default());
        Self {
            table,
            figures,
            page: layout::compose(),
            resolver,
            debug,
        }
    }

    pub fn selection(&self) -> Selection {
        self.resolver.selection()
    }

    pub fn set_display(&mut self, display: DisplayAttribute) {
        let selection = Selection {
            display,
            ..self.selection()
        };
        self.resolver.select(selection);
    }

    pub fn set_group_by(&mut self, group_by: GroupBy) {
        let selection = Selection {
            group_by,
            ..self.selection()
        };
        self.resolver.select(selection);
    }

    /// Text shown in place of the interactive chart when it cannot be built.
    pub fn error_text(&self, error: &ResolveError) -> String {
        if self.debug {
            let mut text = format!("Error: {error}");
            let mut source = error.source();
            while let Some(cause) = source {
                text.push_str(&format!("\n  caused by: {cause}"));
                source = cause.source();
            }
            text
        } else {
            "This chart could not be drawn for the selected attributes.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::fixtures;
    use crate::resolver::ResolverState;

    fn state(debug: bool) -> AppState {
        let table = Arc::new(fixtures::survey());
        let figures = StaticFigures::build(&table).unwrap();
        AppState::new(table, figures, debug)
    }

    #[test]
    fn test_dropdowns_update_one_field_each() {
        let mut s = state(false);
        s.set_group_by(GroupBy::Region);
        assert_eq!(
            s.selection(),
            Selection {
                display: DisplayAttribute::MaleBreadwinner,
                group_by: GroupBy::Region
            }
        );
        s.set_display(DisplayAttribute::SatJob);
        assert_eq!(s.selection().group_by, GroupBy::Region);
        assert_eq!(s.selection().display, DisplayAttribute::SatJob);
        s.resolver.wait_idle();
        assert_eq!(s.resolver.state(), ResolverState::Idle);
    }

    #[test]
    fn test_error_text_depends_on_debug() {
        let mut s = state(true);
        s.set_display(DisplayAttribute::MenOverwork);
        s.resolver.wait_idle();
        let err = s.resolver.current().result.clone().unwrap_err();
        let verbose = s.error_text(&err);
        assert!(verbose.contains("caused by: column 'men_overwork'"));

        s.debug = false;
        assert!(!s.error_text(&err).contains("men_overwork"));
    }
}
