use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use eframe::egui;

use crate::charts::bar::{self, BarFigure, Selection};
use crate::data::model::SurveyTable;
use crate::error::ResolveError;

// ---------------------------------------------------------------------------
// Interactive chart resolver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// The rendered chart matches the newest selection.
    Idle,
    /// A recomputation is in flight or queued.
    Recomputing,
}

/// The chart currently on screen and the selection it was computed for.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub selection: Selection,
    pub result: Result<BarFigure, ResolveError>,
}

struct Completed {
    generation: u64,
    rendered: Rendered,
}

/// Recomputes the grouped bar chart for one dashboard window.
///
/// At most one computation runs at a time. Selections made while it runs only
/// update the newest selection; when the running computation finishes its
/// result is dropped if it is stale and the newest selection is dispatched.
pub struct ChartResolver {
    table: Arc<SurveyTable>,
    latest: Selection,
    generation: u64,
    in_flight: bool,
    current: Rendered,
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
    repaint: Option<egui::Context>,
}

impl ChartResolver {
    /// Resolve the initial selection synchronously so the first frame has a chart.
    pub fn new(table: Arc<SurveyTable>, initial: Selection) -> Self {
        let (tx, rx) = channel();
        let current = Rendered {
            selection: initial,
            result: bar::resolve(&table, initial),
        };
        Self {
            table,
            latest: initial,
            generation: 0,
            in_flight: false,
            current,
            tx,
            rx,
            repaint: None,
        }
    }

    /// Wake the UI when a background computation completes.
    pub fn set_repaint(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    pub fn selection(&self) -> Selection {
        self.latest
    }

    pub fn current(&self) -> &Rendered {
        &self.current
    }

    pub fn state(&self) -> ResolverState {
        if self.in_flight || self.current.selection != self.latest {
            ResolverState::Recomputing
        } else {
            ResolverState::Idle
        }
    }

    /// Record a dropdown change and schedule a recomputation.
    pub fn select(&mut self, selection: Selection) {
        if selection == self.latest {
            return;
        }
        log::debug!("Selection changed to {selection}");
        self.latest = selection;
        self.generation += 1;
        if !self.in_flight {
            self.dispatch();
        }
    }

    /// Accept finished work without blocking. Returns true when the chart changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(done) = self.rx.try_recv() {
            changed |= self.accept(done);
        }
        changed
    }

    /// Block until the chart matches the newest selection.
    #[cfg(test)]
    pub fn wait_idle(&mut self) {
        while self.state() == ResolverState::Recomputing {
            if !self.in_flight {
                self.dispatch();
            }
            match self.rx.recv() {
                Ok(done) => {
                    self.accept(done);
                }
                Err(_) => break,
            }
        }
    }

    fn accept(&mut self, done: Completed) -> bool {
        self.in_flight = false;
        let accepted = done.generation == self.generation && done.rendered.selection == self.latest;
        if accepted {
            if let Err(e) = &done.rendered.result {
                log::warn!("Chart for {} failed: {e}", done.rendered.selection);
            }
            self.current = done.rendered;
        } else {
            log::debug!(
                "Discarding stale chart for {} (generation {}, newest {})",
                done.rendered.selection,
                done.generation,
                self.generation
            );
        }
        if self.current.selection != self.latest {
            self.dispatch();
        }
        accepted
    }

    fn dispatch(&mut self) {
        let table = Arc::clone(&self.table);
        let selection = self.latest;
        let generation = self.generation;
        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        self.in_flight = true;

        thread::spawn(move || {
            let result = resolve_guarded(selection, || bar::resolve(&table, selection));
            if let Ok(figure) = &result {
                log::debug!(
                    "Resolved {selection}: {} bars over {} respondents",
                    figure.bar_count(),
                    figure.total_count()
                );
                if log::log_enabled!(log::Level::Trace) {
                    if let Ok(json) = serde_json::to_string(figure) {
                        log::trace!("{json}");
                    }
                }
            }
            let done = Completed {
                generation,
                rendered: Rendered { selection, result },
            };
            if tx.send(done).is_ok() {
                if let Some(ctx) = repaint {
                    ctx.request_repaint();
                }
            }
        });
    }
}

/// Run one resolution, turning a panic into an error for that chart so the
/// resolver never waits on a result that will not arrive.
fn resolve_guarded(
    selection: Selection,
    resolve: impl FnOnce() -> Result<BarFigure, ResolveError>,
) -> Result<BarFigure, ResolveError> {
    panic::catch_unwind(AssertUnwindSafe(resolve)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        log::error!("Resolving {selection} panicked: {message}");
        Err(ResolveError::Aborted {
            display: selection.display.column(),
            group_by: selection.group_by.column(),
            message,
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
