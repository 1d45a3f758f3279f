use eframe::egui;

use crate::resolver::ResolverState;
use crate::state::AppState;
use crate::ui::layout;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, mut state: AppState) -> Self {
        state.resolver.set_repaint(cc.egui_ctx.clone());
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.resolver.poll();

        // ---- Status bar ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{} respondents", self.state.table.len()));
                ui.separator();
                ui.label(format!("Showing {}", self.state.resolver.current().selection));
                if self.state.debug {
                    ui.separator();
                    ui.label("debug mode");
                }
            });
        });

        // ---- Central panel: the dashboard page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    layout::render(ui, &mut self.state);
                });
        });

        if self.state.resolver.state() == ResolverState::Recomputing {
            ctx.request_repaint();
        }
    }
}
