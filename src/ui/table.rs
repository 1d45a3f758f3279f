use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::charts::summary::SummaryTable;

/// Render the per-sex means as a striped table.
pub fn summary_table(ui: &mut Ui, summary: &SummaryTable) {
    ui.push_id("summary_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(140.0), summary.headers.len())
            .header(22.0, |mut header| {
                for title in &summary.headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*title);
                    });
                }
            })
            .body(|mut body| {
                for row in &summary.rows {
                    body.row(20.0, |mut table_row| {
                        for cell in row.cells() {
                            table_row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}
