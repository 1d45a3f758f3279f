use eframe::egui::{self, Color32, RichText, Ui};

use crate::charts::bar::{DisplayAttribute, GroupBy};
use crate::resolver::ResolverState;
use crate::state::AppState;
use crate::ui::layout::Span;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Descriptive text
// ---------------------------------------------------------------------------

/// Render paragraphs with inline hyperlinks.
pub fn prose(ui: &mut Ui, paragraphs: &[&[Span]]) {
    for paragraph in paragraphs {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            for span in *paragraph {
                match span {
                    Span::Text(text) => {
                        ui.label(*text);
                    }
                    Span::Link { label, url } => {
                        ui.hyperlink_to(*label, *url);
                    }
                }
            }
        });
        ui.add_space(6.0);
    }
}

// ---------------------------------------------------------------------------
// Dropdowns
// ---------------------------------------------------------------------------

/// Render the "Display" and "Groupby" selectors.
pub fn controls(ui: &mut Ui, state: &mut AppState) {
    let selection = state.selection();

    ui.heading("Display:");
    egui::ComboBox::from_id_salt("display")
        .selected_text(selection.display.column())
        .width(ui.available_width() * 0.9)
        .show_ui(ui, |ui: &mut Ui| {
            for option in DisplayAttribute::ALL {
                if ui
                    .selectable_label(selection.display == option, option.column())
                    .clicked()
                {
                    state.set_display(option);
                }
            }
        });

    ui.add_space(12.0);

    ui.heading("Groupby:");
    egui::ComboBox::from_id_salt("groupby")
        .selected_text(selection.group_by.column())
        .width(ui.available_width() * 0.9)
        .show_ui(ui, |ui: &mut Ui| {
            for option in GroupBy::ALL {
                if ui
                    .selectable_label(selection.group_by == option, option.column())
                    .clicked()
                {
                    state.set_group_by(option);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Interactive chart region
// ---------------------------------------------------------------------------

/// The bar chart for the newest completed selection, or its error.
pub fn interactive_chart(ui: &mut Ui, state: &AppState) {
    if state.resolver.state() == ResolverState::Recomputing {
        ui.horizontal(|ui: &mut Ui| {
            ui.spinner();
            ui.label(format!("Counting {}…", state.selection()));
        });
    }

    match &state.resolver.current().result {
        Ok(figure) => plot::bar_chart(ui, figure),
        Err(e) => {
            ui.label(RichText::new(state.error_text(e)).color(Color32::RED));
        }
    }
}
