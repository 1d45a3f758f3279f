use eframe::egui::{self, Ui};
use egui_extras::{Size, StripBuilder};

use crate::charts::bar::BAR_HEIGHT;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

const BOX_HEIGHT: f32 = 450.0;

// ---------------------------------------------------------------------------
// Page structure
// ---------------------------------------------------------------------------

/// A run of paragraph text, optionally linking out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    Text(&'static str),
    Link {
        label: &'static str,
        url: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Heading(&'static str),
    SubHeading(&'static str),
    /// Paragraphs of spans.
    Prose(&'static [&'static [Span]]),
    SummaryTable,
    /// Dropdowns on the left, interactive bar chart on the right.
    ControlsWithChart,
    Scatter,
    /// Income and job-prestige box plots next to each other.
    SideBySideBoxes,
    FacetGrid,
}

/// The fixed vertical sequence of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub sections: Vec<Section>,
}

const INTRODUCTION: &[&[Span]] = &[
    &[
        Span::Text(
            "There is a gender wage gap in the United States. As of 2020, women earn 82 cents \
             for every dollar a man earns, according to data from the Bureau of Labor Statistics. ",
        ),
        Span::Link {
            label: "This is in part due to historical funneling of women into unpaid or low-pay \
                    caregiver roles and men into higher-pay trades such as construction",
            url: "https://americanprogress.org/article/quick-facts-gender-wage-gap/",
        },
        Span::Text(
            ". While efforts such as increased educational attainment by women have closed the \
             gap (the gap has closed by 4 cents in over a decade), more work needs to be done. ",
        ),
        Span::Link {
            label: "Women still earn less than men in nearly all occupations and women earn less \
                    than their same race and ethnicity counterpart at every level of educational \
                    attainment",
            url: "https://blog.dol.gov/2021/03/19/5-facts-about-the-state-of-the-gender-pay-gap",
        },
        Span::Text(", according to the Department of Labor Blog."),
    ],
    &[
        Span::Text(
            "The General Social Survey (GSS) has surveyed adults in the United States since 1972. \
             According to the GSS website, the survey collects data on contemporary American \
             society in order to monitor and explain trends in opinions, attitudes and behaviors. \
             Our dataset contains demographics and attitudes about gender roles and income. For \
             an example of how the GSS measures variables such as Occupational Prestige, please see ",
        ),
        Span::Link {
            label: "methodology",
            url: "http://gss.norc.org/Documents/reports/methodological-reports/MR122%20Occupational%20Prestige.pdf",
        },
        Span::Text(
            ". For a list of questions asked such as \"It is much better for everyone involved if \
             the man is the achiever outside the home and the woman takes care of the home and \
             family\", please see ",
        ),
        Span::Link {
            label: "codebook",
            url: "http://www.gss.norc.org/Documents/codebook/GSS%202021%20Codebook%20R1.pdf",
        },
        Span::Text("."),
    ],
];

/// Build the page once at startup.
pub fn compose() -> Page {
    Page {
        sections: vec![
            Section::Heading(
                "Exploring Attitudes about Gender and Income as measured by the General Social \
                 Survey (GSS)",
            ),
            Section::Prose(INTRODUCTION),
            Section::SubHeading(
                "Mean values for Education, Occupational Prestige, Socioeconomic Index, and \
                 Income for Men and Women",
            ),
            Section::SummaryTable,
            Section::ControlsWithChart,
            Section::SubHeading("Occupational Prestige vs. Income for Men and Women"),
            Section::Scatter,
            Section::SideBySideBoxes,
            Section::SubHeading(
                "Distribution of Income for Varying Occupational Prestige by Gender",
            ),
            Section::FacetGrid,
        ],
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render every section top to bottom.
pub fn render(ui: &mut Ui, state: &mut AppState) {
    let sections = state.page.sections.clone();
    for section in sections {
        match section {
            Section::Heading(text) => {
                ui.heading(text);
            }
            Section::SubHeading(text) => {
                ui.add_space(8.0);
                ui.strong(text);
            }
            Section::Prose(paragraphs) => panels::prose(ui, paragraphs),
            Section::SummaryTable => table::summary_table(ui, &state.figures.summary),
            Section::ControlsWithChart => controls_with_chart(ui, state),
            Section::Scatter => plot::scatter_plot(ui, &state.figures.scatter),
            Section::SideBySideBoxes => side_by_side_boxes(ui, state),
            Section::FacetGrid => plot::facet_grid(ui, &state.figures.facets),
        }
        ui.add_space(4.0);
    }
}

fn controls_with_chart(ui: &mut Ui, state: &mut AppState) {
    let size = egui::vec2(ui.available_width(), BAR_HEIGHT);
    ui.allocate_ui(size, |ui: &mut Ui| {
        StripBuilder::new(ui)
            .size(Size::relative(0.25))
            .size(Size::remainder())
            .horizontal(|mut strip| {
                strip.cell(|ui: &mut Ui| panels::controls(ui, state));
                strip.cell(|ui: &mut Ui| panels::interactive_chart(ui, state));
            });
    });
}

fn side_by_side_boxes(ui: &mut Ui, state: &AppState) {
    let size = egui::vec2(ui.available_width(), BOX_HEIGHT + 30.0);
    ui.allocate_ui(size, |ui: &mut Ui| {
        StripBuilder::new(ui)
            .size(Size::relative(0.5))
            .size(Size::remainder())
            .horizontal(|mut strip| {
                strip.cell(|ui: &mut Ui| {
                    ui.strong("Distribution of Income by Gender");
                    plot::box_plot(ui, "income_box", &state.figures.income_box, BOX_HEIGHT);
                });
                strip.cell(|ui: &mut Ui| {
                    ui.strong("Distribution of Occupational Prestige by Gender");
                    plot::box_plot(ui, "prestige_box", &state.figures.prestige_box, BOX_HEIGHT);
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_in_fixed_order() {
        let page = compose();
        let kinds: Vec<&str> = page
            .sections
            .iter()
            .map(|s| match s {
                Section::Heading(_) => "heading",
                Section::SubHeading(_) => "subheading",
                Section::Prose(_) => "prose",
                Section::SummaryTable => "table",
                Section::ControlsWithChart => "controls",
                Section::Scatter => "scatter",
                Section::SideBySideBoxes => "boxes",
                Section::FacetGrid => "facets",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "heading", "prose", "subheading", "table", "controls", "subheading", "scatter",
                "boxes", "subheading", "facets",
            ]
        );
    }

    #[test]
    fn test_prose_links_out() {
        let links: Vec<&str> = INTRODUCTION
            .iter()
            .flat_map(|p| p.iter())
            .filter_map(|span| match span {
                Span::Link { url, .. } => Some(*url),
                Span::Text(_) => None,
            })
            .collect();
        assert_eq!(links.len(), 4);
        assert!(links.iter().all(|u| u.starts_with("http")));
    }
}
