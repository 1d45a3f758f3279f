/// Chart derivations: pure functions from the survey table to figure data.
///
/// The static figures are built once at startup; only [`bar::resolve`] runs
/// again, once per selection change.

pub mod bar;
pub mod boxplot;
pub mod facet;
pub mod scatter;
pub mod summary;

use eframe::egui::Color32;
use serde::Serialize;

use crate::color::ColorMap;
use crate::data::model::{Cell, SurveyTable};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Sex – the fixed two-level grouping shared by every static figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Sex {
    Men,
    Women,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Men, Sex::Women];

    pub fn label(self) -> &'static str {
        match self {
            Sex::Men => "men",
            Sex::Women => "women",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            Sex::Men => Color32::BLUE,
            Sex::Women => Color32::RED,
        }
    }

    pub fn from_label(label: &str) -> Option<Sex> {
        Sex::ALL.into_iter().find(|s| s.label() == label)
    }

    pub fn color_map() -> ColorMap {
        ColorMap::fixed(
            Sex::ALL
                .into_iter()
                .map(|s| (Cell::Text(s.label().to_string()), s.color())),
        )
    }
}

/// The sex column as `Sex` values, `None` where absent.
pub fn sex_column(table: &SurveyTable) -> Result<Vec<Option<Sex>>, DataError> {
    let column = table.column("sex")?;
    column
        .cells
        .iter()
        .map(|cell| match cell {
            Cell::Absent => Ok(None),
            Cell::Text(s) => Sex::from_label(s).map(Some).ok_or_else(|| unexpected_sex(cell)),
            Cell::Number(_) => Err(unexpected_sex(cell)),
        })
        .collect()
}

fn unexpected_sex(cell: &Cell) -> DataError {
    DataError::UnexpectedCategory {
        column: "sex".to_string(),
        value: cell.to_string(),
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// StaticFigures – everything computed once at startup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticFigures {
    pub summary: summary::SummaryTable,
    pub scatter: scatter::ScatterFigure,
    pub income_box: boxplot::BoxFigure,
    pub prestige_box: boxplot::BoxFigure,
    pub facets: facet::FacetFigure,
}

impl StaticFigures {
    /// Run every static derivation eagerly so data problems surface before
    /// the window opens.
    pub fn build(table: &SurveyTable) -> Result<Self, DataError> {
        let figures = StaticFigures {
            summary: summary::summarize(table)?,
            scatter: scatter::prestige_vs_income(table)?,
            income_box: boxplot::by_sex(table, "income", "Income")?,
            prestige_box: boxplot::by_sex(table, "job_prestige", "Job Prestige Score")?,
            facets: facet::income_by_prestige_bin(table)?,
        };
        log::info!(
            "Built static figures: {} scatter points, {} facet panels",
            figures.scatter.point_count(),
            figures.facets.panels.len()
        );
        Ok(figures)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::data::model::{Cell, Column, SurveyTable};

    pub fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    pub fn num(v: f64) -> Cell {
        Cell::Number(v)
    }

    /// A small cleaned table with the columns the figures read.
    pub fn survey() -> SurveyTable {
        let sex = ["men", "women", "men", "women", "men", "women", "men", "women"];
        let income = [40.0, 30.0, 55.0, 35.0, 70.0, 45.0, 20.0, 25.0];
        let prestige = [30.0, 20.0, 45.0, 35.0, 80.0, 60.0, 16.0, 50.0];
        let education = [12.0, 14.0, 16.0, 12.0, 18.0, 16.0, 10.0, 12.0];
        let sei = [30.0, 40.0, 50.0, 45.0, 90.0, 70.0, 20.0, 60.0];
        let breadwinner = [
            "agree", "disagree", "agree", "strongly disagree", "disagree", "disagree", "agree",
            "disagree",
        ];
        let region = [
            "pacific", "new england", "pacific", "south atlantic", "new england", "pacific",
            "pacific", "south atlantic",
        ];
        SurveyTable::new(vec![
            Column::new("sex", sex.iter().map(|s| text(s)).collect()),
            Column::new("income", income.iter().map(|v| num(*v)).collect()),
            Column::new("job_prestige", prestige.iter().map(|v| num(*v)).collect()),
            Column::new("education", education.iter().map(|v| num(*v)).collect()),
            Column::new("socioeconomic_index", sei.iter().map(|v| num(*v)).collect()),
            Column::new("male_breadwinner", breadwinner.iter().map(|s| text(s)).collect()),
            Column::new("region", region.iter().map(|s| text(s)).collect()),
        ])
        .unwrap()
    }
}
