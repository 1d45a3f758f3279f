use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use eframe::egui::Color32;
use serde::Serialize;

use super::Sex;
use crate::color::ColorMap;
use crate::data::filter::complete_rows;
use crate::data::model::{Cell, SurveyTable};
use crate::error::{DataError, ResolveError};

pub const BAR_HEIGHT: f32 = 800.0;

// ---------------------------------------------------------------------------
// Selectable attributes
// ---------------------------------------------------------------------------

/// Attitude question shown along the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DisplayAttribute {
    SatJob,
    Relationship,
    MaleBreadwinner,
    MenBetterSuited,
    ChildSuffer,
    MenOverwork,
}

impl DisplayAttribute {
    pub const ALL: [DisplayAttribute; 6] = [
        DisplayAttribute::SatJob,
        DisplayAttribute::Relationship,
        DisplayAttribute::MaleBreadwinner,
        DisplayAttribute::MenBetterSuited,
        DisplayAttribute::ChildSuffer,
        DisplayAttribute::MenOverwork,
    ];

    /// Column name, also used as the dropdown label.
    pub fn column(self) -> &'static str {
        match self {
            DisplayAttribute::SatJob => "satjob",
            DisplayAttribute::Relationship => "relationship",
            DisplayAttribute::MaleBreadwinner => "male_breadwinner",
            DisplayAttribute::MenBetterSuited => "men_bettersuited",
            DisplayAttribute::ChildSuffer => "child_suffer",
            DisplayAttribute::MenOverwork => "men_overwork",
        }
    }
}

/// Demographic attribute the bars are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupBy {
    Sex,
    Region,
    Education,
}

impl GroupBy {
    pub const ALL: [GroupBy; 3] = [GroupBy::Sex, GroupBy::Region, GroupBy::Education];

    pub fn column(self) -> &'static str {
        match self {
            GroupBy::Sex => "sex",
            GroupBy::Region => "region",
            GroupBy::Education => "education",
        }
    }
}

/// The two dropdown values of one dashboard window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    pub display: DisplayAttribute,
    pub group_by: GroupBy,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            display: DisplayAttribute::MaleBreadwinner,
            group_by: GroupBy::Sex,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.display.column(), self.group_by.column())
    }
}

// ---------------------------------------------------------------------------
// Grouped bar figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// Index into [`BarFigure::categories`].
    pub category: usize,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroup {
    pub label: String,
    #[serde(skip)]
    pub color: Color32,
    /// Only combinations that occur; ascending by category.
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarFigure {
    pub selection: Selection,
    pub x_label: &'static str,
    pub legend_title: &'static str,
    /// Distinct display values, ascending.
    pub categories: Vec<String>,
    pub groups: Vec<BarGroup>,
    pub height: f32,
}

impl BarFigure {
    pub fn bar_count(&self) -> usize {
        self.groups.iter().map(|g| g.bars.len()).sum()
    }

    pub fn total_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| &g.bars)
            .map(|b| b.count)
            .sum()
    }
}

/// Count respondents per (group-by value, display value) pair.
///
/// Rows missing either value are dropped; pairs that never occur get no bar.
pub fn resolve(table: &SurveyTable, selection: Selection) -> Result<BarFigure, ResolveError> {
    let display = selection.display.column();
    let group_by = selection.group_by.column();

    count_pairs(table, display, group_by)
        .map(|counts| build_figure(selection, counts))
        .map_err(|source| ResolveError::Aggregation {
            display,
            group_by,
            source,
        })
}

fn count_pairs(
    table: &SurveyTable,
    display: &str,
    group_by: &str,
) -> Result<BTreeMap<(Cell, Cell), usize>, DataError> {
    let display_cells = &table.column(display)?.cells;
    let group_cells = &table.column(group_by)?.cells;

    let mut counts: BTreeMap<(Cell, Cell), usize> = BTreeMap::new();
    for row in complete_rows(table, &[group_by, display])? {
        *counts
            .entry((group_cells[row].clone(), display_cells[row].clone()))
            .or_default() += 1;
    }
    Ok(counts)
}

fn build_figure(selection: Selection, counts: BTreeMap<(Cell, Cell), usize>) -> BarFigure {
    let categories: BTreeSet<&Cell> = counts.keys().map(|(_, d)| d).collect();
    let category_index: BTreeMap<&Cell, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (*c, i))
        .collect();

    let group_values: BTreeSet<Cell> = counts.keys().map(|(g, _)| g.clone()).collect();
    let colors = match selection.group_by {
        GroupBy::Sex => Sex::color_map(),
        _ => ColorMap::new(&group_values),
    };

    let mut groups: Vec<BarGroup> = Vec::new();
    for ((group, category), count) in &counts {
        let label = group.to_string();
        if groups.last().map_or(true, |g| g.label != label) {
            groups.push(BarGroup {
                label,
                color: colors.color_for(group),
                bars: Vec::new(),
            });
        }
        if let Some(current) = groups.last_mut() {
            current.bars.push(Bar {
                category: category_index[category],
                count: *count,
            });
        }
    }

    BarFigure {
        selection,
        x_label: selection.display.column(),
        legend_title: selection.group_by.column(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        groups,
        height: BAR_HEIGHT,
    }
}
