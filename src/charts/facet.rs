use serde::Serialize;

use super::boxplot::{BoxSeries, series_by_sex};
use super::{Sex, sex_column};
use crate::data::model::SurveyTable;
use crate::error::DataError;

pub const BIN_COUNT: usize = 6;
pub const FACET_COLUMNS: usize = 2;
pub const FACET_HEIGHT: f32 = 1500.0;

/// Share of the range the lowest edge is pushed down so the minimum lands
/// inside the first right-closed interval.
const EDGE_ADJUST: f64 = 0.001;

// ---------------------------------------------------------------------------
// Prestige bins
// ---------------------------------------------------------------------------

/// One right-closed interval `(lower, upper]`. `index` is its rank, 0 = lowest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrestigeBin {
    pub index: usize,
    pub lower: f64,
    pub upper: f64,
}

impl PrestigeBin {
    pub fn contains(&self, x: f64) -> bool {
        self.lower < x && x <= self.upper
    }

    /// Interval text, e.g. `(15.936, 26.667]`.
    pub fn label(&self) -> String {
        format!("({}, {}]", format_edge(self.lower), format_edge(self.upper))
    }

    pub fn facet_title(&self) -> String {
        format!("Job Prestige = {}", self.label())
    }
}

/// Six equal-width intervals spanning the observed values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrestigeBins {
    edges: [f64; BIN_COUNT + 1],
}

impl PrestigeBins {
    /// Cut the observed range into six bins. `None` when there are no values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let degenerate = min == max;
        if degenerate {
            let pad = |v: f64| if v == 0.0 { EDGE_ADJUST } else { EDGE_ADJUST * v.abs() };
            min -= pad(min);
            max += pad(max);
        }

        let mut edges = [0.0; BIN_COUNT + 1];
        for (i, edge) in edges.iter_mut().enumerate() {
            *edge = min + (max - min) * i as f64 / BIN_COUNT as f64;
        }
        edges[BIN_COUNT] = max;
        if !degenerate {
            edges[0] -= (max - min) * EDGE_ADJUST;
        }
        Some(PrestigeBins { edges })
    }

    /// All bins in ascending order.
    pub fn bins(&self) -> Vec<PrestigeBin> {
        self.edges
            .windows(2)
            .enumerate()
            .map(|(index, pair)| PrestigeBin {
                index,
                lower: pair[0],
                upper: pair[1],
            })
            .collect()
    }

    /// Index of the bin holding `x`, if inside the covered range.
    pub fn bin_of(&self, x: f64) -> Option<usize> {
        self.bins().iter().position(|b| b.contains(x))
    }
}

/// Round to three significant decimals and print like a float literal
/// (`48.0`, `26.667`).
fn format_edge(x: f64) -> String {
    if !x.is_finite() || x == 0.0 {
        return format!("{x:.1}");
    }
    let digits = if x.trunc() == 0.0 {
        -(x.fract().abs().log10().floor() as i32) - 1 + 3
    } else {
        3
    };
    let scale = 10f64.powi(digits);
    let rounded = (x * scale).round() / scale;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

// ---------------------------------------------------------------------------
// Binned records and the faceted figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinnedRecord {
    pub income: f64,
    pub sex: Sex,
    pub bin: usize,
}

/// Rows with income, sex and job prestige all present, tagged with their bin.
///
/// Bin edges span every observed job prestige, including rows later dropped
/// for a missing income or sex.
pub fn binned_records(table: &SurveyTable) -> Result<(PrestigeBins, Vec<BinnedRecord>), DataError> {
    let sex = sex_column(table)?;
    let income = table.numeric("income")?;
    let prestige = table.numeric("job_prestige")?;

    let observed: Vec<f64> = prestige.iter().flatten().copied().collect();
    let bins = PrestigeBins::from_values(&observed)
        .ok_or_else(|| DataError::NoObservations("job_prestige".to_string()))?;

    let records = (0..table.len())
        .filter_map(|row| Some((income[row]?, sex[row]?, prestige[row]?)))
        .filter_map(|(income, sex, p)| {
            Some(BinnedRecord {
                income,
                sex,
                bin: bins.bin_of(p)?,
            })
        })
        .collect();
    Ok((bins, records))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetPanel {
    pub bin: PrestigeBin,
    pub title: String,
    pub boxes: Vec<BoxSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetFigure {
    pub y_label: &'static str,
    pub columns: usize,
    pub height: f32,
    /// Always six panels, ascending by bin.
    pub panels: Vec<FacetPanel>,
}

impl FacetFigure {
    pub fn rows(&self) -> usize {
        self.panels.len().div_ceil(self.columns)
    }
}

/// Income by sex, one panel per job-prestige bin.
pub fn income_by_prestige_bin(table: &SurveyTable) -> Result<FacetFigure, DataError> {
    let (bins, records) = binned_records(table)?;

    let panels = bins
        .bins()
        .into_iter()
        .map(|bin| {
            let values: Vec<(Sex, f64)> = records
                .iter()
                .filter(|r| r.bin == bin.index)
                .map(|r| (r.sex, r.income))
                .collect();
            FacetPanel {
                bin,
                title: bin.facet_title(),
                boxes: series_by_sex(&values),
            }
        })
        .collect();

    Ok(FacetFigure {
        y_label: "Income",
        columns: FACET_COLUMNS,
        height: FACET_HEIGHT,
        panels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::fixtures;
    use proptest::prelude::*;

    #[test]
    fn test_gss_prestige_range_labels() {
        let bins = PrestigeBins::from_values(&[16.0, 80.0, 47.0]).unwrap();
        let labels: Vec<String> = bins.bins().iter().map(|b| b.label()).collect();
        assert_eq!(
            labels,
            vec![
                "(15.936, 26.667]",
                "(26.667, 37.333]",
                "(37.333, 48.0]",
                "(48.0, 58.667]",
                "(58.667, 69.333]",
                "(69.333, 80.0]",
            ]
        );
        assert_eq!(bins.bin_of(16.0), Some(0));
        assert_eq!(bins.bin_of(80.0), Some(5));
        assert_eq!(bins.bin_of(48.0), Some(2));
        assert_eq!(bins.bin_of(81.0), None);
        assert_eq!(bins.bins()[2].facet_title(), "Job Prestige = (37.333, 48.0]");
    }

    #[test]
    fn test_single_value_range_is_widened() {
        let bins = PrestigeBins::from_values(&[50.0, 50.0]).unwrap();
        let all = bins.bins();
        assert!(all[0].lower < 50.0 && all[5].upper > 50.0);
        assert!(bins.bin_of(50.0).is_some());
        assert!(PrestigeBins::from_values(&[]).is_none());
    }

    #[test]
    fn test_facet_figure_has_six_ordered_panels() {
        let figure = income_by_prestige_bin(&fixtures::survey()).unwrap();
        assert_eq!(figure.panels.len(), 6);
        assert_eq!(figure.rows(), 3);
        assert_eq!(figure.height, 1500.0);
        let order: Vec<usize> = figure.panels.iter().map(|p| p.bin.index).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
        assert!(figure.panels[0].title.starts_with("Job Prestige = ("));
        let boxed: usize = figure
            .panels
            .iter()
            .flat_map(|p| &p.boxes)
            .map(|b| b.count)
            .sum();
        assert_eq!(boxed, 8);
    }

    #[test]
    fn test_rows_missing_fields_are_excluded() {
        let mut columns = fixtures::survey().columns().to_vec();
        let income = columns.iter_mut().find(|c| c.name == "income").unwrap();
        income.cells[0] = crate::data::model::Cell::Absent;
        let table = SurveyTable::new(columns).unwrap();
        let (_, records) = binned_records(&table).unwrap();
        assert_eq!(records.len(), 7);
    }

    #[test]
    fn test_bins_span_prestige_of_dropped_rows() {
        use crate::charts::fixtures::{num, text};
        use crate::data::model::{Cell, Column};

        let table = SurveyTable::new(vec![
            Column::new("sex", vec![text("men"), text("women"), text("men"), text("women")]),
            Column::new("income", vec![Cell::Absent, num(30.0), num(40.0), num(50.0)]),
            Column::new("job_prestige", vec![num(10.0), num(20.0), num(40.0), num(80.0)]),
        ])
        .unwrap();
        let (bins, records) = binned_records(&table).unwrap();
        let all = bins.bins();
        assert!((all[0].lower - 9.93).abs() < 1e-9, "first bin starts at {}", all[0].lower);
        assert_eq!(all[5].upper, 80.0);
        assert_eq!(records.len(), 3);
        let bins_used: Vec<usize> = records.iter().map(|r| r.bin).collect();
        assert_eq!(bins_used, vec![0, 2, 5]);
    }

    proptest! {
        #[test]
        fn prop_bins_contiguous_and_covering(mut values in prop::collection::vec(0.0f64..100.0, 1..200)) {
            let bins = PrestigeBins::from_values(&values).unwrap();
            let all = bins.bins();
            prop_assert_eq!(all.len(), BIN_COUNT);
            for pair in all.windows(2) {
                prop_assert_eq!(pair[0].upper, pair[1].lower);
                prop_assert!(pair[0].index < pair[1].index);
            }
            let interior = all[1].upper - all[1].lower;
            for bin in &all[1..] {
                prop_assert!(((bin.upper - bin.lower) - interior).abs() <= 1e-9 * interior.max(1.0));
            }
            for v in &values {
                prop_assert!(bins.bin_of(*v).is_some());
            }

            // order and edges do not depend on row order
            values.reverse();
            let reversed = PrestigeBins::from_values(&values).unwrap();
            prop_assert_eq!(reversed, bins);
        }
    }
}
