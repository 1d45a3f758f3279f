use eframe::egui::Color32;
use serde::Serialize;

use super::{Sex, sex_column};
use crate::data::model::SurveyTable;
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Five-number summary with Tukey whiskers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

/// Quantile by linear interpolation between closest ranks (`q * (n - 1)`).
/// `sorted` must be ascending and non-empty.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Box statistics plus the observations beyond the whiskers.
///
/// Whiskers reach the most extreme observations within 1.5 IQR of the box.
pub fn box_stats(values: &[f64]) -> Option<(BoxStats, Vec<f64>)> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let fence = 1.5 * (q3 - q1);
    let (low_fence, high_fence) = (q1 - fence, q3 + fence);

    let inside = || sorted.iter().copied().filter(|v| *v >= low_fence && *v <= high_fence);
    let lower_whisker = inside().next().unwrap_or(q1);
    let upper_whisker = inside().last().unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some((
        BoxStats {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        },
        outliers,
    ))
}

// ---------------------------------------------------------------------------
// Box figure: one box per sex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSeries {
    pub sex: Sex,
    #[serde(skip)]
    pub color: Color32,
    pub stats: BoxStats,
    pub outliers: Vec<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxFigure {
    pub y_label: &'static str,
    /// The x axis already names each sex, so the legend stays hidden.
    pub show_legend: bool,
    pub boxes: Vec<BoxSeries>,
}

/// Group values by sex and summarise each group. A sex with no values gets
/// no box.
pub fn series_by_sex(values: &[(Sex, f64)]) -> Vec<BoxSeries> {
    Sex::ALL
        .into_iter()
        .filter_map(|group| {
            let group_values: Vec<f64> = values
                .iter()
                .filter(|(s, _)| *s == group)
                .map(|(_, v)| *v)
                .collect();
            let (stats, outliers) = box_stats(&group_values)?;
            Some(BoxSeries {
                sex: group,
                color: group.color(),
                stats,
                outliers,
                count: group_values.len(),
            })
        })
        .collect()
}

/// Distribution of one numeric column by sex.
pub fn by_sex(table: &SurveyTable, column: &str, y_label: &'static str) -> Result<BoxFigure, DataError> {
    let sex = sex_column(table)?;
    let values = table.numeric(column)?;
    let pairs: Vec<(Sex, f64)> = sex
        .iter()
        .zip(&values)
        .filter_map(|(s, v)| Some(((*s)?, (*v)?)))
        .collect();

    Ok(BoxFigure {
        y_label,
        show_legend: false,
        boxes: series_by_sex(&pairs),
    })
}
