use eframe::egui::Color32;
use serde::Serialize;

use super::{Sex, sex_column};
use crate::data::model::SurveyTable;
use crate::error::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Hover-only metadata.
    pub education: Option<f64>,
    pub socioeconomic_index: Option<f64>,
}

/// Ordinary least-squares fit `y = intercept + slope * x` over `[x_min, x_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub x_min: f64,
    pub x_max: f64,
}

impl TrendLine {
    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// End points of the fitted segment.
    pub fn endpoints(&self) -> [[f64; 2]; 2] {
        [
            [self.x_min, self.at(self.x_min)],
            [self.x_max, self.at(self.x_max)],
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub sex: Sex,
    #[serde(skip)]
    pub color: Color32,
    pub points: Vec<ScatterPoint>,
    pub trend: Option<TrendLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterFigure {
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<ScatterSeries>,
}

impl ScatterFigure {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// The point under the cursor, matched exactly within the named series.
    pub fn find_point(&self, series: &str, x: f64, y: f64) -> Option<(&ScatterSeries, &ScatterPoint)> {
        let s = self.series.iter().find(|s| s.sex.label() == series)?;
        let p = s.points.iter().find(|p| p.x == x && p.y == y)?;
        Some((s, p))
    }
}

/// Job prestige (x) against income (y), one coloured series per sex, each
/// with its own trend line.
pub fn prestige_vs_income(table: &SurveyTable) -> Result<ScatterFigure, DataError> {
    let sex = sex_column(table)?;
    let prestige = table.numeric("job_prestige")?;
    let income = table.numeric("income")?;
    let education = table.numeric("education")?;
    let sei = table.numeric("socioeconomic_index")?;

    let series = Sex::ALL
        .into_iter()
        .map(|group| {
            let points: Vec<ScatterPoint> = (0..table.len())
                .filter(|&row| sex[row] == Some(group))
                .filter_map(|row| {
                    Some(ScatterPoint {
                        x: prestige[row]?,
                        y: income[row]?,
                        education: education[row],
                        socioeconomic_index: sei[row],
                    })
                })
                .collect();
            let trend = fit_ols(points.iter().map(|p| (p.x, p.y)));
            ScatterSeries {
                sex: group,
                color: group.color(),
                points,
                trend,
            }
        })
        .collect();

    Ok(ScatterFigure {
        x_label: "Job Prestige Score",
        y_label: "Income",
        series,
    })
}

/// Fit a straight line by least squares.
///
/// Needs at least two points with distinct x values.
pub fn fit_ols(points: impl Iterator<Item = (f64, f64)>) -> Option<TrendLine> {
    let points: Vec<(f64, f64)> = points.collect();
    let n = points.len();
    if n < 2 {
        return None;
    }
    let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    if x_min == x_max {
        return None;
    }

    let n_f = n as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n_f;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n_f;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in &points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if syy > 0.0 { (sxy * sxy) / (sxx * syy) } else { 1.0 };

    Some(TrendLine {
        slope,
        intercept,
        r_squared,
        x_min,
        x_max,
    })
}
