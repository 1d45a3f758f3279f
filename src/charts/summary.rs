use serde::Serialize;

use super::{Sex, round2, sex_column};
use crate::data::model::SurveyTable;
use crate::error::DataError;

/// Averaged columns with their display labels, in table order.
pub const SUMMARY_COLUMNS: [(&str, &str); 4] = [
    ("education", "Mean Years of Education"),
    ("job_prestige", "Mean Job Prestige Score"),
    ("socioeconomic_index", "Mean Socioeconomic Index"),
    ("income", "Mean Income"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub sex: Sex,
    /// Means rounded to two decimals; `None` when the group has no values.
    pub means: [Option<f64>; 4],
}

impl SummaryRow {
    /// Display cells: the sex label followed by each mean with two decimals.
    pub fn cells(&self) -> Vec<String> {
        std::iter::once(self.sex.label().to_string())
            .chain(
                self.means
                    .iter()
                    .map(|m| m.map(|v| format!("{v:.2}")).unwrap_or_default()),
            )
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<SummaryRow>,
}

/// Mean education, job prestige, socioeconomic index and income per sex.
///
/// Absent values are skipped per column. One row per sex, always.
pub fn summarize(table: &SurveyTable) -> Result<SummaryTable, DataError> {
    let sex = sex_column(table)?;
    let values = SUMMARY_COLUMNS
        .iter()
        .map(|(name, _)| table.numeric(name))
        .collect::<Result<Vec<_>, _>>()?;

    let rows = Sex::ALL
        .into_iter()
        .map(|group| {
            let mut means = [None; 4];
            for (slot, column) in means.iter_mut().zip(&values) {
                let (sum, count) = column
                    .iter()
                    .zip(&sex)
                    .filter(|(_, s)| **s == Some(group))
                    .filter_map(|(v, _)| *v)
                    .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
                *slot = (count > 0).then(|| round2(sum / count as f64));
            }
            SummaryRow { sex: group, means }
        })
        .collect();

    let headers = std::iter::once("Gender")
        .chain(SUMMARY_COLUMNS.iter().map(|(_, label)| *label))
        .collect();

    Ok(SummaryTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::fixtures;
    use crate::data::model::{Cell, Column};

    #[test]
    fn test_summary_has_one_row_per_sex() {
        let summary = summarize(&fixtures::survey()).unwrap();
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].sex, Sex::Men);
        assert_eq!(summary.rows[1].sex, Sex::Women);
        assert_eq!(
            summary.headers,
            vec![
                "Gender",
                "Mean Years of Education",
                "Mean Job Prestige Score",
                "Mean Socioeconomic Index",
                "Mean Income"
            ]
        );
        // men income: 40, 55, 70, 20
        assert_eq!(summary.rows[0].means[3], Some(46.25));
        // women education: 14, 12, 16, 12
        assert_eq!(summary.rows[1].means[0], Some(13.5));
    }

    #[test]
    fn test_means_rounded_and_absent_skipped() {
        let table = SurveyTable::new(vec![
            Column::new("sex", vec![Cell::Text("men".into()); 4]),
            Column::new(
                "education",
                vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Number(2.0), Cell::Absent],
            ),
            Column::new("job_prestige", vec![Cell::Absent; 4]),
            Column::new("socioeconomic_index", vec![Cell::Number(1.0 / 3.0); 4]),
            Column::new("income", vec![Cell::Number(10.0); 4]),
        ])
        .unwrap();
        let summary = summarize(&table).unwrap();
        let men = &summary.rows[0];
        assert_eq!(men.means, [Some(1.67), None, Some(0.33), Some(10.0)]);
        assert_eq!(men.cells(), vec!["men", "1.67", "", "0.33", "10.00"]);

        // no women at all still yields a row
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[1].means, [None; 4]);
    }
}
