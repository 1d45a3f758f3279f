use super::model::{Cell, Column, SurveyTable};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Fixed reshaping rules for the GSS extract
// ---------------------------------------------------------------------------

/// Source columns kept from the raw extract, in output order.
pub const SELECTED_COLUMNS: &[&str] = &[
    "id", "wtss", "sex", "educ", "region", "age", "coninc", "prestg10", "mapres10",
    "papres10", "sei10", "satjob", "fechld", "fefam", "fepol", "fepresch", "meovrwrk",
];

/// Source name → readable name. Entries whose source column was not selected
/// are skipped.
pub const RENAMES: &[(&str, &str)] = &[
    ("wtss", "weight"),
    ("educ", "education"),
    ("coninc", "income"),
    ("prestg10", "job_prestige"),
    ("mapres10", "mother_job_prestige"),
    ("papres10", "father_job_prestige"),
    ("sei10", "socioeconomic_index"),
    ("fechld", "relationship"),
    ("fefam", "male_breadwinner"),
    ("fehire", "hire_women"),
    ("fejobaff", "preference_hire_women"),
    ("fepol", "men_bettersuited"),
    ("fepresch", "child_suffer"),
    ("meovrwrk", "men_overwork"),
];

pub const SEX_RECODE: &[(&str, &str)] = &[("female", "women"), ("male", "men")];

/// Top-coded age label and the value it stands for.
pub const AGE_TOP_CODE: (&str, &str) = ("89 or older", "89");

// ---------------------------------------------------------------------------
// Cleaning pipeline
// ---------------------------------------------------------------------------

/// Turn the raw extract into the dashboard's survey table.
///
/// Steps: select the fixed column subset, recognise numeric columns, rename,
/// recode sex, substitute the age top-code and cast age to float.
pub fn clean(raw: &SurveyTable) -> Result<SurveyTable, DataError> {
    let mut columns = SELECTED_COLUMNS
        .iter()
        .map(|name| raw.column(name).cloned())
        .collect::<Result<Vec<Column>, _>>()?;

    for column in &mut columns {
        coerce_numeric(column);
    }

    for (from, to) in RENAMES {
        match columns.iter_mut().find(|c| c.name == *from) {
            Some(column) => column.name = (*to).to_string(),
            None => log::debug!("Rename {from} -> {to} skipped: column not selected"),
        }
    }

    for column in &mut columns {
        match column.name.as_str() {
            "sex" => recode_sex(column)?,
            "age" => cast_age(column)?,
            _ => {}
        }
    }

    let table = SurveyTable::new(columns)?;
    if table.is_empty() {
        log::warn!("Survey extract has no respondents");
    }
    log::info!(
        "Cleaned survey table: {} respondents, columns {:?}",
        table.len(),
        table.column_names()
    );
    Ok(table)
}

/// Convert a text column to numbers when every present cell parses as a float.
/// Non-finite spellings (`inf`, `NAN`) count as missing.
pub fn coerce_numeric(column: &mut Column) {
    let parsed: Option<Vec<Cell>> = column
        .cells
        .iter()
        .map(|cell| match cell {
            Cell::Text(s) => s.parse::<f64>().ok().map(finite_or_absent),
            other => Some(other.clone()),
        })
        .collect();

    if let Some(cells) = parsed {
        column.cells = cells;
    }
}

fn finite_or_absent(v: f64) -> Cell {
    if v.is_finite() {
        Cell::Number(v)
    } else {
        Cell::Absent
    }
}

fn recode_sex(column: &mut Column) -> Result<(), DataError> {
    for cell in &mut column.cells {
        let Cell::Text(value) = cell else {
            if cell.is_absent() {
                continue;
            }
            return Err(DataError::UnexpectedCategory {
                column: column.name.clone(),
                value: cell.to_string(),
            });
        };
        let current = value.as_str();
        let recoded = SEX_RECODE
            .iter()
            .find(|(from, to)| current == *from || current == *to)
            .map(|(_, to)| *to)
            .ok_or_else(|| DataError::UnexpectedCategory {
                column: column.name.clone(),
                value: current.to_string(),
            })?;
        *value = recoded.to_string();
    }
    Ok(())
}

fn cast_age(column: &mut Column) -> Result<(), DataError> {
    let (label, replacement) = AGE_TOP_CODE;
    for (row, cell) in column.cells.iter_mut().enumerate() {
        if let Cell::Text(value) = cell {
            let text = if value.as_str() == label { replacement } else { value.as_str() };
            let number = text.parse::<f64>().map_err(|_| DataError::NotNumeric {
                column: "age".to_string(),
                row,
                value: value.clone(),
            })?;
            *cell = finite_or_absent(number);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    /// A raw extract with every selected column; overrides replace whole columns.
    fn raw_table(overrides: Vec<Column>) -> SurveyTable {
        let rows = 3;
        let columns = SELECTED_COLUMNS
            .iter()
            .map(|name| {
                overrides
                    .iter()
                    .find(|c| c.name == *name)
                    .cloned()
                    .unwrap_or_else(|| {
                        Column::new(*name, (0..rows).map(|i| text(&format!("{}", i + 1))).collect())
                    })
            })
            .chain(std::iter::once(Column::new("year", vec![text("2018"); rows])))
            .collect();
        SurveyTable::new(columns).unwrap()
    }

    fn sex_column() -> Column {
        Column::new("sex", vec![text("male"), text("female"), Cell::Absent])
    }

    #[test]
    fn test_clean_selects_and_renames() {
        let table = clean(&raw_table(vec![sex_column()])).unwrap();
        assert_eq!(
            table.column_names(),
            vec![
                "id", "weight", "sex", "education", "region", "age", "income", "job_prestige",
                "mother_job_prestige", "father_job_prestige", "socioeconomic_index", "satjob",
                "relationship", "male_breadwinner", "men_bettersuited", "child_suffer",
                "men_overwork",
            ]
        );
        assert!(table.column("year").is_err());
        assert!(table.column("hire_women").is_err());
        assert_eq!(
            table.numeric("income").unwrap(),
            vec![Some(1.0), Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn test_clean_recodes_sex() {
        let table = clean(&raw_table(vec![sex_column()])).unwrap();
        assert_eq!(
            table.column("sex").unwrap().cells,
            vec![text("men"), text("women"), Cell::Absent]
        );
    }

    #[test]
    fn test_unexpected_sex_is_rejected() {
        let sex = Column::new("sex", vec![text("male"), text("other"), text("female")]);
        let err = clean(&raw_table(vec![sex])).unwrap_err();
        assert_eq!(
            err,
            DataError::UnexpectedCategory {
                column: "sex".to_string(),
                value: "other".to_string()
            }
        );
    }

    #[test]
    fn test_age_top_code_becomes_ceiling_value() {
        let age = Column::new("age", vec![text("89 or older"), text("34"), Cell::Absent]);
        let table = clean(&raw_table(vec![sex_column(), age])).unwrap();
        assert_eq!(table.numeric("age").unwrap(), vec![Some(89.0), Some(34.0), None]);
    }

    #[test]
    fn test_non_numeric_age_fails() {
        let age = Column::new("age", vec![text("old"), text("34"), Cell::Absent]);
        let err = clean(&raw_table(vec![sex_column(), age])).unwrap_err();
        assert!(matches!(err, DataError::NotNumeric { row: 0, .. }));
    }

    #[test]
    fn test_missing_source_column_fails() {
        let raw = SurveyTable::new(vec![Column::new("id", vec![text("1")])]).unwrap();
        assert_eq!(
            clean(&raw).unwrap_err(),
            DataError::MissingColumn("wtss".to_string())
        );
    }

    #[test]
    fn test_coerce_numeric_leaves_mixed_columns_as_text() {
        let mut mixed = Column::new("region", vec![text("1"), text("new england")]);
        coerce_numeric(&mut mixed);
        assert_eq!(mixed.cells[0], text("1"));

        let mut numbers = Column::new("educ", vec![text("12"), Cell::Absent]);
        coerce_numeric(&mut numbers);
        assert_eq!(numbers.cells, vec![Cell::Number(12.0), Cell::Absent]);
    }

    #[test]
    fn test_coerce_numeric_drops_non_finite() {
        let mut column = Column::new(
            "coninc",
            vec![text("NAN"), text("inf"), text("-infinity"), text("25.5")],
        );
        coerce_numeric(&mut column);
        assert_eq!(
            column.cells,
            vec![Cell::Absent, Cell::Absent, Cell::Absent, Cell::Number(25.5)]
        );
    }
}
