use super::model::SurveyTable;
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// Return indices of rows whose cells are present in every named column.
///
/// An empty column list keeps every row. Naming a column the table does not
/// have is an error rather than an empty result.
pub fn complete_rows(table: &SurveyTable, columns: &[&str]) -> Result<Vec<usize>, DataError> {
    let selected = columns
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((0..table.len())
        .filter(|&row| selected.iter().all(|col| !col.cells[row].is_absent()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Cell, Column};

    #[test]
    fn test_complete_rows_drops_any_absent() {
        let table = SurveyTable::new(vec![
            Column::new("a", vec![Cell::Number(1.0), Cell::Absent, Cell::Number(3.0)]),
            Column::new("b", vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Absent]),
        ])
        .unwrap();
        assert_eq!(complete_rows(&table, &["a"]).unwrap(), vec![0, 2]);
        assert_eq!(complete_rows(&table, &["a", "b"]).unwrap(), vec![0]);
        assert_eq!(complete_rows(&table, &[]).unwrap(), vec![0, 1, 2]);
        assert!(complete_rows(&table, &["c"]).is_err());
    }
}
