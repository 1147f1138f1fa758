use invex_client::{PageTables, Table};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("header cells are read-only")]
    HeaderReadOnly,
    #[error("no cell at table {table}, row {row}, column {col}")]
    OutOfRange { table: usize, row: usize, col: usize },
}

/// Extracted tables; row 0 of each table is its header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSet {
    tables: Vec<Table>,
}

impl TableSet {
    #[must_use]
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// All tables of all pages, in page order.
    #[must_use]
    pub fn from_pages(pages: Vec<PageTables>) -> Self {
        Self::new(pages.into_iter().flat_map(|p| p.tables).collect())
    }

    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn cell(&self, table: usize, row: usize, col: usize) -> Option<&str> {
        self.tables
            .get(table)?
            .get(row)?
            .get(col)
            .map(String::as_str)
    }

    /// Overwrite one body cell.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::HeaderReadOnly`] for row 0 and
    /// [`EditError::OutOfRange`] for coordinates outside the table.
    pub fn set_cell(
        &mut self,
        table: usize,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let out_of_range = EditError::OutOfRange { table, row, col };
        let cell = self
            .tables
            .get_mut(table)
            .and_then(|t| t.get_mut(row))
            .and_then(|r| r.get_mut(col))
            .ok_or(out_of_range)?;
        if row == 0 {
            return Err(EditError::HeaderReadOnly);
        }
        *cell = value.into();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        rows.iter()
            .map(|r| r.iter().map(|&c| c.to_owned()).collect())
            .collect()
    }

    fn sample() -> TableSet {
        TableSet::new(vec![
            table(&[&["Item", "Qty"], &["Bolt", "4"], &["Nut", "8"]]),
            table(&[&["Tax"], &["7%"]]),
        ])
    }

    #[test]
    fn edit_changes_only_target_cell() {
        let mut set = sample();
        let before = set.clone();
        set.set_cell(0, 2, 1, "9").unwrap();
        assert_eq!(set.cell(0, 2, 1), Some("9"));
        for (t, tbl) in before.tables().iter().enumerate() {
            for (r, row) in tbl.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    if (t, r, c) != (0, 2, 1) {
                        assert_eq!(set.cell(t, r, c), Some(cell.as_str()));
                    }
                }
            }
        }
    }

    #[test]
    fn header_is_read_only() {
        let mut set = sample();
        assert_eq!(set.set_cell(0, 0, 0, "x"), Err(EditError::HeaderReadOnly));
        assert_eq!(set.cell(0, 0, 0), Some("Item"));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut set = sample();
        assert_eq!(
            set.set_cell(1, 1, 5, "x"),
            Err(EditError::OutOfRange {
                table: 1,
                row: 1,
                col: 5
            })
        );
        assert!(set.set_cell(9, 1, 0, "x").is_err());
        assert_eq!(set, sample());
    }

    #[test]
    fn pages_are_flattened_in_order() {
        let set = TableSet::from_pages(vec![
            PageTables {
                tables: vec![table(&[&["A"]])],
            },
            PageTables { tables: Vec::new() },
            PageTables {
                tables: vec![table(&[&["B"]]), table(&[&["C"]])],
            },
        ]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.cell(2, 0, 0), Some("C"));
    }

    proptest! {
        #[test]
        fn any_body_edit_touches_one_cell(row in 1usize..3, col in 0usize..2, value in "[a-z0-9 ]{0,8}") {
            let base = sample();
            let mut set = base.clone();
            set.set_cell(0, row, col, value.clone()).unwrap();
            prop_assert_eq!(set.cell(0, row, col), Some(value.as_str()));
            prop_assert_eq!(&set.tables()[1], &base.tables()[1]);
            prop_assert_eq!(&set.tables()[0][0], &base.tables()[0][0]);
        }
    }
}
