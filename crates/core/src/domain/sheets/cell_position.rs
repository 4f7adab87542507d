use super::{column::Column, row::Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub col: Column,
    pub row: Row,
}

impl CellPosition {
    pub fn new(col: Column, row: Row) -> Self {
        Self { col, row }
    }

    /// Local (sheet-less) A1 reference, e.g. `G12`.
    pub fn a1(&self) -> String {
        format!("{}{}", self.col, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a1() {
        let position = CellPosition::new(Column::from_index(6), Row::from_row(12));
        assert_eq!(position.a1(), "G12");
    }
}
