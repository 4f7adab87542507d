use std::fmt::Formatter;

/// Zero-based row index. Displays as the 1-based row number used in A1 notation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Row {
    index: u32,
}

impl Row {
    pub fn from_index(index: u32) -> Self {
        Row { index }
    }

    /// Builds a row from its 1-based spreadsheet number. Zero saturates to the first row.
    pub fn from_row(row: u32) -> Self {
        Row {
            index: row.saturating_sub(1),
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// 1-based row number.
    /// ```
    /// use driver_log_core::domain::sheets::row::Row;
    /// assert_eq!(Row::from_index(0).number(), 1);
    /// assert_eq!(Row::from_index(41).number(), 42);
    /// ```
    pub fn number(&self) -> u32 {
        self.index.saturating_add(1)
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row({})", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_number_is_one_based() {
        assert_eq!(Row::from_index(0).number(), 1);
        assert_eq!(Row::from_row(2).index(), 1);
    }

    #[test]
    fn test_zero_row_saturates() {
        assert_eq!(Row::from_row(0), Row::from_index(0));
    }

    #[test]
    fn test_display_and_debug() {
        let row = Row::from_index(4);
        assert_eq!(row.to_string(), "5");
        assert_eq!(format!("{:?}", row), "Row(5)");
    }
}
