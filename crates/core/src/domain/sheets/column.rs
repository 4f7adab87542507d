use std::{fmt::Formatter, str::FromStr};

use thiserror::Error;

/// Zero-based column index. Displays as spreadsheet letters (`A`, `Z`, `AA`, ...).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Column {
    index: u32,
}

impl Column {
    pub const fn from_index(index: u32) -> Self {
        Column { index }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn letters(&self) -> String {
        let mut number = self.index + 1;
        let mut letters = Vec::new();
        while number > 0 {
            let remainder = (number - 1) % 26;
            letters.push((remainder as u8 + b'A') as char);
            number = (number - remainder - 1) / 26;
        }
        letters.iter().rev().collect()
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letters())
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Column({})", self.letters())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColumnParseError {
    #[error("Column letters cannot be empty")]
    Empty,
    #[error("Non-alphabetic character in column")]
    NonAlphabeticCharacter,
}

impl FromStr for Column {
    type Err = ColumnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ColumnParseError::Empty);
        }
        if s.chars().any(|c| !c.is_ascii_alphabetic()) {
            return Err(ColumnParseError::NonAlphabeticCharacter);
        }

        let number = s
            .chars()
            .map(|c| c.to_ascii_uppercase())
            .fold(0u32, |acc, c| {
                acc.saturating_mul(26)
                    .saturating_add(c as u32 - 'A' as u32 + 1)
            });

        Ok(Column::from_index(number - 1))
    }
}
