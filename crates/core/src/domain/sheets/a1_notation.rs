use std::fmt::Formatter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Notation(pub String);

impl std::fmt::Display for A1Notation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<A1Notation> for String {
    fn from(a1_notation: A1Notation) -> Self {
        a1_notation.0
    }
}

impl AsRef<str> for A1Notation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub trait ToA1Notation {
    fn to_a1_notation(&self) -> A1Notation;
}

/// Quotes a sheet title for use as an A1 prefix, doubling embedded single quotes.
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

pub(super) fn with_sheet_prefix(sheet_title: Option<&str>, local: String) -> A1Notation {
    match sheet_title {
        Some(title) => A1Notation(format!("{}!{}", quote_sheet_title(title), local)),
        None => A1Notation(local),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain_title() {
        assert_eq!(quote_sheet_title("Ivanov"), "'Ivanov'");
    }

    #[test]
    fn test_quote_title_with_apostrophe() {
        assert_eq!(quote_sheet_title("O'Neil"), "'O''Neil'");
    }

    #[test]
    fn test_prefix_is_optional() {
        assert_eq!(with_sheet_prefix(None, "A1".into()).0, "A1");
        assert_eq!(
            with_sheet_prefix(Some("Петров И."), "A1".into()).0,
            "'Петров И.'!A1"
        );
    }
}
