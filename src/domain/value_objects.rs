use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum ISBN length in characters.
pub const ISBN_MAX_LEN: usize = 20;
/// Maximum title length in characters.
pub const TITLE_MAX_LEN: usize = 200;
/// Maximum author length in characters.
pub const AUTHOR_MAX_LEN: usize = 100;

/// Rejected input for a catalog field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("copy count must not be negative (got {0})")]
    NegativeCopyCount(i64),

    #[error("copy count {0} exceeds the maximum of {max}", max = CopyCount::MAX.value())]
    CopyCountTooLarge(i64),

    #[error("search term must not be empty")]
    EmptySearchTerm,
}

/// Trims `raw` and checks it against the field's length limits.
fn bounded_text(raw: &str, field: &'static str, max: usize) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    let actual = trimmed.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }

    Ok(trimmed.to_string())
}

macro_rules! bounded_text_type {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn parse(raw: &str) -> Result<Self, ValidationError> {
                bounded_text(raw, $field, $max).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

bounded_text_type!(
    /// ISBN - catalog key, immutable once the entry exists
    Isbn,
    "isbn",
    ISBN_MAX_LEN
);

bounded_text_type!(
    /// Book title
    Title,
    "title",
    TITLE_MAX_LEN
);

bounded_text_type!(
    /// Book author
    Author,
    "author",
    AUTHOR_MAX_LEN
);

/// Copy count overflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyCountError {
    /// Result would not fit the storable range
    Overflow,
}

/// Number of physical copies the library owns for one entry.
///
/// Invariant: `0 <= value <= i32::MAX`. The upper bound matches the
/// `INTEGER` column the catalog is persisted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct CopyCount(i32);

impl CopyCount {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);
    pub const MAX: Self = Self(i32::MAX);

    pub fn value(&self) -> i32 {
        self.0
    }

    /// `true` while at least one copy is on the shelf.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: CopyCount) -> Result<Self, CopyCountError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(CopyCountError::Overflow)
    }

    pub fn increment(self) -> Result<Self, CopyCountError> {
        self.checked_add(Self::ONE)
    }

    /// One copy fewer, or `None` when there is nothing left.
    pub fn decrement(self) -> Option<Self> {
        if self.0 == 0 {
            return None;
        }
        Some(Self(self.0 - 1))
    }
}

impl TryFrom<i64> for CopyCount {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(ValidationError::NegativeCopyCount(value));
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| ValidationError::CopyCountTooLarge(value))
    }
}

impl TryFrom<i32> for CopyCount {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<CopyCount> for i64 {
    fn from(value: CopyCount) -> Self {
        i64::from(value.0)
    }
}

impl std::fmt::Display for CopyCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Title/author search term.
///
/// Never empty: an empty term is rejected rather than treated as
/// "match everything".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySearchTerm);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
