use super::CopyCountError;

/// Lending error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LendCopyError {
    /// No copies left on the shelf
    OutOfStock,
}

/// Return error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnCopyError {
    /// Count would exceed the storable maximum
    CopyCountOverflow,
}

impl From<CopyCountError> for ReturnCopyError {
    fn from(err: CopyCountError) -> Self {
        match err {
            CopyCountError::Overflow => ReturnCopyError::CopyCountOverflow,
        }
    }
}

/// Merge error (re-adding a known ISBN)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeCopiesError {
    /// Accumulated count would exceed the storable maximum
    CopyCountOverflow,
}

impl From<CopyCountError> for MergeCopiesError {
    fn from(err: CopyCountError) -> Self {
        match err {
            CopyCountError::Overflow => MergeCopiesError::CopyCountOverflow,
        }
    }
}
