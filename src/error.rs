use std::fmt::{Display, Formatter, Result};

/// Errors reported by the fallible heap operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `extreme` or `delete_extreme` was called on a heap with no elements.
    Empty,

    /// `add` was called on a heap whose storage is exhausted.
    Full {
        /// The fixed capacity the heap was built with.
        capacity: usize,
    },
}

impl Display for HeapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Empty => write!(f, "heap is empty"),
            Self::Full { capacity } => {
                write!(f, "heap is full (capacity {capacity})")
            }
        }
    }
}

impl std::error::Error for HeapError {}
