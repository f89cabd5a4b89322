//! Partitioning error types.

use std::error::Error;
use std::fmt;

use crate::element::ElementType;

/// Errors that can occur while planning, allocating, or binding a partition.
///
/// Construction is all-or-nothing: any of these aborts the whole partition,
/// there is no partial result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartitionError {
    /// Two view requests share the same name.
    DuplicateName {
        /// The repeated view name.
        name: String,
    },
    /// The running layout size overflowed `usize` while planning a view.
    SizeOverflow {
        /// The view whose request could not be arithmetically processed.
        name: String,
    },
    /// The buffer-construction capability could not produce the buffer.
    AllocationFailed {
        /// Number of bytes requested from the source.
        requested: usize,
    },
    /// A caller-supplied buffer is smaller than the plan's total size.
    BufferTooSmall {
        /// Bytes the plan requires.
        required: usize,
        /// Bytes the buffer actually holds.
        actual: usize,
    },
    /// Typed access requested a scalar that does not match the view's
    /// configured element type.
    ElementMismatch {
        /// The view being accessed.
        name: String,
        /// The element type the view was configured with.
        expected: ElementType,
        /// The element type the caller asked for.
        requested: ElementType,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => {
                write!(f, "duplicate view name: '{name}'")
            }
            Self::SizeOverflow { name } => {
                write!(f, "layout size overflow while planning view '{name}'")
            }
            Self::AllocationFailed { requested } => {
                write!(f, "buffer allocation of {requested} bytes failed")
            }
            Self::BufferTooSmall { required, actual } => {
                write!(
                    f,
                    "buffer too small: layout requires {required} bytes, buffer holds {actual}"
                )
            }
            Self::ElementMismatch {
                name,
                expected,
                requested,
            } => {
                write!(
                    f,
                    "element type mismatch for view '{name}': stored {expected}, requested {requested}"
                )
            }
        }
    }
}

impl Error for PartitionError {}
