//! Buffer allocation: the external collaborator behind the layout.
//!
//! The planner only computes numbers; [`BufferSource`] is the narrow
//! capability that turns a total size into addressable, zero-initialised
//! storage. [`HeapSource`] is the default implementation; callers with
//! other backing stores (memory-mapped files, process-shared segments)
//! implement the trait themselves — the layout walk never cares which
//! source produced the bytes.

use crate::error::PartitionError;

/// A zero-initialised contiguous byte buffer with 8-byte-aligned backing.
///
/// Storage is a `Vec<u64>`, so byte 0 satisfies the alignment of every
/// supported element type and any plan offset that is a multiple of an
/// element's size lands on a correctly aligned address. That invariant is
/// what makes the typed casts in [`crate::partition::View`] infallible.
pub struct AlignedBuffer {
    words: Vec<u64>,
    byte_len: usize,
}

impl AlignedBuffer {
    /// Allocate a zeroed buffer of `byte_len` bytes.
    ///
    /// A zero-length buffer is valid and allocates nothing. Allocation
    /// failure is reported as [`PartitionError::AllocationFailed`] rather
    /// than aborting.
    pub fn zeroed(byte_len: usize) -> Result<Self, PartitionError> {
        let word_len = byte_len.div_ceil(std::mem::size_of::<u64>());
        let mut words = Vec::new();
        words
            .try_reserve_exact(word_len)
            .map_err(|_| PartitionError::AllocationFailed {
                requested: byte_len,
            })?;
        words.resize(word_len, 0);
        Ok(Self { words, byte_len })
    }

    /// Length of the buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// The buffer's bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.words)[..self.byte_len]
    }

    /// The buffer's bytes, mutably.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut(&mut self.words)[..self.byte_len]
    }
}

/// Buffer-construction capability: `total size -> zeroed buffer`.
///
/// Implementations must return a buffer of at least `byte_len` bytes or
/// an error; they never retry and never round the request down.
pub trait BufferSource {
    /// Allocate a zero-initialised buffer of `byte_len` bytes.
    fn allocate(&self, byte_len: usize) -> Result<AlignedBuffer, PartitionError>;
}

/// Heap allocation through the global allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeapSource;

impl BufferSource for HeapSource {
    fn allocate(&self, byte_len: usize) -> Result<AlignedBuffer, PartitionError> {
        AlignedBuffer::zeroed(byte_len)
    }
}
