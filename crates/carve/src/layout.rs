//! Layout planning: aligned offsets and total buffer size.
//!
//! [`LayoutPlan::compute`] is the core of the crate. It walks the ordered
//! request list once, rounds the running offset up to each element type's
//! alignment, and records one [`Region`] per request. The walk is a pure
//! function of the configuration: same input, same plan, always.

use crate::config::PartitionConfig;
use crate::element::ElementType;
use crate::error::PartitionError;

/// Round `offset` up to the next multiple of `align`.
///
/// `align` must be a power of two, which holds for every supported
/// element type (1, 2, 4, or 8). Returns `None` on `usize` overflow.
fn align_up(offset: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    Some(offset.checked_add(align - 1)? & !(align - 1))
}

/// One planned region within the buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// Name of the request this region serves.
    pub name: String,
    /// Element type of the region.
    pub element: ElementType,
    /// Number of elements.
    pub count: usize,
    /// Starting byte offset. Always a multiple of the element size.
    pub byte_offset: usize,
    /// Length in bytes: `element.byte_size() * count`.
    pub byte_len: usize,
}

/// The computed layout for a whole partition.
///
/// Regions appear in request order, never overlap, and the final region's
/// end is exactly the total size — no trailing bytes beyond the padding
/// alignment itself required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutPlan {
    regions: Vec<Region>,
    total_size: usize,
}

impl LayoutPlan {
    /// Compute the layout for an ordered configuration.
    ///
    /// The walk processes requests in supplied order:
    ///
    /// 1. round the running offset up to the element's alignment,
    /// 2. record that as the region's offset,
    /// 3. advance by `byte_size * count`.
    ///
    /// The total size is the running offset after the last request. An
    /// empty configuration yields an empty plan with total size 0.
    ///
    /// # Errors
    ///
    /// - [`PartitionError::DuplicateName`] if two requests share a name.
    /// - [`PartitionError::SizeOverflow`] if the running size overflows
    ///   `usize`. No other size ceiling is imposed here: an oversized but
    ///   representable plan fails (if at all) at the allocation step.
    pub fn compute(config: &PartitionConfig) -> Result<Self, PartitionError> {
        let requests = config.requests();
        for (i, request) in requests.iter().enumerate() {
            if requests[i + 1..].iter().any(|r| r.name == request.name) {
                return Err(PartitionError::DuplicateName {
                    name: request.name.clone(),
                });
            }
        }

        let mut regions = Vec::with_capacity(requests.len());
        let mut cursor = 0usize;
        for request in requests {
            let overflow = || PartitionError::SizeOverflow {
                name: request.name.clone(),
            };
            let byte_offset = align_up(cursor, request.element.alignment()).ok_or_else(overflow)?;
            let byte_len = request
                .element
                .byte_size()
                .checked_mul(request.count)
                .ok_or_else(overflow)?;
            cursor = byte_offset.checked_add(byte_len).ok_or_else(overflow)?;
            regions.push(Region {
                name: request.name.clone(),
                element: request.element,
                count: request.count,
                byte_offset,
                byte_len,
            });
        }

        Ok(Self {
            regions,
            total_size: cursor,
        })
    }

    /// Total buffer size in bytes.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// The planned regions, in request order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Byte offset of a region by name.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.regions
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.byte_offset)
    }

    /// Number of planned regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the plan holds no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
