//! Partition construction and typed view access.
//!
//! [`Partition`] is the bound result: one buffer plus one view per
//! request, resolved by name. Binding validates the buffer size once,
//! up front — an undersized buffer is rejected before any view exists,
//! so construction is all-or-nothing.
//!
//! The view table uses `IndexMap` (not `HashMap`) so that [`Partition::views`]
//! iterates in request order, matching the configuration exactly.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::buffer::{AlignedBuffer, BufferSource, HeapSource};
use crate::config::PartitionConfig;
use crate::element::{Element, ElementType};
use crate::error::PartitionError;
use crate::layout::LayoutPlan;

/// Resolved placement of one view. Mirrors a plan region minus the name,
/// which lives in the map key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ViewMeta {
    element: ElementType,
    count: usize,
    byte_offset: usize,
    byte_len: usize,
}

/// A single buffer partitioned into named, aligned, typed views.
///
/// Owns the buffer. Views borrow from it and cannot outlive it; the
/// shape (names, offsets, counts) is fixed at construction and never
/// changes afterwards.
pub struct Partition {
    buffer: AlignedBuffer,
    views: IndexMap<String, ViewMeta>,
}

/// Shared handle for cross-thread read access to a partition.
///
/// Rust's aliasing rules make concurrent mutation through a shared
/// handle inexpressible without synchronisation this crate does not
/// provide, so a shared partition is read-only. Mutate before calling
/// [`Partition::into_shared`], or keep the partition exclusively owned.
pub type SharedPartition = Arc<Partition>;

impl Partition {
    /// Plan, allocate on the heap, and bind in one step.
    pub fn new(config: &PartitionConfig) -> Result<Self, PartitionError> {
        Self::with_source(&HeapSource, config)
    }

    /// Plan, allocate through the given source, and bind.
    ///
    /// Allocation failures from the source propagate unchanged; no retry.
    pub fn with_source<S: BufferSource>(
        source: &S,
        config: &PartitionConfig,
    ) -> Result<Self, PartitionError> {
        let plan = LayoutPlan::compute(config)?;
        let buffer = source.allocate(plan.total_size())?;
        Self::bind(buffer, &plan)
    }

    /// Bind a previously computed plan to an existing buffer.
    ///
    /// # Errors
    ///
    /// [`PartitionError::BufferTooSmall`] if the buffer holds fewer bytes
    /// than the plan's total size. Checked here, once, rather than on
    /// first access. A buffer larger than the plan is accepted; the
    /// excess is simply never referenced by any view.
    pub fn bind(buffer: AlignedBuffer, plan: &LayoutPlan) -> Result<Self, PartitionError> {
        if buffer.byte_len() < plan.total_size() {
            return Err(PartitionError::BufferTooSmall {
                required: plan.total_size(),
                actual: buffer.byte_len(),
            });
        }

        let mut views = IndexMap::with_capacity(plan.len());
        for region in plan.regions() {
            views.insert(
                region.name.clone(),
                ViewMeta {
                    element: region.element,
                    count: region.count,
                    byte_offset: region.byte_offset,
                    byte_len: region.byte_len,
                },
            );
        }

        Ok(Self { buffer, views })
    }

    /// Look up a view by name.
    pub fn view(&self, name: &str) -> Option<View<'_>> {
        let (name, meta) = self.views.get_key_value(name)?;
        Some(View {
            name: name.as_str(),
            meta: *meta,
            buffer: &self.buffer,
        })
    }

    /// Look up a view by name, with write access to its bytes.
    pub fn view_mut(&mut self, name: &str) -> Option<ViewMut<'_>> {
        let (name, meta) = self.views.get_key_value(name)?;
        Some(ViewMut {
            name: name.as_str(),
            meta: *meta,
            buffer: &mut self.buffer,
        })
    }

    /// Iterate over all views in request order.
    pub fn views(&self) -> impl Iterator<Item = View<'_>> {
        self.views.iter().map(|(name, meta)| View {
            name: name.as_str(),
            meta: *meta,
            buffer: &self.buffer,
        })
    }

    /// The owning buffer.
    pub fn buffer(&self) -> &AlignedBuffer {
        &self.buffer
    }

    /// Total buffer size in bytes.
    pub fn byte_len(&self) -> usize {
        self.buffer.byte_len()
    }

    /// Number of views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether the partition holds no views.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Wrap this partition in an `Arc` for cross-thread read sharing.
    pub fn into_shared(self) -> SharedPartition {
        Arc::new(self)
    }
}

/// A read-only typed window into a partition's buffer.
///
/// Borrows from the [`Partition`]; the underlying bytes are shared, never
/// copied. [`View::buffer`] is the back-reference to the owning buffer,
/// e.g. for inspecting the total allocated size.
#[derive(Clone, Copy)]
pub struct View<'a> {
    name: &'a str,
    meta: ViewMeta,
    buffer: &'a AlignedBuffer,
}

impl<'a> View<'a> {
    /// The view's name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The view's element type.
    pub fn element_type(&self) -> ElementType {
        self.meta.element
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.meta.count
    }

    /// Whether the view holds zero elements.
    pub fn is_empty(&self) -> bool {
        self.meta.count == 0
    }

    /// Starting byte offset within the buffer.
    pub fn byte_offset(&self) -> usize {
        self.meta.byte_offset
    }

    /// Length of the view in bytes.
    pub fn byte_len(&self) -> usize {
        self.meta.byte_len
    }

    /// Back-reference to the owning buffer.
    pub fn buffer(&self) -> &'a AlignedBuffer {
        self.buffer
    }

    /// The view's raw bytes.
    pub fn bytes(&self) -> &'a [u8] {
        let start = self.meta.byte_offset;
        &self.buffer.as_bytes()[start..start + self.meta.byte_len]
    }

    /// The view's elements as a typed slice.
    ///
    /// The requested scalar must match the configured element type;
    /// otherwise [`PartitionError::ElementMismatch`] is returned. The
    /// cast itself cannot fail: the plan guarantees the offset is a
    /// multiple of the element size and the backing store is 8-aligned.
    pub fn as_slice<T: Element>(&self) -> Result<&'a [T], PartitionError> {
        if T::ELEMENT_TYPE != self.meta.element {
            return Err(PartitionError::ElementMismatch {
                name: self.name.to_string(),
                expected: self.meta.element,
                requested: T::ELEMENT_TYPE,
            });
        }
        Ok(bytemuck::cast_slice(self.bytes()))
    }
}

/// A writable typed window into a partition's buffer.
///
/// Holds the partition's only mutable borrow, so at most one `ViewMut`
/// exists at a time. Shape accessors mirror [`View`].
pub struct ViewMut<'a> {
    name: &'a str,
    meta: ViewMeta,
    buffer: &'a mut AlignedBuffer,
}

impl ViewMut<'_> {
    /// The view's name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// The view's element type.
    pub fn element_type(&self) -> ElementType {
        self.meta.element
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.meta.count
    }

    /// Whether the view holds zero elements.
    pub fn is_empty(&self) -> bool {
        self.meta.count == 0
    }

    /// Starting byte offset within the buffer.
    pub fn byte_offset(&self) -> usize {
        self.meta.byte_offset
    }

    /// Length of the view in bytes.
    pub fn byte_len(&self) -> usize {
        self.meta.byte_len
    }

    /// Back-reference to the owning buffer.
    pub fn buffer(&self) -> &AlignedBuffer {
        self.buffer
    }

    /// The view's raw bytes.
    pub fn bytes(&self) -> &[u8] {
        let start = self.meta.byte_offset;
        &self.buffer.as_bytes()[start..start + self.meta.byte_len]
    }

    /// The view's raw bytes, mutably.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let start = self.meta.byte_offset;
        &mut self.buffer.as_bytes_mut()[start..start + self.meta.byte_len]
    }

    /// The view's elements as a typed slice.
    pub fn as_slice<T: Element>(&self) -> Result<&[T], PartitionError> {
        self.check_element::<T>()?;
        Ok(bytemuck::cast_slice(self.bytes()))
    }

    /// The view's elements as a mutable typed slice.
    pub fn as_slice_mut<T: Element>(&mut self) -> Result<&mut [T], PartitionError> {
        self.check_element::<T>()?;
        let start = self.meta.byte_offset;
        let end = start + self.meta.byte_len;
        Ok(bytemuck::cast_slice_mut(
            &mut self.buffer.as_bytes_mut()[start..end],
        ))
    }

    fn check_element<T: Element>(&self) -> Result<(), PartitionError> {
        if T::ELEMENT_TYPE != self.meta.element {
            return Err(PartitionError::ElementMismatch {
                name: self.name.to_string(),
                expected: self.meta.element,
                requested: T::ELEMENT_TYPE,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_region_config() -> PartitionConfig {
        PartitionConfig::new()
            .with("data", ElementType::Float32, 1024)
            .with("index", ElementType::UInt32, 1)
            .with("flag", ElementType::UInt8, 1)
    }

    #[test]
    fn new_binds_every_requested_view() {
        let partition = Partition::new(&three_region_config()).unwrap();
        assert_eq!(partition.len(), 3);
        assert_eq!(partition.byte_len(), 4101);

        let data = partition.view("data").unwrap();
        assert_eq!(data.byte_offset(), 0);
        assert_eq!(data.len(), 1024);
        assert_eq!(data.element_type(), ElementType::Float32);
    }

    #[test]
    fn views_iterate_in_request_order() {
        let partition = Partition::new(&three_region_config()).unwrap();
        let names: Vec<_> = partition.views().map(|v| v.name().to_string()).collect();
        assert_eq!(names, ["data", "index", "flag"]);
    }

    #[test]
    fn unknown_name_returns_none() {
        let partition = Partition::new(&three_region_config()).unwrap();
        assert!(partition.view("missing").is_none());
    }

    #[test]
    fn view_back_reference_exposes_total_size() {
        let partition = Partition::new(&three_region_config()).unwrap();
        let flag = partition.view("flag").unwrap();
        assert_eq!(flag.buffer().byte_len(), 4101);
    }

    #[test]
    fn typed_writes_are_visible_through_typed_reads() {
        let mut partition = Partition::new(&three_region_config()).unwrap();
        {
            let mut index = partition.view_mut("index").unwrap();
            index.as_slice_mut::<u32>().unwrap()[0] = 0xDEAD_BEEF;
        }
        let index = partition.view("index").unwrap();
        assert_eq!(index.as_slice::<u32>().unwrap()[0], 0xDEAD_BEEF);
    }

    #[test]
    fn views_do_not_alias_each_other() {
        let mut partition = Partition::new(
            &PartitionConfig::new()
                .with("a", ElementType::UInt8, 4)
                .with("b", ElementType::UInt8, 4),
        )
        .unwrap();
        partition
            .view_mut("a")
            .unwrap()
            .as_slice_mut::<u8>()
            .unwrap()
            .fill(1);
        partition
            .view_mut("b")
            .unwrap()
            .as_slice_mut::<u8>()
            .unwrap()
            .fill(2);

        assert!(partition
            .view("a")
            .unwrap()
            .as_slice::<u8>()
            .unwrap()
            .iter()
            .all(|&v| v == 1));
        assert!(partition
            .view("b")
            .unwrap()
            .as_slice::<u8>()
            .unwrap()
            .iter()
            .all(|&v| v == 2));
    }

    #[test]
    fn freshly_bound_views_read_zero() {
        let partition = Partition::new(&three_region_config()).unwrap();
        let data = partition.view("data").unwrap();
        assert!(data.as_slice::<f32>().unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn wrong_scalar_is_a_mismatch_error() {
        let partition = Partition::new(&three_region_config()).unwrap();
        let data = partition.view("data").unwrap();
        let result = data.as_slice::<u32>();
        assert_eq!(
            result,
            Err(PartitionError::ElementMismatch {
                name: "data".to_string(),
                expected: ElementType::Float32,
                requested: ElementType::UInt32,
            })
        );
    }

    #[test]
    fn bind_rejects_undersized_buffer() {
        let plan = LayoutPlan::compute(&three_region_config()).unwrap();
        let small = AlignedBuffer::zeroed(plan.total_size() - 1).unwrap();
        let result = Partition::bind(small, &plan);
        assert_eq!(
            result.err(),
            Some(PartitionError::BufferTooSmall {
                required: 4101,
                actual: 4100,
            })
        );
    }

    #[test]
    fn bind_accepts_oversized_buffer() {
        let plan = LayoutPlan::compute(&three_region_config()).unwrap();
        let large = AlignedBuffer::zeroed(plan.total_size() + 64).unwrap();
        let partition = Partition::bind(large, &plan).unwrap();
        assert_eq!(partition.byte_len(), 4101 + 64);
        assert_eq!(partition.view("flag").unwrap().byte_offset(), 4100);
    }

    #[test]
    fn empty_config_builds_an_empty_partition() {
        let partition = Partition::new(&PartitionConfig::new()).unwrap();
        assert!(partition.is_empty());
        assert_eq!(partition.byte_len(), 0);
        assert_eq!(partition.views().count(), 0);
    }

    #[test]
    fn zero_count_view_is_bound_and_addressable() {
        let partition = Partition::new(
            &PartitionConfig::new()
                .with("a", ElementType::UInt32, 0)
                .with("b", ElementType::UInt8, 5),
        )
        .unwrap();

        let a = partition.view("a").unwrap();
        assert!(a.is_empty());
        assert_eq!(a.byte_offset(), 0);
        assert!(a.as_slice::<u32>().unwrap().is_empty());

        let b = partition.view("b").unwrap();
        assert_eq!(b.byte_offset(), 0);
        assert_eq!(b.len(), 5);
    }

    #[test]
    fn into_shared_allows_cross_thread_reads() {
        let mut partition = Partition::new(&three_region_config()).unwrap();
        partition
            .view_mut("data")
            .unwrap()
            .as_slice_mut::<f32>()
            .unwrap()[7] = 3.5;

        let shared = partition.into_shared();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    let data = shared.view("data").unwrap();
                    data.as_slice::<f32>().unwrap()[7]
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 3.5);
        }
    }

    #[test]
    fn failing_source_propagates_unchanged() {
        struct FailingSource;
        impl BufferSource for FailingSource {
            fn allocate(&self, byte_len: usize) -> Result<AlignedBuffer, PartitionError> {
                Err(PartitionError::AllocationFailed {
                    requested: byte_len,
                })
            }
        }

        let result = Partition::with_source(&FailingSource, &three_region_config());
        assert_eq!(
            result.err(),
            Some(PartitionError::AllocationFailed { requested: 4101 })
        );
    }
}
