//! Ordered partition configuration.
//!
//! A [`PartitionConfig`] is an explicit ordered list of named view
//! requests. Order is part of the contract: the layout walk processes
//! requests exactly as supplied, so reordering entries changes every
//! subsequent offset.

use crate::element::ElementType;

/// A single named view request: element type plus element count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewRequest {
    /// Name the resulting view is looked up by.
    pub name: String,
    /// Element type of the view.
    pub element: ElementType,
    /// Number of elements. Zero is valid: the region consumes no bytes
    /// beyond alignment padding but still receives an offset.
    pub count: usize,
}

/// An ordered sequence of [`ViewRequest`]s.
///
/// Kept as an explicit list rather than a map so that iteration order is
/// an auditable contract, not an incidental property of a hash container.
/// Duplicate names are rejected when the layout is computed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartitionConfig {
    requests: Vec<ViewRequest>,
}

impl PartitionConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, element: ElementType, count: usize) -> Self {
        self.push(name, element, count);
        self
    }

    /// Append a request.
    pub fn push(&mut self, name: impl Into<String>, element: ElementType, count: usize) {
        self.requests.push(ViewRequest {
            name: name.into(),
            element,
            count,
        });
    }

    /// The requests in supplied order.
    pub fn requests(&self) -> &[ViewRequest] {
        &self.requests
    }

    /// Iterate over requests in supplied order.
    pub fn iter(&self) -> impl Iterator<Item = &ViewRequest> {
        self.requests.iter()
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the configuration holds no requests.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
