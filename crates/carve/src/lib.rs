//! Partition one contiguous byte buffer into aligned, independently-typed views.
//!
//! Several fixed-size numeric regions often need to coexist inside a single
//! allocation — to hand data between execution contexts through one memory
//! handle, or to guarantee a particular layout for an external consumer.
//! This crate computes that layout, performs the single allocation, and
//! exposes each named region as a typed window over the shared bytes.
//!
//! # Architecture
//!
//! ```text
//! PartitionConfig (ordered name → (element type, count) requests)
//! ├── LayoutPlan::compute()       pure sizing pass, aligned offsets
//! ├── BufferSource::allocate()    one zeroed allocation of the total size
//! └── Partition::bind()           one typed view per request, no copies
//!     ├── View / ViewMut          typed windows into the shared buffer
//!     └── SharedPartition         Arc handle for cross-thread readers
//! ```
//!
//! The layout walk is deterministic: requests are processed in the exact
//! order supplied, each region's offset is rounded up to its element size,
//! and the total is the running offset after the last region. Reordering
//! requests changes the layout.
//!
//! # Example
//!
//! ```
//! use carve::{ElementType, Partition, PartitionConfig};
//!
//! let config = PartitionConfig::new()
//!     .with("data", ElementType::Float32, 1024)
//!     .with("index", ElementType::UInt32, 1)
//!     .with("flag", ElementType::UInt8, 1);
//!
//! let partition = Partition::new(&config).unwrap();
//!
//! let data = partition.view("data").unwrap();
//! assert_eq!(data.byte_offset(), 0);
//! assert_eq!(data.len(), 1024);
//!
//! let flag = partition.view("flag").unwrap();
//! assert_eq!(flag.byte_offset(), 4100);
//! assert_eq!(flag.buffer().byte_len(), 4101);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod element;
pub mod error;
pub mod layout;
pub mod partition;

// Public re-exports for the primary API surface.
pub use buffer::{AlignedBuffer, BufferSource, HeapSource};
pub use config::{PartitionConfig, ViewRequest};
pub use element::{Element, ElementType};
pub use error::PartitionError;
pub use layout::{LayoutPlan, Region};
pub use partition::{Partition, SharedPartition, View, ViewMut};
