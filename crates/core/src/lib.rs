//! memhunt core: live-object inspection and memory reporting.
//!
//! - [`InspectionBackend`] is the seam to whatever knows which objects are alive.
//! - [`HeapRegistry`] is the shipped backend; values opt in via [`HeapRegistry::track`].
//! - [`MemoryReporter`] turns backend answers into serializable [`Report`]s.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod backend;
pub mod error;
pub mod heap_size;
pub mod record;
pub mod registry;
pub mod reporter;
pub mod result;

pub use backend::InspectionBackend;
pub use error::{Error, ErrorKind};
pub use heap_size::HeapSize;
pub use record::{ObjectHandle, TypeCount, TypeUsageRecord};
pub use registry::{HeapRegistry, Tracked};
pub use reporter::{
    BiggestOffender, CommonTypes, DEFAULT_COMMON_TYPES_LIMIT, DEFAULT_SUMMARY_LIMIT,
    MemoryReporter, MemorySummary, NO_DATA_MESSAGE, Report, ReportLimits,
};
pub use result::{Result, ResultExt};
