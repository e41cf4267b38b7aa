//! The inspection backend seam.
//!
//! The reporter never walks memory itself. Whatever answers the three
//! questions below is the source of truth for "what is alive right now".

use crate::record::{ObjectHandle, TypeCount, TypeUsageRecord};
use crate::result::Result;

/// Capability interface over a live-object inspector.
///
/// Implementations may fail on any call; failures are reported as
/// [`Error::BackendFailure`](crate::Error::BackendFailure).
pub trait InspectionBackend: Send + Sync {
    /// Snapshot every live object.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot enumerate its objects.
    fn enumerate_live_objects(&self) -> Result<Vec<ObjectHandle>>;

    /// Aggregate `objects` per type, ordered by descending total size.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot aggregate.
    fn summarize(&self, objects: &[ObjectHandle]) -> Result<Vec<TypeUsageRecord>>;

    /// Rank types by live count, descending, keeping at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot rank.
    fn most_common_types(&self, limit: usize) -> Result<Vec<TypeCount>>;
}
