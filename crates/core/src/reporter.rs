//! Memory reporter.
//!
//! Turns inspection backend queries into HTTP-safe [`Report`]s. Backend
//! failures (including panics inside the backend) stop here and become
//! `{"status": "error"}` payloads; nothing propagates to the caller.
//!
//! An empty live-object set is a successful report. For the biggest-offender
//! query it carries an explanatory message instead of a record.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde::Serialize;
use tracing::{Span, debug, error, info_span};

use crate::backend::InspectionBackend;
use crate::error::{Error, ErrorKind};
use crate::record::{TypeCount, TypeUsageRecord, to_u64};
use crate::result::{Result, ResultExt};

/// Default cap on `/memory/summary` records.
pub const DEFAULT_SUMMARY_LIMIT: usize = 20;

/// Default cap on `/memory/common-types` records.
pub const DEFAULT_COMMON_TYPES_LIMIT: usize = 20;

/// Message returned when there is nothing to rank.
pub const NO_DATA_MESSAGE: &str = "No memory data available";

/// Outcome of one reporter operation, serialized with a `status` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Report<T> {
    Success(T),
    Error { message: String },
}

impl<T> Report<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error { .. } => None,
        }
    }
}

/// Payload of [`MemoryReporter::get_summary`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemorySummary {
    pub total_objects: u64,
    pub summary: Vec<TypeUsageRecord>,
}

/// Payload of [`MemoryReporter::get_common_types`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommonTypes {
    pub common_types: Vec<TypeCount>,
}

/// Payload of [`MemoryReporter::get_biggest_offender`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BiggestOffender {
    Found { biggest_offender: TypeUsageRecord },
    NoData { message: String },
}

/// Record caps applied by the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLimits {
    pub summary: usize,
    pub common_types: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            summary: DEFAULT_SUMMARY_LIMIT,
            common_types: DEFAULT_COMMON_TYPES_LIMIT,
        }
    }
}

/// Reads the inspection backend and formats what it finds.
#[derive(Clone)]
pub struct MemoryReporter {
    backend: Arc<dyn InspectionBackend>,
    limits: ReportLimits,
    span: Span,
}

impl MemoryReporter {
    /// Create a reporter over `backend` with default limits.
    #[must_use]
    pub fn new(backend: Arc<dyn InspectionBackend>) -> Self {
        Self {
            backend,
            limits: ReportLimits::default(),
            span: info_span!("memory_reporter"),
        }
    }

    /// Replace the record caps.
    #[must_use]
    pub fn with_limits(mut self, limits: ReportLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the span every operation logs under.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub const fn limits(&self) -> ReportLimits {
        self.limits
    }

    /// Per-type usage of every live object, top records only.
    pub fn get_summary(&self) -> Report<MemorySummary> {
        let _entered = self.span.enter();
        let result = self.collect_summary().map(|(total_objects, mut summary)| {
            summary.truncate(self.limits.summary);
            MemorySummary {
                total_objects,
                summary,
            }
        });
        settle("get_summary", result, |_| MemorySummary::default())
    }

    /// Most frequent live types by count.
    pub fn get_common_types(&self) -> Report<CommonTypes> {
        let _entered = self.span.enter();
        let limit = self.limits.common_types;
        let result = guarded("most_common_types", || self.backend.most_common_types(limit))
            .map(|mut common_types| {
                common_types.truncate(limit);
                CommonTypes { common_types }
            });
        settle("get_common_types", result, |_| CommonTypes::default())
    }

    /// The type with the largest aggregate byte size.
    pub fn get_biggest_offender(&self) -> Report<BiggestOffender> {
        let _entered = self.span.enter();
        let result = self
            .collect_summary()
            .and_then(|(_, summary)| pick_biggest(summary))
            .map(|biggest_offender| BiggestOffender::Found { biggest_offender });
        settle("get_biggest_offender", result, |message| {
            BiggestOffender::NoData { message }
        })
    }

    /// Count live objects without aggregating them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LivenessFailure`] if the backend cannot enumerate.
    pub fn probe_liveness(&self) -> Result<u64> {
        let _entered = self.span.enter();
        guarded("enumerate_live_objects", || {
            self.backend.enumerate_live_objects()
        })
        .map(|objects| to_u64(objects.len()))
        .map_err(|e| Error::liveness_failure(e.to_string()))
        .inspect_error(|e| error!(error = %e, "Liveness probe failed"))
    }

    fn collect_summary(&self) -> Result<(u64, Vec<TypeUsageRecord>)> {
        let objects = guarded("enumerate_live_objects", || {
            self.backend.enumerate_live_objects()
        })?;
        let summary = guarded("summarize", || self.backend.summarize(&objects))?;
        debug!(
            objects = objects.len(),
            types = summary.len(),
            "Summarized live objects"
        );
        Ok((to_u64(objects.len()), summary))
    }
}

impl std::fmt::Debug for MemoryReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryReporter")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

/// Largest `total_size`; the first record wins a tie.
fn pick_biggest(summary: Vec<TypeUsageRecord>) -> Result<TypeUsageRecord> {
    summary
        .into_iter()
        .reduce(|best, record| {
            if record.total_size > best.total_size {
                record
            } else {
                best
            }
        })
        .ok_or_else(|| Error::empty_result(NO_DATA_MESSAGE))
}

/// Fold an operation result into a report. `on_empty` builds the success
/// payload for an empty result.
fn settle<T>(
    operation: &'static str,
    result: Result<T>,
    on_empty: impl FnOnce(String) -> T,
) -> Report<T> {
    match result {
        Ok(value) => Report::Success(value),
        Err(err) => match err.kind() {
            ErrorKind::EmptyResult => Report::Success(on_empty(err.to_string())),
            ErrorKind::BackendFailure
            | ErrorKind::FacadeFailure
            | ErrorKind::LivenessFailure
            | ErrorKind::Config => {
                error!(operation, kind = %err.kind(), "Error in {}: {}", operation, err);
                Report::Error {
                    message: err.to_string(),
                }
            }
        },
    }
}

/// Run a backend call, turning a panic into a backend failure.
fn guarded<T>(operation: &'static str, call: impl FnOnce() -> Result<T>) -> Result<T> {
    catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|payload| Err(Error::backend_failure(operation, panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "backend panicked".to_string())
}
