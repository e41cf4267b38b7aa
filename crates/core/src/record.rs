//! Normalized reporting records.

use serde::{Deserialize, Serialize};

/// Aggregate usage of one type: how many live values and how many bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeUsageRecord {
    /// Type name as reported by the backend.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Number of live values of this type.
    pub count: u64,
    /// Sum of the byte sizes of those values.
    pub total_size: u64,
}

impl TypeUsageRecord {
    #[must_use]
    pub fn new(type_name: impl Into<String>, count: u64, total_size: u64) -> Self {
        Self {
            type_name: type_name.into(),
            count,
            total_size,
        }
    }
}

/// One entry of the most-common-types ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub type_name: String,
    pub count: u64,
}

impl TypeCount {
    #[must_use]
    pub fn new(type_name: impl Into<String>, count: u64) -> Self {
        Self {
            type_name: type_name.into(),
            count,
        }
    }
}

/// Opaque handle to a single live object. Only backends look inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectHandle {
    id: u64,
    type_name: &'static str,
    size: usize,
}

impl ObjectHandle {
    #[must_use]
    pub const fn new(id: u64, type_name: &'static str, size: usize) -> Self {
        Self {
            id,
            type_name,
            size,
        }
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

/// Widen a count to `u64`, saturating on targets where `usize` is wider.
pub(crate) fn to_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
