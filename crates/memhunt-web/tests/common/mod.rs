//! Shared fixtures for memhunt-web integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use memhunt_core::{
    Error, InspectionBackend, MemoryReporter, ObjectHandle, Result, TypeCount, TypeUsageRecord,
};

/// Which backend calls should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub enumerate: bool,
    pub summarize: bool,
    pub most_common: bool,
}

impl Failures {
    pub const fn all() -> Self {
        Self {
            enumerate: true,
            summarize: true,
            most_common: true,
        }
    }
}

/// Backend replaying a fixed summary, failing where told to.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    pub summary: Vec<TypeUsageRecord>,
    pub common: Vec<TypeCount>,
    pub failures: Failures,
}

impl ScriptedBackend {
    pub fn dict_and_list() -> Self {
        Self {
            summary: vec![
                TypeUsageRecord::new("dict", 150, 48000),
                TypeUsageRecord::new("list", 90, 21000),
            ],
            common: vec![TypeCount::new("dict", 150), TypeCount::new("list", 90)],
            failures: Failures::default(),
        }
    }

    pub fn failing(failures: Failures) -> Self {
        Self {
            failures,
            ..Self::dict_and_list()
        }
    }

    pub fn into_reporter(self) -> MemoryReporter {
        MemoryReporter::new(Arc::new(self))
    }
}

impl InspectionBackend for ScriptedBackend {
    fn enumerate_live_objects(&self) -> Result<Vec<ObjectHandle>> {
        if self.failures.enumerate {
            return Err(Error::backend_failure("enumerate_live_objects", "scripted failure"));
        }
        let total: u64 = self.summary.iter().map(|r| r.count).sum();
        Ok((0..total).map(|id| ObjectHandle::new(id, "scripted", 0)).collect())
    }

    fn summarize(&self, _objects: &[ObjectHandle]) -> Result<Vec<TypeUsageRecord>> {
        if self.failures.summarize {
            return Err(Error::backend_failure("summarize", "scripted failure"));
        }
        Ok(self.summary.clone())
    }

    fn most_common_types(&self, limit: usize) -> Result<Vec<TypeCount>> {
        if self.failures.most_common {
            return Err(Error::backend_failure("most_common_types", "scripted failure"));
        }
        Ok(self.common.iter().take(limit).cloned().collect())
    }
}
