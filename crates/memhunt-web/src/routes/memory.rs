//! Memory report endpoints: GET /memory/*

use axum::{extract::State, response::Json};
use chrono::{SecondsFormat, Utc};
use memhunt_core::{BiggestOffender, CommonTypes, MemoryReporter, MemorySummary, Report};
use serde::Serialize;
use tracing::error;

use crate::error::{INTERNAL_ERROR_MESSAGE, Result};
use crate::state::AppState;

/// Response of `GET /memory/debug`.
#[derive(Debug, Serialize)]
pub struct DebugResponse {
    memory_summary: Report<MemorySummary>,
    common_types: Report<CommonTypes>,
    biggest_offender: Report<BiggestOffender>,
    timestamp: String,
}

/// GET /memory/summary
pub async fn summary(State(state): State<AppState>) -> Result<Json<Report<MemorySummary>>> {
    state
        .report(MemoryReporter::get_summary)
        .await
        .map(Json)
}

/// GET /memory/common-types
pub async fn common_types(State(state): State<AppState>) -> Result<Json<Report<CommonTypes>>> {
    state
        .report(MemoryReporter::get_common_types)
        .await
        .map(Json)
}

/// GET /memory/biggest-offender
pub async fn biggest_offender(
    State(state): State<AppState>,
) -> Result<Json<Report<BiggestOffender>>> {
    state
        .report(MemoryReporter::get_biggest_offender)
        .await
        .map(Json)
}

/// GET /memory/debug - All three reports, each isolated from the others.
pub async fn debug(State(state): State<AppState>) -> Json<DebugResponse> {
    let (memory_summary, common_types, biggest_offender) = tokio::join!(
        state.report(MemoryReporter::get_summary),
        state.report(MemoryReporter::get_common_types),
        state.report(MemoryReporter::get_biggest_offender),
    );

    Json(DebugResponse {
        memory_summary: isolate("memory_summary", memory_summary),
        common_types: isolate("common_types", common_types),
        biggest_offender: isolate("biggest_offender", biggest_offender),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

/// Keep one failed section from failing the whole debug response.
fn isolate<T>(section: &'static str, result: Result<Report<T>>) -> Report<T> {
    result.unwrap_or_else(|e| {
        error!(section, error = %e, "Debug section failed");
        Report::Error {
            message: INTERNAL_ERROR_MESSAGE.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_isolate_turns_failed_section_into_error_payload() {
        let section: Report<CommonTypes> =
            isolate("common_types", Err(AppError::internal("reporter task failed")));

        assert_eq!(
            section,
            Report::Error {
                message: INTERNAL_ERROR_MESSAGE.to_string(),
            }
        );
    }

    #[test]
    fn test_isolate_passes_reports_through() {
        let report = Report::Success(CommonTypes::default());
        assert_eq!(isolate("common_types", Ok(report.clone())), report);
    }
}
