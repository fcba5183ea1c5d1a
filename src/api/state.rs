//! Application state for the claim service.

use std::sync::Arc;

use crate::pipeline::ClaimPipeline;

/// Shared application state.
///
/// Holds the pipeline every request runs through and the schedule it
/// queries.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<ClaimPipeline>,
    schedule_name: Arc<str>,
}

impl AppState {
    /// Creates the state for `schedule_name`.
    pub fn new(pipeline: ClaimPipeline, schedule_name: impl Into<String>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            schedule_name: Arc::from(schedule_name.into()),
        }
    }

    /// Returns the pipeline.
    pub fn pipeline(&self) -> Arc<ClaimPipeline> {
        Arc::clone(&self.pipeline)
    }

    /// Returns the configured schedule name.
    pub fn schedule_name(&self) -> &str {
        &self.schedule_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
