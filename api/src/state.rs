//! API-level shared state.
//!
//! Extends the application state with the grading model gateway, which is
//! constructed once at startup (one HTTP client, one configuration read)
//! and shared by every request instead of being rebuilt per submission.

use std::sync::Arc;

use grader::gateway::GradingModel;
use grader::pipeline::GradingPipeline;
use sea_orm::DatabaseConnection;
use util::state::AppState;

/// State handed to every route handler: database access plus the shared
/// grading model gateway.
#[derive(Clone)]
pub struct ApiState {
    app: AppState,
    model: Arc<dyn GradingModel>,
}

impl ApiState {
    pub fn new(app: AppState, model: Arc<dyn GradingModel>) -> Self {
        Self { app, model }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.app.db()
    }

    pub fn db_clone(&self) -> DatabaseConnection {
        self.app.db_clone()
    }

    /// Builds a grading pipeline over the shared gateway. Cheap: both the
    /// connection handle and the gateway are reference-counted.
    pub fn pipeline(&self) -> GradingPipeline {
        GradingPipeline::new(self.db_clone(), self.model.clone())
    }
}
