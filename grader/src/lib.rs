//! Automated grading of student submissions.
//!
//! The crate is organized around one pipeline with clear stage boundaries:
//!
//! - [`context`]: joins questions, reference answers and the student's
//!   submission into the prompt blocks and the ordinal mapping.
//! - [`prompt`]: renders the four-segment grading prompt, purely.
//! - [`gateway`]: transport to the external grading model, selected by
//!   configuration.
//! - [`parse`]: sanitizes and validates the model's raw reply.
//! - [`persist`]: writes grades, comments and advice, and serves the
//!   teacher/reader operations.
//! - [`pipeline`]: wires the stages into one atomic grading attempt.

pub mod context;
pub mod error;
pub mod gateway;
pub mod parse;
pub mod persist;
pub mod pipeline;
pub mod prompt;

pub use context::SubmittedAnswer;
pub use error::GraderError;
pub use persist::{GradingFeedback, QuestionFeedback};
pub use pipeline::{GradingPipeline, GradingReport};
