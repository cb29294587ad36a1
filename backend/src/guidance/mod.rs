//! Guidance Module - Quiz scoring and career recommendation
//!
//! Architecture:
//! - Quiz: fixed questions tagged with personality dimensions
//! - Answers: ordered validation of client-supplied answers
//! - Model: lazily loaded classifier + label encoder artifacts
//! - Predictor: runs the artifacts and attaches category guidance
//! - Catalog: static messages, degrees and careers per category

pub mod answers;
pub mod catalog;
pub mod model;
pub mod predictor;
pub mod quiz;

pub use answers::{decode_answers, AnswerError, AnswerVector};
pub use model::{ArtifactPaths, LoadedModels, ModelError, ModelStore};
pub use predictor::{recommend, Recommendation};
pub use quiz::{Dimension, DimensionScores, Question, QUESTIONS, QUESTION_COUNT};
