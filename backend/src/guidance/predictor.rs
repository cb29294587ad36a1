//! Recommendation Pipeline
//!
//! answers -> feature row -> classifier -> label encoder -> category lookup.

use super::answers::AnswerVector;
use super::catalog::{self, Suggestion};
use super::model::{Classifier, LoadedModels, ModelError};
use super::quiz::{dimension_scores, DimensionScores, QUESTION_COUNT};
use ndarray::Array2;
use serde::Serialize;

/// Response body of a successful prediction
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub recommendation: String,
    pub message: &'static str,
    pub careers: &'static [Suggestion],
    pub degrees: &'static [Suggestion],
    pub dimension_scores: DimensionScores,
}

/// Single-row feature matrix for the classifier
pub fn feature_matrix(answers: &AnswerVector) -> Array2<f64> {
    Array2::from_shape_fn((1, QUESTION_COUNT), |(_, col)| answers[col] as f64)
}

/// Classify validated answers and attach the category guidance
pub fn recommend(models: &LoadedModels, answers: &AnswerVector) -> Result<Recommendation, ModelError> {
    let features = feature_matrix(answers);
    let encoded = models.classifier.predict(features.view())?;
    let label = models
        .label_encoder
        .inverse_transform(&encoded.to_vec())?
        .into_iter()
        .next()
        .unwrap_or_default();

    Ok(Recommendation {
        message: catalog::message_for(&label),
        careers: catalog::careers_for(&label),
        degrees: catalog::degrees_for(&label),
        dimension_scores: dimension_scores(answers),
        recommendation: label,
    })
}
