//! Model Artifacts & Lazy Loader
//!
//! The recommendation relies on two pre-trained artifacts exported as JSON:
//! a classifier mapping the 12 answers to an encoded label, and a label
//! encoder turning that label back into a category name.
//!
//! Artifacts are loaded on first use into write-once slots and kept for the
//! life of the process. A missing or broken file leaves its slot empty; the
//! prediction route reports that to the client.

use log::{error, info, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

// ============================================================
// ERRORS
// ============================================================

/// Failure reading an artifact from disk
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while running a loaded artifact
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("X has {got} features, but the classifier expects {expected} features as input")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("y contains previously unseen labels: {0}")]
    UnseenLabel(usize),
}

// ============================================================
// CLASSIFIER
// ============================================================

/// Predict-only view of a trained classifier
pub trait Classifier: Send + Sync {
    /// Number of features each row must have
    fn n_features(&self) -> usize;

    /// Predict the encoded label of every row
    fn predict(&self, rows: ArrayView2<f64>) -> Result<Array1<usize>, ModelError> {
        if rows.ncols() != self.n_features() {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features(),
                got: rows.ncols(),
            });
        }
        Ok(rows.outer_iter().map(|row| self.predict_row(row)).collect())
    }

    /// Predict a single row already known to have the right width
    fn predict_row(&self, row: ArrayView1<f64>) -> usize;
}

/// Classifier artifact as exported to JSON
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Linear(LinearModel),
    Svc(SvcModel),
}

impl Classifier for ClassifierArtifact {
    fn n_features(&self) -> usize {
        match self {
            ClassifierArtifact::Linear(m) => m.n_features(),
            ClassifierArtifact::Svc(m) => m.n_features(),
        }
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> usize {
        match self {
            ClassifierArtifact::Linear(m) => m.predict_row(row),
            ClassifierArtifact::Svc(m) => m.predict_row(row),
        }
    }
}

/// Build a dense matrix from JSON rows, checking they are rectangular
fn rows_to_array(name: &str, rows: Vec<Vec<f64>>) -> Result<Array2<f64>, String> {
    let n_rows = rows.len();
    let n_cols = rows.first().map(Vec::len).unwrap_or(0);
    if let Some(bad) = rows.iter().position(|r| r.len() != n_cols) {
        return Err(format!(
            "{} row {} has {} values, expected {}",
            name,
            bad,
            rows[bad].len(),
            n_cols
        ));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|e| format!("{}: {}", name, e))
}

// ------------------------------------------------------------
// Linear one-vs-rest
// ------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct RawLinearModel {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

/// One-vs-rest linear decision functions
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawLinearModel")]
pub struct LinearModel {
    coef: Array2<f64>,
    intercept: Array1<f64>,
}

impl TryFrom<RawLinearModel> for LinearModel {
    type Error = String;

    fn try_from(raw: RawLinearModel) -> Result<Self, Self::Error> {
        let coef = rows_to_array("coef", raw.coef)?;
        if coef.nrows() == 0 || coef.ncols() == 0 {
            return Err("coef must not be empty".to_string());
        }
        if raw.intercept.len() != coef.nrows() {
            return Err(format!(
                "intercept has {} values, coef has {} rows",
                raw.intercept.len(),
                coef.nrows()
            ));
        }
        Ok(Self {
            coef,
            intercept: Array1::from(raw.intercept),
        })
    }
}

impl LinearModel {
    pub fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> usize {
        let scores = self.coef.dot(&row) + &self.intercept;
        if scores.len() == 1 {
            return usize::from(scores[0] > 0.0);
        }
        argmax(scores.view())
    }
}

// ------------------------------------------------------------
// Kernel SVC, one-vs-one
// ------------------------------------------------------------

/// SVC kernel function
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
    Poly { gamma: f64, coef0: f64, degree: i32 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    fn apply(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        match *self {
            Kernel::Linear => a.dot(&b),
            Kernel::Rbf { gamma } => {
                let dist: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
                (-gamma * dist).exp()
            }
            Kernel::Poly {
                gamma,
                coef0,
                degree,
            } => (gamma * a.dot(&b) + coef0).powi(degree),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * a.dot(&b) + coef0).tanh(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawSvcModel {
    kernel: Kernel,
    support_vectors: Vec<Vec<f64>>,
    n_support: Vec<usize>,
    dual_coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

/// Kernel support vector classifier with pairwise voting
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawSvcModel")]
pub struct SvcModel {
    kernel: Kernel,
    support_vectors: Array2<f64>,
    /// Start offset of each class's support vectors
    offsets: Vec<usize>,
    n_support: Vec<usize>,
    dual_coef: Array2<f64>,
    intercept: Vec<f64>,
}

impl TryFrom<RawSvcModel> for SvcModel {
    type Error = String;

    fn try_from(raw: RawSvcModel) -> Result<Self, Self::Error> {
        let n_classes = raw.n_support.len();
        if n_classes < 2 {
            return Err(format!("n_support lists {} classes, need at least 2", n_classes));
        }
        let support_vectors = rows_to_array("support_vectors", raw.support_vectors)?;
        let n_sv: usize = raw.n_support.iter().sum();
        if support_vectors.nrows() != n_sv || n_sv == 0 {
            return Err(format!(
                "n_support sums to {}, but there are {} support vectors",
                n_sv,
                support_vectors.nrows()
            ));
        }
        let dual_coef = rows_to_array("dual_coef", raw.dual_coef)?;
        if dual_coef.nrows() != n_classes - 1 || dual_coef.ncols() != n_sv {
            return Err(format!(
                "dual_coef must be {}x{}, got {}x{}",
                n_classes - 1,
                n_sv,
                dual_coef.nrows(),
                dual_coef.ncols()
            ));
        }
        let pairs = n_classes * (n_classes - 1) / 2;
        if raw.intercept.len() != pairs {
            return Err(format!(
                "intercept has {} values, expected {} class pairs",
                raw.intercept.len(),
                pairs
            ));
        }

        let offsets = raw
            .n_support
            .iter()
            .scan(0usize, |start, count| {
                let current = *start;
                *start += count;
                Some(current)
            })
            .collect();

        Ok(Self {
            kernel: raw.kernel,
            support_vectors,
            offsets,
            n_support: raw.n_support,
            dual_coef,
            intercept: raw.intercept,
        })
    }
}

impl SvcModel {
    pub fn n_features(&self) -> usize {
        self.support_vectors.ncols()
    }

    pub fn n_classes(&self) -> usize {
        self.n_support.len()
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> usize {
        let kvalues: Vec<f64> = self
            .support_vectors
            .outer_iter()
            .map(|sv| self.kernel.apply(sv, row))
            .collect();

        let n_classes = self.n_classes();
        let mut votes = vec![0usize; n_classes];
        let mut pair = 0;
        for i in 0..n_classes {
            for j in (i + 1)..n_classes {
                let mut decision = self.intercept[pair];
                for sv in self.offsets[i]..self.offsets[i] + self.n_support[i] {
                    decision += self.dual_coef[[j - 1, sv]] * kvalues[sv];
                }
                for sv in self.offsets[j]..self.offsets[j] + self.n_support[j] {
                    decision += self.dual_coef[[i, sv]] * kvalues[sv];
                }
                if decision > 0.0 {
                    votes[i] += 1;
                } else {
                    votes[j] += 1;
                }
                pair += 1;
            }
        }

        // First class with the most votes
        let mut best = 0;
        for (class, count) in votes.iter().enumerate() {
            if *count > votes[best] {
                best = class;
            }
        }
        best
    }
}

/// Index of the largest value, earliest index on ties
fn argmax(values: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

// ============================================================
// LABEL ENCODER
// ============================================================

#[derive(Debug, Clone, Deserialize)]
struct RawLabelEncoder {
    classes: Vec<String>,
}

/// Maps encoded labels back to category names
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawLabelEncoder")]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl TryFrom<RawLabelEncoder> for LabelEncoder {
    type Error = String;

    fn try_from(raw: RawLabelEncoder) -> Result<Self, Self::Error> {
        if raw.classes.is_empty() {
            return Err("label encoder has no classes".to_string());
        }
        Ok(Self {
            classes: raw.classes,
        })
    }
}

impl LabelEncoder {
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn inverse_transform(&self, encoded: &[usize]) -> Result<Vec<String>, ModelError> {
        encoded
            .iter()
            .map(|idx| {
                self.classes
                    .get(*idx)
                    .cloned()
                    .ok_or(ModelError::UnseenLabel(*idx))
            })
            .collect()
    }
}

// ============================================================
// MODEL STORE
// ============================================================

/// Paths of the two artifacts
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub label_encoder: PathBuf,
}

/// Process-wide holder for the loaded artifacts.
///
/// Each slot moves from unloaded to loaded exactly once. Racing first
/// requests may both read the file; the first stored value is kept.
pub struct ModelStore {
    paths: ArtifactPaths,
    classifier: OnceLock<Arc<dyn Classifier>>,
    label_encoder: OnceLock<Arc<LabelEncoder>>,
}

/// Both artifacts, ready for prediction
#[derive(Clone)]
pub struct LoadedModels {
    pub classifier: Arc<dyn Classifier>,
    pub label_encoder: Arc<LabelEncoder>,
}

impl ModelStore {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            classifier: OnceLock::new(),
            label_encoder: OnceLock::new(),
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Load whichever artifacts are still missing.
    ///
    /// Never fails: problems are logged and the slot stays empty.
    pub fn load(&self) {
        if self.classifier.get().is_none() {
            if let Some(model) = load_slot::<ClassifierArtifact>("model", &self.paths.classifier) {
                let _ = self.classifier.set(Arc::new(model));
            }
        }

        if self.label_encoder.get().is_none() {
            if let Some(encoder) = load_slot::<LabelEncoder>("label encoder", &self.paths.label_encoder) {
                let _ = self.label_encoder.set(Arc::new(encoder));
            }
        }
    }

    /// Loaded artifacts, if both are present. Does not trigger loading.
    pub fn loaded(&self) -> Option<LoadedModels> {
        Some(LoadedModels {
            classifier: self.classifier.get()?.clone(),
            label_encoder: self.label_encoder.get()?.clone(),
        })
    }

    /// Load if needed and return both artifacts when available
    pub fn ensure_loaded(&self) -> Option<LoadedModels> {
        self.load();
        self.loaded()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded().is_some()
    }
}

fn load_slot<T: for<'de> Deserialize<'de>>(what: &str, path: &Path) -> Option<T> {
    if !path.exists() {
        warn!("{} file not found at {}", capitalize(what), path.display());
        return None;
    }
    match read_artifact::<T>(path) {
        Ok(value) => {
            info!("Loaded {} from {}", what, path.display());
            Some(value)
        }
        Err(e) => {
            error!("Failed to load {}: {}", what, error_chain(&e));
            None
        }
    }
}

/// Read and deserialize one JSON artifact
pub fn read_artifact<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render an error with all of its sources
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": caused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
