//! Quiz Questions & Dimension Scoring
//!
//! The quiz is a fixed list of twelve prompts. Each prompt is tagged with
//! one of six personality dimensions, and every dimension owns exactly two
//! consecutive questions.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Number of questions (and therefore answers) in the quiz
pub const QUESTION_COUNT: usize = 12;

pub const DIMENSION_COUNT: usize = 6;

// ============================================================
// DIMENSIONS
// ============================================================

/// Personality dimension a question contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dimension {
    Realistic,
    Investigative,
    Artistic,
    Social,
    Enterprising,
    Conventional,
}

impl Dimension {
    /// All dimensions in quiz order
    pub const ALL: [Dimension; DIMENSION_COUNT] = [
        Dimension::Realistic,
        Dimension::Investigative,
        Dimension::Artistic,
        Dimension::Social,
        Dimension::Enterprising,
        Dimension::Conventional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Realistic => "Realistic",
            Dimension::Investigative => "Investigative",
            Dimension::Artistic => "Artistic",
            Dimension::Social => "Social",
            Dimension::Enterprising => "Enterprising",
            Dimension::Conventional => "Conventional",
        }
    }
}

// ============================================================
// QUESTIONS
// ============================================================

/// A single quiz prompt
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    pub index: usize,
    pub prompt: &'static str,
    pub dimension: Dimension,
}

const fn question(index: usize, prompt: &'static str, dimension: Dimension) -> Question {
    Question {
        index,
        prompt,
        dimension,
    }
}

/// The fixed quiz, in the order answers are expected
pub static QUESTIONS: [Question; QUESTION_COUNT] = [
    question(
        0,
        "🔧 Do you enjoy hands-on activities like fixing gadgets, repairing things, or working with mechanical tools?",
        Dimension::Realistic,
    ),
    question(
        1,
        "🌳 Do you prefer spending time outdoors and being physically active rather than sitting indoors for long hours?",
        Dimension::Realistic,
    ),
    question(
        2,
        "🧩 Do you like solving complex problems, puzzles, or understanding how things work at a deeper level?",
        Dimension::Investigative,
    ),
    question(
        3,
        "🔬 Are you interested in conducting experiments, doing research, or exploring abstract scientific ideas?",
        Dimension::Investigative,
    ),
    question(
        4,
        "🎨 Do you feel fulfilled when you express yourself creatively through art, music, writing, or design?",
        Dimension::Artistic,
    ),
    question(
        5,
        "🕒 Do you enjoy having flexibility in your work schedule rather than following a strict routine?",
        Dimension::Artistic,
    ),
    question(
        6,
        "❤️ Do you feel happy when helping, teaching, or taking care of others?",
        Dimension::Social,
    ),
    question(
        7,
        "👂 Are you good at listening to people and helping them resolve conflicts or problems?",
        Dimension::Social,
    ),
    question(
        8,
        "👔 Do you enjoy leading teams, persuading others, or taking on business challenges?",
        Dimension::Enterprising,
    ),
    question(
        9,
        "🚀 Do you feel ambitious and motivated to take risks in order to achieve bigger goals?",
        Dimension::Enterprising,
    ),
    question(
        10,
        "📋 Do you like working in an organized environment with clear rules, predictable tasks, and step-by-step processes?",
        Dimension::Conventional,
    ),
    question(
        11,
        "📊 Do you enjoy managing data, handling budgets, or keeping detailed records and reports?",
        Dimension::Conventional,
    ),
];

/// Question prompts in order, as handed to the quiz page
pub fn question_prompts() -> Vec<&'static str> {
    QUESTIONS.iter().map(|q| q.prompt).collect()
}

// ============================================================
// DIMENSION SCORES
// ============================================================

/// Per-dimension answer totals, kept in quiz order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionScores {
    totals: [i64; DIMENSION_COUNT],
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> i64 {
        self.totals[Self::slot(dimension)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, i64)> + '_ {
        Dimension::ALL.iter().map(move |d| (*d, self.get(*d)))
    }

    fn slot(dimension: Dimension) -> usize {
        Dimension::ALL
            .iter()
            .position(|d| *d == dimension)
            .unwrap_or_default()
    }
}

// Serialized as a JSON object whose keys follow quiz order
impl Serialize for DimensionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.totals.len()))?;
        for (dimension, total) in self.iter() {
            map.serialize_entry(dimension.as_str(), &total)?;
        }
        map.end()
    }
}

/// Sum each answer into the dimension its question is tagged with
pub fn dimension_scores(answers: &[i64; QUESTION_COUNT]) -> DimensionScores {
    let mut totals = [0i64; DIMENSION_COUNT];
    for (question, answer) in QUESTIONS.iter().zip(answers.iter()) {
        let slot = DimensionScores::slot(question.dimension);
        totals[slot] = totals[slot].saturating_add(*answer);
    }
    DimensionScores { totals }
}
