//! Vistas serializables que el protocolo devuelve al cliente. Los nombres de
//! campo en camelCase son contrato observable: el frontend los lee tal cual.

use crate::model::Difficulty;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub player_name: String,
    pub total_questions: usize,
}

/// Pregunta tal y como se sirve al cliente. Nunca incluye `correct_index` ni
/// el texto de la respuesta correcta: eso sólo viaja tras responder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub question_number: usize,
    pub total_questions: usize,
    pub difficulty: Difficulty,
    pub question_text: String,
    pub options: Vec<String>,
    pub current_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub correct_answer: usize,
    pub correct_answer_text: String,
    pub fun_fact: String,
    pub score: u32,
    pub is_quiz_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    pub correct_answers: usize,
    pub total_questions: usize,
    pub accuracy: f64,
    pub final_score: u32,
    /// Reservado: el contrato lo reporta siempre a 0, nunca se calcula.
    pub time_bonus: u32,
}
