use crate::model::{AnswerRecord, SessionState};
use thiserror::Error;

// Submódulos
pub mod actions;
pub mod queries;
pub mod resets;

/// Premio fijo por acierto. Sin crédito parcial ni bonus por velocidad.
pub const POINTS_PER_QUESTION: u32 = 100;
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous Player";

/// Señales recuperables del motor de sesión. La capa de protocolo las traduce
/// a respuestas `{success:false, ...}`; nunca tumban el proceso.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("la sesión todavía no ha empezado")]
    NotStarted,
    #[error("el quiz ya está completado")]
    AlreadyCompleted,
    #[error("el quiz todavía no ha terminado")]
    QuizNotFinished,
}

/// Sesión única de quiz. Máquina de estados
/// NotStarted --start--> InProgress --(última respuesta)--> Completed,
/// con reset desde cualquier estado.
///
/// Invariantes que mantiene cada operación:
/// - `cursor == answers.len()` en todo momento
/// - `state == Completed` si y sólo si `cursor == bank.len()`
/// - `score == POINTS_PER_QUESTION * aciertos` (derivado, nunca mutado aparte)
///
/// Los campos son privados a propósito: sólo las operaciones del motor pueden
/// tocarlos, los submódulos acceden vía `use super::*;`.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    state: SessionState,
    player_name: String,
    cursor: usize,
    answers: Vec<AnswerRecord>,
    score: u32,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    // Accesores de sólo lectura
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }
}
