use serde::{Deserialize, Serialize};

/// Índice centinela "sin respuesta": lo envía el cliente cuando el temporizador
/// expira sin selección. Siempre puntúa como incorrecta.
pub const NO_ANSWER: i64 = -1;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Question {
    pub number: usize, // Posición 1-based en el banco
    pub text: String,
    pub difficulty: Difficulty,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

impl Question {
    /// `selected` llega como i64 porque el protocolo admite el centinela -1;
    /// cualquier índice fuera de `options` cuenta como incorrecto.
    pub fn is_correct(&self, selected: i64) -> bool {
        selected >= 0 && (selected as usize) == self.correct_index
    }

    pub fn correct_answer_text(&self) -> &str {
        self.options
            .get(self.correct_index)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Registro inmutable de una pregunta ya respondida.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnswerRecord {
    pub question_number: usize,
    pub selected: i64,
    pub is_correct: bool,
    pub time_spent_ms: u64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::NotStarted
    }
}
