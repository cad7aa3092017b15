use super::*;
use crate::data::QuestionBank;
use crate::view_models::{QuestionView, ResultsSummary};

impl QuizSession {
    /// Devuelve la pregunta en el cursor sin avanzarlo: llamadas repetidas
    /// entre envíos devuelven exactamente la misma pregunta. Los dos fallos
    /// son variantes distintas porque el protocolo necesita distinguir
    /// "completado" (redirigir a resultados) de "sin empezar".
    pub fn current_question(&self, bank: &QuestionBank) -> Result<QuestionView, SessionError> {
        match self.state {
            SessionState::NotStarted => return Err(SessionError::NotStarted),
            SessionState::Completed => return Err(SessionError::AlreadyCompleted),
            SessionState::InProgress => {}
        }

        let question = bank.get(self.cursor).ok_or(SessionError::AlreadyCompleted)?;

        Ok(QuestionView {
            question_number: self.cursor + 1,
            total_questions: bank.len(),
            difficulty: question.difficulty,
            question_text: question.text.clone(),
            options: question.options.clone(),
            current_score: self.score,
        })
    }

    /// Resumen final. Política estricta: sólo con el quiz completado; pedir
    /// resultados a mitad de partida es `QuizNotFinished`.
    pub fn results(&self, bank: &QuestionBank) -> Result<ResultsSummary, SessionError> {
        if self.state != SessionState::Completed {
            return Err(SessionError::QuizNotFinished);
        }

        let correct_answers = self.answers.iter().filter(|a| a.is_correct).count();
        let total_questions = bank.len();
        let accuracy = if total_questions == 0 {
            0.0
        } else {
            correct_answers as f64 / total_questions as f64 * 100.0
        };

        Ok(ResultsSummary {
            correct_answers,
            total_questions,
            accuracy,
            final_score: self.score,
            time_bonus: 0,
        })
    }
}
