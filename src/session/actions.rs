use super::*;
use crate::data::QuestionBank;
use crate::model::AnswerRecord;
use crate::view_models::{AnswerOutcome, SessionSnapshot};

impl QuizSession {
    /// Arranca (o rearranca) la sesión. Legal desde cualquier estado y nunca
    /// falla: descarta todo el progreso anterior.
    pub fn start(&mut self, player_name: &str, bank: &QuestionBank) -> SessionSnapshot {
        let trimmed = player_name.trim();
        self.player_name = if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        self.cursor = 0;
        self.score = 0;
        self.answers.clear();
        self.state = SessionState::InProgress;

        log::debug!(
            "sesión iniciada para '{}' con {} preguntas",
            self.player_name,
            bank.len()
        );

        SessionSnapshot {
            player_name: self.player_name.clone(),
            total_questions: bank.len(),
        }
    }

    /// Valida la respuesta de la pregunta en el cursor y avanza. Es la única
    /// operación que mueve el cursor, así que cada posición se sirve y se
    /// responde como mucho una vez por pasada.
    pub fn submit_answer(
        &mut self,
        bank: &QuestionBank,
        selected: i64,
        time_spent_ms: u64,
    ) -> Result<AnswerOutcome, SessionError> {
        match self.state {
            SessionState::NotStarted => return Err(SessionError::NotStarted),
            SessionState::Completed => return Err(SessionError::AlreadyCompleted),
            SessionState::InProgress => {}
        }

        // Guarda propia contra doble envío: aunque el estado diga InProgress,
        // si el cursor ya agotó el banco no hay nada que puntuar.
        let question = bank.get(self.cursor).ok_or(SessionError::AlreadyCompleted)?;

        let is_correct = question.is_correct(selected);
        if is_correct {
            self.score += POINTS_PER_QUESTION;
        }

        self.answers.push(AnswerRecord {
            question_number: question.number,
            selected,
            is_correct,
            time_spent_ms,
        });
        self.cursor += 1;

        if self.cursor == bank.len() {
            self.state = SessionState::Completed;
            log::debug!("quiz completado: {} puntos", self.score);
        }

        Ok(AnswerOutcome {
            is_correct,
            correct_answer: question.correct_index,
            correct_answer_text: question.correct_answer_text().to_string(),
            fun_fact: question.explanation.clone(),
            score: self.score,
            is_quiz_completed: self.state == SessionState::Completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, NO_ANSWER, Question};

    fn bank() -> QuestionBank {
        let questions = vec![
            Question {
                number: 1,
                text: "First?".into(),
                difficulty: Difficulty::Easy,
                options: vec!["a".into(), "b".into()],
                correct_index: 1,
                explanation: "because b".into(),
            },
            Question {
                number: 2,
                text: "Second?".into(),
                difficulty: Difficulty::Hard,
                options: vec!["c".into(), "d".into()],
                correct_index: 1,
                explanation: "because d".into(),
            },
        ];
        QuestionBank::new(questions).unwrap()
    }

    #[test]
    fn start_trims_name_and_defaults_to_placeholder() {
        let bank = bank();
        let mut session = QuizSession::new();

        let snapshot = session.start("  Alice  ", &bank);
        assert_eq!(snapshot.player_name, "Alice");
        assert_eq!(snapshot.total_questions, 2);

        session.start("   ", &bank);
        assert_eq!(session.player_name(), DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn full_run_matches_reference_scenario() {
        let bank = bank();
        let mut session = QuizSession::new();
        session.start("Alice", &bank);

        let first = session.submit_answer(&bank, 1, 5000).unwrap();
        assert!(first.is_correct);
        assert_eq!(first.score, 100);
        assert!(!first.is_quiz_completed);
        assert_eq!(session.cursor(), session.answers().len());

        let second = session.submit_answer(&bank, 0, 3000).unwrap();
        assert!(!second.is_correct);
        assert_eq!(second.score, 100);
        assert!(second.is_quiz_completed);
        assert_eq!(second.correct_answer, 1);
        assert_eq!(second.correct_answer_text, "d");
        assert_eq!(second.fun_fact, "because d");

        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.cursor(), 2);
        assert_eq!(session.answers().len(), 2);
    }

    #[test]
    fn no_answer_sentinel_is_always_incorrect() {
        let bank = bank();
        let mut session = QuizSession::new();
        session.start("Bob", &bank);

        let outcome = session.submit_answer(&bank, NO_ANSWER, 30000).unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.score, 0);
        assert_eq!(session.answers()[0].selected, NO_ANSWER);
    }

    #[test]
    fn out_of_range_index_is_incorrect_not_an_error() {
        let bank = bank();
        let mut session = QuizSession::new();
        session.start("Bob", &bank);

        let outcome = session.submit_answer(&bank, 99, 1000).unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn submit_is_rejected_before_start_and_after_completion() {
        let bank = bank();
        let mut session = QuizSession::new();

        assert_eq!(
            session.submit_answer(&bank, 0, 0),
            Err(SessionError::NotStarted)
        );

        session.start("Bob", &bank);
        session.submit_answer(&bank, 1, 100).unwrap();
        session.submit_answer(&bank, 1, 100).unwrap();

        assert_eq!(
            session.submit_answer(&bank, 1, 100),
            Err(SessionError::AlreadyCompleted)
        );
        // El envío rechazado no toca el estado
        assert_eq!(session.cursor(), 2);
        assert_eq!(session.score(), 200);
    }

    #[test]
    fn score_is_derived_from_correct_answers() {
        let bank = bank();
        let mut session = QuizSession::new();
        session.start("Bob", &bank);
        session.submit_answer(&bank, 1, 10).unwrap();
        session.submit_answer(&bank, 0, 10).unwrap();

        let correct = session.answers().iter().filter(|a| a.is_correct).count();
        assert_eq!(session.score(), POINTS_PER_QUESTION * correct as u32);
    }
}
