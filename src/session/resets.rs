use super::*;

impl QuizSession {
    /// Vuelve a NotStarted descartando nombre, cursor, respuestas y puntuación.
    /// Siempre legal; el único camino de InProgress hacia atrás.
    pub fn reset(&mut self) {
        *self = QuizSession::default();
        log::debug!("sesión reiniciada");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuestionBank;
    use crate::model::{Difficulty, Question};

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![Question {
            number: 1,
            text: "Only one?".into(),
            difficulty: Difficulty::Easy,
            options: vec!["a".into(), "b".into()],
            correct_index: 0,
            explanation: String::new(),
        }])
        .unwrap()
    }

    #[test]
    fn reset_from_completed_allows_a_fresh_start() {
        let bank = bank();
        let mut session = QuizSession::new();
        session.start("Alice", &bank);
        session.submit_answer(&bank, 0, 100).unwrap();
        assert_eq!(session.state(), SessionState::Completed);

        session.reset();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.player_name(), "");

        session.start("Alice", &bank);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.state(), SessionState::InProgress);
    }
}
