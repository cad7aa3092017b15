// src/data.rs

use crate::model::Question;
use thiserror::Error;

/// Fallos de validación del banco de preguntas. Son fatales: se detectan al
/// arrancar y el servidor no debe levantarse con un banco inválido.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no se pudo parsear el banco de preguntas YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("el banco de preguntas está vacío")]
    Empty,
    #[error("pregunta {number}: hacen falta al menos 2 opciones (hay {got})")]
    TooFewOptions { number: usize, got: usize },
    #[error("pregunta {number}: correct_index {index} fuera de rango (0..{len})")]
    CorrectIndexOutOfRange {
        number: usize,
        index: usize,
        len: usize,
    },
}

/// Catálogo ordenado e inmutable de preguntas. Sin operaciones de mutación:
/// una vez validado, sólo lectura por índice.
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Carga el banco de preguntas desde el YAML embebido
    pub fn embedded() -> Result<Self, ConfigError> {
        let file_content = include_str!("data/quiz_questions.yaml");
        Self::from_yaml(file_content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let questions: Vec<Question> = serde_yaml::from_str(content)?;
        Self::new(questions)
    }

    pub fn new(questions: Vec<Question>) -> Result<Self, ConfigError> {
        if questions.is_empty() {
            return Err(ConfigError::Empty);
        }
        for q in &questions {
            if q.options.len() < 2 {
                return Err(ConfigError::TooFewOptions {
                    number: q.number,
                    got: q.options.len(),
                });
            }
            if q.correct_index >= q.options.len() {
                return Err(ConfigError::CorrectIndexOutOfRange {
                    number: q.number,
                    index: q.correct_index,
                    len: q.options.len(),
                });
            }
        }
        Ok(Self { questions })
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    fn question(number: usize, options: usize, correct_index: usize) -> Question {
        Question {
            number,
            text: format!("Question {number}?"),
            difficulty: Difficulty::Easy,
            options: (0..options).map(|i| format!("option {i}")).collect(),
            correct_index,
            explanation: String::new(),
        }
    }

    #[test]
    fn embedded_bank_loads_and_validates() {
        let bank = QuestionBank::embedded().expect("embedded bank should be valid");
        assert_eq!(bank.len(), 10);
        assert_eq!(bank.get(0).unwrap().number, 1);
        assert!(bank.get(10).is_none());
    }

    #[test]
    fn rejects_empty_bank() {
        assert!(matches!(
            QuestionBank::new(vec![]),
            Err(ConfigError::Empty)
        ));
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let result = QuestionBank::new(vec![question(1, 4, 4)]);
        assert!(matches!(
            result,
            Err(ConfigError::CorrectIndexOutOfRange {
                number: 1,
                index: 4,
                len: 4
            })
        ));
    }

    #[test]
    fn rejects_single_option_question() {
        let result = QuestionBank::new(vec![question(1, 1, 0)]);
        assert!(matches!(
            result,
            Err(ConfigError::TooFewOptions { number: 1, got: 1 })
        ));
    }
}
