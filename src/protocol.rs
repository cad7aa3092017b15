//! Capa de protocolo: traduce los cinco comandos del cliente a operaciones
//! del motor de sesión y da forma a las respuestas JSON. Aquí vive también la
//! coerción de entrada: los cuerpos llegan como
//! `application/x-www-form-urlencoded` y un campo imposible de parsear se
//! trata como centinela, nunca como error.

use std::collections::HashMap;

use serde::Serialize;

use crate::data::QuestionBank;
use crate::model::NO_ANSWER;
use crate::session::{QuizSession, SessionError};
use crate::view_models::{AnswerOutcome, QuestionView, ResultsSummary};

/// Literal exacto que el cliente compara con `===` para decidir si redirige a
/// resultados en vez de mostrar un error genérico. No tocar ni un byte.
pub const ERR_NO_ACTIVE_SESSION: &str = "No active quiz session or quiz completed";

const MSG_QUIZ_STARTED: &str = "Quiz started successfully!";
const MSG_QUIZ_RESET: &str = "Quiz reset successfully";
const ERR_NO_CURRENT_QUESTION: &str = "No current question available";
const ERR_QUIZ_NOT_FINISHED: &str = "Quiz is not completed yet";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub success: bool,
    pub total_questions: usize,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: Option<AnswerOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/quiz/start — siempre tiene éxito, reinicie lo que reinicie.
pub fn handle_start(session: &mut QuizSession, bank: &QuestionBank, body: &str) -> StartResponse {
    let params = parse_form_data(body);
    let player_name = params.get("playerName").map(String::as_str).unwrap_or("");
    let snapshot = session.start(player_name, bank);

    StartResponse {
        success: true,
        total_questions: snapshot.total_questions,
        message: MSG_QUIZ_STARTED,
    }
}

/// GET /api/quiz/question — sirve la pregunta del cursor. Tanto "sin empezar"
/// como "completado" devuelven el mismo literal (el cliente lo exige así),
/// pero se registran distinto.
pub fn handle_question(session: &QuizSession, bank: &QuestionBank) -> QuestionResponse {
    match session.current_question(bank) {
        Ok(question) => QuestionResponse {
            success: true,
            question: Some(question),
            error: None,
        },
        Err(err) => {
            match err {
                SessionError::AlreadyCompleted => {
                    log::debug!("pregunta pedida con el quiz completado, el cliente redirige")
                }
                _ => log::warn!("pregunta pedida sin sesión activa: {err}"),
            }
            QuestionResponse {
                success: false,
                question: None,
                error: Some(ERR_NO_ACTIVE_SESSION),
            }
        }
    }
}

/// POST /api/quiz/answer — coerción de campos y envío al motor.
pub fn handle_answer(session: &mut QuizSession, bank: &QuestionBank, body: &str) -> AnswerResponse {
    let params = parse_form_data(body);
    let selected = coerce_selected(params.get("selectedAnswer"));
    let time_spent = coerce_time(params.get("timeSpent"));

    match session.submit_answer(bank, selected, time_spent) {
        Ok(outcome) => AnswerResponse {
            success: true,
            outcome: Some(outcome),
            error: None,
        },
        Err(err) => {
            log::warn!("respuesta rechazada: {err}");
            AnswerResponse {
                success: false,
                outcome: None,
                error: Some(ERR_NO_CURRENT_QUESTION),
            }
        }
    }
}

/// GET /api/quiz/results — sólo con el quiz completado.
pub fn handle_results(session: &QuizSession, bank: &QuestionBank) -> ResultsResponse {
    match session.results(bank) {
        Ok(results) => ResultsResponse {
            success: true,
            results: Some(results),
            error: None,
        },
        Err(err) => {
            log::warn!("resultados pedidos antes de tiempo: {err}");
            ResultsResponse {
                success: false,
                results: None,
                error: Some(ERR_QUIZ_NOT_FINISHED),
            }
        }
    }
}

/// POST /api/quiz/reset — siempre tiene éxito.
pub fn handle_reset(session: &mut QuizSession) -> ResetResponse {
    session.reset();
    ResetResponse {
        success: true,
        message: MSG_QUIZ_RESET,
    }
}

/// Descompone un cuerpo `clave=valor&clave=valor` percent-decodificando ambos
/// lados. Pares sin '=' se ignoran, como hace el servidor de referencia.
pub fn parse_form_data(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            params.insert(percent_decode(key), percent_decode(value));
        }
    }
    params
}

fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi * 16 + lo);
                        i += 3;
                    }
                    // '%' suelto: se deja tal cual
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

/// `selectedAnswer` ausente o basura equivale a no haber respondido.
fn coerce_selected(raw: Option<&String>) -> i64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(NO_ANSWER)
}

fn coerce_time(raw: Option<&String>) -> u64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}
