use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, error, info, warn};
use serde::Serialize;

use trivia_quiz::QuizSession;
use trivia_quiz::data::QuestionBank;
use trivia_quiz::protocol;

const MAX_BODY_BYTES: usize = 1_000_000;

struct HttpRequest {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl HttpRequest {
    fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Ruta sin query string: el cliente añade `?t=...` para evitar cachés.
    fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }
}

fn main() {
    pretty_env_logger::init();

    let bank = match QuestionBank::embedded() {
        Ok(bank) => bank,
        Err(err) => {
            error!("banco de preguntas inválido: {err}");
            std::process::exit(1);
        }
    };

    let bind = std::env::var("QUIZ_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = TcpListener::bind(&bind).expect("no se pudo abrir el puerto del servidor");

    info!(
        "trivia_quiz escuchando en http://{bind} con {} preguntas",
        bank.len()
    );

    // Sesión global única, sin aislamiento por cliente. El bucle
    // secuencial de accept serializa todas las mutaciones: cada petición se
    // ejecuta de principio a fin antes de atender la siguiente.
    let mut session = QuizSession::new();

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(err) = handle_connection(stream, &mut session, &bank) {
                    warn!("error en conexión: {err}");
                }
            }
            Err(err) => warn!("error aceptando conexión: {err}"),
        }
    }
}

fn handle_connection(
    mut stream: TcpStream,
    session: &mut QuizSession,
    bank: &QuestionBank,
) -> Result<(), String> {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .map_err(|e| e.to_string())?;

    let request = match read_http_request(&mut stream) {
        Ok(req) => req,
        Err(err) => {
            write_text_response(&mut stream, 400, &format!("bad request: {err}"));
            return Ok(());
        }
    };

    debug!("{} {}", request.method, request.path);

    if request.method == "OPTIONS" {
        write_empty_response(&mut stream, 204);
        return Ok(());
    }

    let route = request.route().to_string();

    if request.method == "GET" && route == "/health" {
        write_text_response(&mut stream, 200, "ok");
        return Ok(());
    }

    if route.starts_with("/api/") {
        handle_api(&mut stream, &request, &route, session, bank);
        return Ok(());
    }

    if request.method == "GET" {
        serve_static(&mut stream, &route);
        return Ok(());
    }

    write_text_response(&mut stream, 404, "not found");
    Ok(())
}

/// Enruta los cinco comandos del quiz. Los fallos del motor salen como JSON
/// `{success:false}` con 200 para que el cliente llegue a inspeccionar el
/// cuerpo (lanza excepción ante cualquier estado no-2xx antes de leerlo).
fn handle_api(
    stream: &mut TcpStream,
    request: &HttpRequest,
    route: &str,
    session: &mut QuizSession,
    bank: &QuestionBank,
) {
    // El cliente manda los POST como application/x-www-form-urlencoded; si
    // llega otra cosa se intenta parsear igual, pero queda registrado.
    if request.method == "POST" && !request.body.is_empty() {
        let is_form = request
            .header("content-type")
            .map(|ct| {
                ct.to_ascii_lowercase()
                    .contains("application/x-www-form-urlencoded")
            })
            .unwrap_or(false);
        if !is_form {
            debug!("content-type inesperado en {route}");
        }
    }

    let body = String::from_utf8_lossy(&request.body).into_owned();

    match (request.method.as_str(), route) {
        ("POST", "/api/quiz/start") => {
            write_json_response(stream, 200, &protocol::handle_start(session, bank, &body));
        }
        ("GET", "/api/quiz/question") => {
            write_json_response(stream, 200, &protocol::handle_question(session, bank));
        }
        ("POST", "/api/quiz/answer") => {
            write_json_response(stream, 200, &protocol::handle_answer(session, bank, &body));
        }
        ("GET", "/api/quiz/results") => {
            write_json_response(stream, 200, &protocol::handle_results(session, bank));
        }
        ("POST", "/api/quiz/reset") => {
            write_json_response(stream, 200, &protocol::handle_reset(session));
        }
        (
            _,
            "/api/quiz/start" | "/api/quiz/question" | "/api/quiz/answer" | "/api/quiz/results"
            | "/api/quiz/reset",
        ) => {
            warn!("método {} no permitido en {route}", request.method);
            write_json_response(
                stream,
                405,
                &serde_json::json!({ "error": "Method not allowed" }),
            );
        }
        _ => {
            write_json_response(
                stream,
                404,
                &serde_json::json!({ "success": false, "message": "API endpoint not found" }),
            );
        }
    }
}

fn read_http_request(stream: &mut TcpStream) -> Result<HttpRequest, String> {
    let mut buffer = Vec::with_capacity(4096);
    let mut temp = [0_u8; 1024];

    loop {
        let n = stream
            .read(&mut temp)
            .map_err(|e| format!("no se pudo leer request: {e}"))?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&temp[..n]);

        if find_header_end(&buffer).is_some() {
            break;
        }

        if buffer.len() > MAX_BODY_BYTES {
            return Err("headers demasiado grandes".into());
        }
    }

    let header_end = find_header_end(&buffer).ok_or_else(|| "headers incompletos".to_string())?;
    let header_bytes = &buffer[..header_end];
    let header_text =
        std::str::from_utf8(header_bytes).map_err(|_| "headers no son UTF-8 válido".to_string())?;

    let mut lines = header_text.split("\r\n");
    let request_line = lines
        .next()
        .ok_or_else(|| "faltó request line".to_string())?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| "faltó método HTTP".to_string())?
        .to_string();
    let path = parts
        .next()
        .ok_or_else(|| "faltó path HTTP".to_string())?
        .to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let mut kv = line.splitn(2, ':');
        let key = kv
            .next()
            .ok_or_else(|| "header inválido".to_string())?
            .trim()
            .to_ascii_lowercase();
        let value = kv
            .next()
            .ok_or_else(|| "header inválido (sin ':')".to_string())?
            .trim()
            .to_string();
        headers.insert(key, value);
    }

    let mut body = buffer[(header_end + 4)..].to_vec();
    let expected_len = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    if expected_len > MAX_BODY_BYTES {
        return Err("body demasiado grande".into());
    }

    while body.len() < expected_len {
        let n = stream
            .read(&mut temp)
            .map_err(|e| format!("no se pudo leer body: {e}"))?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&temp[..n]);
    }

    if body.len() < expected_len {
        return Err("body incompleto".into());
    }
    body.truncate(expected_len);

    Ok(HttpRequest {
        method,
        path,
        headers,
        body,
    })
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Sirve el frontend estático desde QUIZ_FRONTEND_DIR (por defecto `frontend/`).
fn serve_static(stream: &mut TcpStream, route: &str) {
    let frontend_dir =
        std::env::var("QUIZ_FRONTEND_DIR").unwrap_or_else(|_| "frontend".to_string());

    let relative = if route == "/" {
        "index.html"
    } else {
        route.trim_start_matches('/')
    };

    // Sin escapadas fuera del directorio del frontend
    if relative.split('/').any(|segment| segment == "..") {
        write_text_response(stream, 404, "not found");
        return;
    }

    let file_path: PathBuf = Path::new(&frontend_dir).join(relative);

    match std::fs::read(&file_path) {
        Ok(content) => {
            debug!("sirviendo {}", file_path.display());
            write_bytes_response(stream, 200, content_type_for(&file_path), &content);
        }
        Err(_) => {
            debug!("fichero no encontrado: {}", file_path.display());
            let body = format!(
                "<html><body><h1>404 - File Not Found</h1><p>The requested file was not found: {route}</p></body></html>"
            );
            write_bytes_response(stream, 404, "text/html", body.as_bytes());
        }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn write_empty_response(stream: &mut TcpStream, status: u16) {
    write_bytes_response(stream, status, "text/plain", b"")
}

fn write_text_response(stream: &mut TcpStream, status: u16, body: &str) {
    write_bytes_response(stream, status, "text/plain; charset=utf-8", body.as_bytes())
}

fn write_json_response<T: Serialize>(stream: &mut TcpStream, status: u16, body: &T) {
    match serde_json::to_string(body) {
        Ok(json) => write_bytes_response(stream, status, "application/json", json.as_bytes()),
        Err(err) => write_bytes_response(
            stream,
            500,
            "text/plain; charset=utf-8",
            format!("error serializando respuesta JSON: {err}").as_bytes(),
        ),
    }
}

fn write_bytes_response(stream: &mut TcpStream, status: u16, content_type: &str, body: &[u8]) {
    let status_text = match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "OK",
    };

    let header = format!(
        "HTTP/1.1 {status} {status_text}\r\nContent-Type: {content_type}\r\nAccess-Control-Allow-Origin: *\r\nAccess-Control-Allow-Methods: POST, GET, OPTIONS\r\nAccess-Control-Allow-Headers: Content-Type\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );

    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}
