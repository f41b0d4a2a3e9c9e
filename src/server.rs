//! HTTP front end.
//!
//! `POST /generate-board` takes `{"players": [{"num", "pos", "color"}, ...]}`
//! and answers with the PNG, or with a JSON envelope carrying the image as
//! base64 when the client sends `Accept: application/json`. `GET /` is a
//! liveness probe. A fixed pool of worker threads pulls requests from one
//! shared listener and renders with one shared [`BoardRenderer`].

use crate::{BoardRenderer, Error, RenderedImage, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Method, Request, Response, Server};

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: u64 = 1 << 20;

const LIVENESS_MESSAGE: &str = "Board renderer is running!";

/// Transport-independent response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub etag: Option<String>,
}

#[derive(Serialize)]
struct ImageEnvelope<'a> {
    message: &'a str,
    width: u32,
    height: u32,
    sha256: String,
    image_base64: String,
}

impl Reply {
    fn text(status: u16, text: &str) -> Self {
        Reply {
            status,
            content_type: "text/plain; charset=utf-8",
            body: text.as_bytes().to_vec(),
            etag: None,
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Reply {
            status,
            content_type: "application/json",
            body: serde_json::json!({ "error": message }).to_string().into_bytes(),
            etag: None,
        }
    }

    fn png(image: RenderedImage) -> Self {
        let etag = format!("\"{}\"", image.digest());
        Reply {
            status: 200,
            content_type: "image/png",
            body: image.into_bytes(),
            etag: Some(etag),
        }
    }

    fn envelope(image: &RenderedImage) -> Self {
        let envelope = ImageEnvelope {
            message: "Image generated.",
            width: image.width,
            height: image.height,
            sha256: image.digest(),
            image_base64: STANDARD.encode(image.as_bytes()),
        };
        match serde_json::to_vec(&envelope) {
            Ok(body) => Reply {
                status: 200,
                content_type: "application/json",
                body,
                etag: Some(format!("\"{}\"", envelope.sha256)),
            },
            Err(e) => Reply::error(500, &e.to_string()),
        }
    }

    fn into_response(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body).with_status_code(self.status);
        if let Ok(h) = Header::from_bytes(&b"Content-Type"[..], self.content_type.as_bytes()) {
            response = response.with_header(h);
        }
        if let Some(tag) = self.etag {
            if let Ok(h) = Header::from_bytes(&b"ETag"[..], tag.as_bytes()) {
                response = response.with_header(h);
            }
        }
        response
    }
}

/// Dispatch one request. `url` may carry a query string, which is ignored.
pub fn route(renderer: &BoardRenderer, method: &Method, url: &str, accept: Option<&str>, body: &[u8]) -> Reply {
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        (Method::Get, "/") => Reply::text(200, LIVENESS_MESSAGE),
        (Method::Post, "/generate-board") => generate_board(renderer, accept, body),
        (_, "/generate-board") => Reply::error(405, "Method Not Allowed"),
        _ => Reply::error(404, "Not Found"),
    }
}

fn generate_board(renderer: &BoardRenderer, accept: Option<&str>, body: &[u8]) -> Reply {
    match renderer.render_json(body) {
        Ok(image) => {
            debug!("Generated board ({} bytes)", image.png_data.len());
            if accept.is_some_and(|a| a.contains("application/json")) {
                Reply::envelope(&image)
            } else {
                Reply::png(image)
            }
        }
        Err(e) => {
            let status = match e {
                Error::RequestError(_) => 400,
                _ => 500,
            };
            error!("Error generating board: {}", e);
            Reply::error(status, &e.to_string())
        }
    }
}

// Reads at most MAX_BODY_BYTES; anything longer is rejected whole.
fn read_body(reader: &mut dyn Read) -> std::result::Result<Vec<u8>, Reply> {
    let mut body = Vec::new();
    match Read::take(reader, MAX_BODY_BYTES + 1).read_to_end(&mut body) {
        Ok(_) if body.len() as u64 > MAX_BODY_BYTES => Err(Reply::error(413, "Payload Too Large")),
        Ok(_) => Ok(body),
        Err(e) => Err(Reply::error(400, &format!("failed to read request body: {}", e))),
    }
}

fn handle(renderer: &BoardRenderer, mut request: Request) {
    let method = request.method().clone();
    let url = request.url().to_string();
    let accept = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Accept"))
        .map(|h| h.value.as_str().to_string());

    let reply = match read_body(request.as_reader()) {
        Ok(body) => route(renderer, &method, &url, accept.as_deref(), &body),
        Err(reply) => reply,
    };

    info!("{} {} -> {}", method, url, reply.status);
    if let Err(e) = request.respond(reply.into_response()) {
        warn!("Failed to send response for {} {}: {}", method, url, e);
    }
}

/// A bound listener plus the renderer its workers share.
pub struct BoardServer {
    server: Arc<Server>,
    renderer: Arc<BoardRenderer>,
}

impl BoardServer {
    /// Bind `addr` (e.g. `"0.0.0.0:5000"`; port 0 picks a free port).
    pub fn bind(addr: &str, renderer: BoardRenderer) -> Result<Self> {
        let server = Server::http(addr)
            .map_err(|e| Error::ServerError(format!("failed to bind {}: {}", addr, e)))?;
        Ok(Self {
            server: Arc::new(server),
            renderer: Arc::new(renderer),
        })
    }

    /// Address actually bound, e.g. `127.0.0.1:41234`.
    pub fn local_addr(&self) -> String {
        self.server.server_addr().to_string()
    }

    /// Serve on `workers` threads until the listener stops yielding requests.
    pub fn run(self, workers: usize) -> Result<()> {
        let workers = workers.max(1);
        info!("Listening on http://{} with {} workers", self.local_addr(), workers);

        let handles: Vec<_> = (0..workers)
            .map(|i| {
                let server = Arc::clone(&self.server);
                let renderer = Arc::clone(&self.renderer);
                thread::Builder::new()
                    .name(format!("board-worker-{}", i))
                    .spawn(move || {
                        for request in server.incoming_requests() {
                            handle(&renderer, request);
                        }
                    })
            })
            .collect::<std::io::Result<_>>()?;

        for h in handles {
            if h.join().is_err() {
                error!("Worker thread panicked");
            }
        }
        Ok(())
    }
}

/// Worker count used when none is configured.
pub fn default_workers() -> usize {
    num_cpus::get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoardConfig;

    fn renderer() -> BoardRenderer {
        BoardRenderer::with_builtin_font(BoardConfig::with_size(100)).unwrap()
    }

    #[test]
    fn liveness() {
        let r = route(&renderer(), &Method::Get, "/", None, b"");
        assert_eq!(r.status, 200);
        assert_eq!(r.body, LIVENESS_MESSAGE.as_bytes());
    }

    #[test]
    fn png_reply_carries_etag() {
        let r = route(
            &renderer(),
            &Method::Post,
            "/generate-board?v=1",
            None,
            br##"{"players": [{"num": 1, "pos": 15, "color": "#FF0000"}]}"##,
        );
        assert_eq!(r.status, 200);
        assert_eq!(r.content_type, "image/png");
        assert_eq!(&r.body[0..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(r.etag.as_ref().map(|t| t.len()), Some(66));
    }

    #[test]
    fn json_envelope_on_request() {
        let r = route(
            &renderer(),
            &Method::Post,
            "/generate-board",
            Some("application/json"),
            br#"{"players": []}"#,
        );
        assert_eq!(r.status, 200);
        let v: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
        assert_eq!(v["width"], 100);
        let png = STANDARD.decode(v["image_base64"].as_str().unwrap()).unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn error_statuses() {
        let rd = renderer();
        let bad_json = route(&rd, &Method::Post, "/generate-board", None, b"{nope");
        assert_eq!(bad_json.status, 400);
        let bad_color = route(
            &rd,
            &Method::Post,
            "/generate-board",
            None,
            br#"{"players": [{"pos": 2, "color": "sparkly"}]}"#,
        );
        assert_eq!(bad_color.status, 500);
        let v: serde_json::Value = serde_json::from_slice(&bad_color.body).unwrap();
        assert!(v["error"].as_str().unwrap().contains("sparkly"));
        assert_eq!(route(&rd, &Method::Get, "/generate-board", None, b"").status, 405);
        assert_eq!(route(&rd, &Method::Get, "/elsewhere", None, b"").status, 404);
    }

    #[test]
    fn body_size_limit() {
        let ok = vec![b' '; MAX_BODY_BYTES as usize];
        assert_eq!(read_body(&mut std::io::Cursor::new(ok)).unwrap().len(), MAX_BODY_BYTES as usize);

        let big = vec![b' '; MAX_BODY_BYTES as usize + 1];
        let reply = read_body(&mut std::io::Cursor::new(big)).unwrap_err();
        assert_eq!(reply.status, 413);
    }
}
