#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use image::{ImageFormat, Rgb, RgbImage};
use melon_core::error::ProviderError;
use melon_core::frame::ImageBuffer;
use melon_core::provider::{AiBackend, ChatMessage};

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

pub fn solid_image(w: u32, h: u32, rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb(rgb))
}

/// Left half one colour, right half another.
pub fn split_image(w: u32, h: u32, left: [u8; 3], right: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(w, h, |x, _| if x < w / 2 { Rgb(left) } else { Rgb(right) })
}

/// Smooth colour ramp covering many hues.
pub fn ramp_image(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([
            (x * 255 / w.max(1)) as u8,
            (y * 255 / h.max(1)) as u8,
            ((x + y) * 127 / (w + h).max(1)) as u8,
        ])
    })
}

pub fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, format).expect("encode test image");
    buf.into_inner()
}

pub fn png_buffer(img: &RgbImage) -> ImageBuffer {
    ImageBuffer::Encoded(encode(img, ImageFormat::Png))
}

// ---------------------------------------------------------------------------
// Stub backends
// ---------------------------------------------------------------------------

/// Answers every call with the prompt it received.
#[derive(Default)]
pub struct EchoBackend {
    pub prompts: RefCell<Vec<String>>,
}

impl AiBackend for EchoBackend {
    fn name(&self) -> &str {
        "Echo"
    }

    fn get_response(&self, prompt: &str, _history: &[ChatMessage]) -> Result<String, ProviderError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(prompt.to_string())
    }

    fn analyze_image(&self, _image: &ImageBuffer, prompt: Option<&str>) -> Result<String, ProviderError> {
        let prompt = prompt.unwrap_or_default().to_string();
        self.prompts.borrow_mut().push(prompt.clone());
        Ok(prompt)
    }
}

/// Fails every call with the given error.
pub struct FailingBackend(pub ProviderError);

impl AiBackend for FailingBackend {
    fn name(&self) -> &str {
        "Failing"
    }

    fn get_response(&self, _prompt: &str, _history: &[ChatMessage]) -> Result<String, ProviderError> {
        Err(self.0.clone())
    }

    fn analyze_image(&self, _image: &ImageBuffer, _prompt: Option<&str>) -> Result<String, ProviderError> {
        Err(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Minimal HTTP server
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct CapturedRequest {
    /// Request line and headers, lower-cased.
    pub head: String,
    pub body: String,
}

impl CapturedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

pub struct MockServer {
    pub url: String,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: Option<JoinHandle<()>>,
}

impl MockServer {
    /// Serve the canned `(status, body)` replies, one connection each, in order.
    pub fn start(replies: Vec<(u16, String)>) -> Self {
        Self::spawn(move |stream, requests| {
            for (status, body) in &replies {
                let (mut conn, _) = match stream.accept() {
                    Ok(c) => c,
                    Err(_) => return,
                };
                let req = read_request(&mut conn);
                requests.lock().unwrap().push(req);
                write_response(&mut conn, *status, body);
            }
        })
    }

    /// Accept one request and sit on it without answering.
    pub fn start_silent(hold: Duration) -> Self {
        Self::spawn(move |stream, requests| {
            if let Ok((mut conn, _)) = stream.accept() {
                let req = read_request(&mut conn);
                requests.lock().unwrap().push(req);
                thread::sleep(hold);
            }
        })
    }

    fn spawn<F>(serve: F) -> Self
    where
        F: FnOnce(TcpListener, Arc<Mutex<Vec<CapturedRequest>>>) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shared = Arc::clone(&requests);
        let handle = thread::spawn(move || serve(listener, shared));
        Self {
            url,
            requests,
            handle: Some(handle),
        }
    }

    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Wait for the server thread to finish its script.
    pub fn join(mut self) -> Vec<CapturedRequest> {
        if let Some(h) = self.handle.take() {
            h.join().expect("server thread");
        }
        self.captured()
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn read_request(conn: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = conn.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = find_header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                let body = String::from_utf8_lossy(&buf[end + 4..end + 4 + len]).to_string();
                return CapturedRequest { head, body };
            }
        }
    }
    CapturedRequest {
        head: String::from_utf8_lossy(&buf).to_lowercase(),
        body: String::new(),
    }
}

fn write_response(conn: &mut TcpStream, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = conn.write_all(response.as_bytes());
    let _ = conn.flush();
}
