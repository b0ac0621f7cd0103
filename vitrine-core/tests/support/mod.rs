//! Loopback portal stub for the integration tests.
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use vitrine_common::Config;

pub const EMAIL: &str = "panel@example.com";
pub const PASSWORD: &str = "hunter2";

/// What `GET /display/image` should answer an authorized request with.
pub enum ImageBody {
    Png { width: u32, height: u32 },
    Status(u16),
    Garbage,
}

pub struct Portal {
    pub logins: AtomicUsize,
    pub image_requests: AtomicUsize,
    pub deny_logins: AtomicBool,
    pub omit_token: AtomicBool,
    pub reject_all_tokens: AtomicBool,
    current_token: Mutex<String>,
    image_body: Mutex<ImageBody>,
}

impl Portal {
    fn new() -> Self {
        Self {
            logins: AtomicUsize::new(0),
            image_requests: AtomicUsize::new(0),
            deny_logins: AtomicBool::new(false),
            omit_token: AtomicBool::new(false),
            reject_all_tokens: AtomicBool::new(false),
            current_token: Mutex::new(String::new()),
            image_body: Mutex::new(ImageBody::Png {
                width: 800,
                height: 480,
            }),
        }
    }

    /// Rotates the token server-side, as if the client's token expired.
    pub fn expire_token(&self) {
        self.current_token.lock().unwrap().clear();
    }

    pub fn set_image(&self, body: ImageBody) {
        *self.image_body.lock().unwrap() = body;
    }
}

async fn login(State(portal): State<Arc<Portal>>, Json(body): Json<serde_json::Value>) -> Response {
    let n = portal.logins.fetch_add(1, Ordering::SeqCst) + 1;

    if portal.deny_logins.load(Ordering::SeqCst)
        || body["email"] != EMAIL
        || body["password"] != PASSWORD
    {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if portal.omit_token.load(Ordering::SeqCst) {
        return Json(serde_json::json!({})).into_response();
    }

    let token = format!("token-{n}");
    *portal.current_token.lock().unwrap() = token.clone();
    Json(serde_json::json!({ "accessToken": token })).into_response()
}

async fn image(State(portal): State<Arc<Portal>>, headers: HeaderMap) -> Response {
    portal.image_requests.fetch_add(1, Ordering::SeqCst);

    let authorized = {
        let token = portal.current_token.lock().unwrap();
        !token.is_empty()
            && headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                == Some(format!("Bearer {token}").as_str())
    };
    if portal.reject_all_tokens.load(Ordering::SeqCst) || !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match *portal.image_body.lock().unwrap() {
        ImageBody::Png { width, height } => (
            [(header::CONTENT_TYPE, "image/png")],
            png_bytes(width, height),
        )
            .into_response(),
        ImageBody::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
        ImageBody::Garbage => (
            [(header::CONTENT_TYPE, "image/png")],
            b"not an image".to_vec(),
        )
            .into_response(),
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let gradient = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buffer = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(gradient)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

/// Starts the stub on an ephemeral loopback port and returns it with a
/// matching client configuration (25 ms refresh interval).
pub async fn spawn_portal() -> (Arc<Portal>, Config) {
    let portal = Arc::new(Portal::new());
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/display/image", get(image))
        .with_state(Arc::clone(&portal));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = Config {
        api_base_url: format!("http://{addr}"),
        email: EMAIL.into(),
        password: PASSWORD.into(),
        refresh_interval: Duration::from_millis(25),
    };
    (portal, config)
}
