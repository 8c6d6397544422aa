//! In-process HTTP servers standing in for the image origin and for S3.
//!
//! Each server runs on its own thread with a current-thread runtime, so both
//! `#[test]` and `#[tokio::test]` functions can use them. Servers live until
//! the test process exits.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, put},
    Router,
};
use std::sync::{Arc, Mutex};

pub const CAT_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a cat";

/// Serve `app` on an ephemeral port and return its base URL (no trailing slash).
pub fn spawn(app: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.set_nonblocking(true).expect("nonblocking");
    let addr = listener.local_addr().expect("local addr");

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("listener");
            axum::serve(listener, app).await.expect("serve");
        });
    });

    format!("http://{}", addr)
}

/// Origin serving `/photos/cat.jpg` as PNG and `/missing.jpg` as 404.
pub fn origin() -> String {
    spawn(
        Router::new()
            .route(
                "/photos/cat.jpg",
                get(|| async { ([(header::CONTENT_TYPE, "image/png")], CAT_BYTES) }),
            )
            .route("/missing.jpg", get(|| async { StatusCode::NOT_FOUND })),
    )
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub content_type: Option<String>,
}

/// Path-style S3 endpoint that records PUTs and DELETEs.
#[derive(Debug, Clone, Default)]
pub struct FakeS3 {
    objects: Arc<Mutex<Vec<StoredObject>>>,
}

impl FakeS3 {
    pub fn start() -> (String, Self) {
        let s3 = FakeS3::default();
        let app = Router::new()
            .route("/:bucket/:key", put(put_object).delete(delete_object))
            .with_state(s3.clone());
        (spawn(app), s3)
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

async fn put_object(
    State(s3): State<FakeS3>,
    Path((bucket, key)): Path<(String, String)>,
    headers: HeaderMap,
    _body: Bytes,
) -> StatusCode {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    s3.objects.lock().unwrap().push(StoredObject {
        bucket,
        key,
        content_type,
    });
    StatusCode::OK
}

async fn delete_object(
    State(s3): State<FakeS3>,
    Path((bucket, key)): Path<(String, String)>,
) -> StatusCode {
    s3.objects
        .lock()
        .unwrap()
        .retain(|o| !(o.bucket == bucket && o.key == key));
    StatusCode::NO_CONTENT
}
