use astra::{Body, Request, Response};
use http::{HeaderValue, Method};
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::auth::magic::{SignInConfig, SignInService};
use crate::auth::sessions;
use crate::db::connection::Database;
use crate::errors::ServerError;
use crate::geocode::{Geocode, Geolocation};
use crate::router::App;
use crate::storage::BlobStore;

pub const CANONICAL_ADDRESS: &str = "12 Harbour St, Wellington 6011, New Zealand";

/// Fresh in-memory DB with the production schema. Each test names its own
/// so parallel tests don't share state.
pub fn init_test_db(name: &str) -> Database {
    let db = Database::new(format!("file:{name}?mode=memory&cache=shared"));
    db.with_conn(|conn| {
        conn.execute_batch(include_str!("../../sql/schema.sql"))
            .map_err(|e| ServerError::DbError(format!("schema failed: {e}")))
    })
    .expect("Database initialization failed");
    db
}

/// Stub geocoder returning a fixed canonical address.
pub struct StubGeocoder {
    pub result: Result<Geolocation, String>,
}

impl StubGeocoder {
    pub fn ok() -> Self {
        Self {
            result: Ok(Geolocation {
                lat: -41.29,
                lng: 174.78,
                canonical_address: CANONICAL_ADDRESS.to_string(),
            }),
        }
    }

    pub fn zero_results() -> Self {
        Self {
            result: Err("Please enter a correct address".to_string()),
        }
    }
}

impl Geocode for StubGeocoder {
    fn geocode(&self, _address: &str) -> Result<Geolocation, ServerError> {
        self.result
            .clone()
            .map_err(ServerError::Validation)
    }
}

/// Stub object store recording every uploaded key.
pub struct StubStore {
    pub keys: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl StubStore {
    pub fn ok() -> Self {
        Self {
            keys: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BlobStore for StubStore {
    fn put_object(
        &self,
        key: &str,
        _data: &[u8],
        _content_type: &str,
    ) -> Result<String, ServerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.keys.lock().unwrap().push(key.to_string());
        Ok(format!("https://store.test/images/{key}"))
    }
}

pub fn test_app(db_name: &str) -> App<StubGeocoder, StubStore> {
    App {
        db: init_test_db(db_name),
        geocoder: StubGeocoder::ok(),
        store: StubStore::ok(),
        sign_in: SignInService::new(SignInConfig::default()),
    }
}

/// The router resolves sessions against the real clock, so fixtures are
/// created "now".
pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Create a user and a live session, returning (user_id, cookie header).
pub fn signed_in_user(db: &Database, email: &str) -> (i64, String) {
    let now = now_unix();
    let (user_id, token) = db
        .with_conn(|conn| {
            let user_id = crate::db::users::get_or_create_user(conn, email, now)?;
            let token = sessions::create_session(conn, user_id, now)?;
            Ok((user_id, token))
        })
        .unwrap();
    (user_id, format!("{}={}", sessions::SESSION_COOKIE, token))
}

pub fn get(uri: &str) -> Request {
    let mut req = Request::new(Body::empty());
    *req.method_mut() = Method::GET;
    *req.uri_mut() = uri.parse().unwrap();
    req
}

pub fn post(uri: &str, body: Vec<u8>) -> Request {
    let mut req = Request::new(Body::from(body));
    *req.method_mut() = Method::POST;
    *req.uri_mut() = uri.parse().unwrap();
    req
}

pub fn with_cookie(mut req: Request, cookie: &str) -> Request {
    req.headers_mut()
        .insert("cookie", HeaderValue::from_str(cookie).unwrap());
    req
}

pub fn with_content_type(mut req: Request, content_type: &str) -> Request {
    req.headers_mut()
        .insert("content-type", HeaderValue::from_str(content_type).unwrap());
    req
}

pub fn location_header(resp: &Response) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

pub fn set_cookies(resp: &Response) -> Vec<String> {
    resp.headers()
        .get_all("Set-Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

pub fn body_string(resp: Response) -> String {
    let mut body = resp.into_body();
    let mut buf = Vec::new();
    body.reader().read_to_end(&mut buf).unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

// ---------------------------------------------------------------------
// Multipart helpers

pub const TEST_BOUNDARY: &str = "----openhouse-test-boundary";

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={TEST_BOUNDARY}")
}

pub fn multipart_body(fields: &[(&str, &str)], images: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = Vec::new();

    for (name, value) in fields {
        out.extend_from_slice(format!("--{TEST_BOUNDARY}\r\n").as_bytes());
        out.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }

    for (filename, data) in images {
        out.extend_from_slice(format!("--{TEST_BOUNDARY}\r\n").as_bytes());
        out.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"images\"; filename=\"{filename}\"\r\n\
                 Content-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        out.extend_from_slice(data);
        out.extend_from_slice(b"\r\n");
    }

    out.extend_from_slice(format!("--{TEST_BOUNDARY}--\r\n").as_bytes());
    out
}

/// A complete, valid rent-listing form.
pub fn listing_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("type", "rent"),
        ("name", "Sunny two-bed flat"),
        ("bedrooms", "2"),
        ("bathrooms", "1"),
        ("parking", "true"),
        ("furnished", "false"),
        ("address", "12 harbour st wellington"),
        ("offer", "false"),
        ("regular_price", "1800"),
    ]
}
