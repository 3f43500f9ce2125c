use std::collections::HashMap;
use std::io::Read;

use astra::Request;
use chrono::Utc;

use crate::auth::magic::SignInService;
use crate::auth::sessions::{
    self, clear_session_cookie, session_cookie, SessionUser, SESSION_COOKIE,
};
use crate::db::{listings, Database};
use crate::domain::form::ListingForm;
use crate::domain::listing::ListingType;
use crate::domain::submit::{save_listing, SaveTarget};
use crate::errors::ServerError;
use crate::forms::multipart::{boundary_from_content_type, parse_multipart};
use crate::forms::parse_urlencoded;
use crate::geocode::{Geocode, GeocodeClient};
use crate::responses::flash::{self, Flash, FLASH_COOKIE};
use crate::responses::{
    html_response, html_response_with_cookies, redirect, redirect_with_cookies,
    redirect_with_flash, ResultResp,
};
use crate::storage::{BlobStore, ObjectStore};
use crate::templates::pages::{
    category_page, home_page, link_sent_page, listing_form_page, listing_page, sign_in_page,
    ListingFormVm,
};

const HOME_LISTINGS: i64 = 12;
const CATEGORY_LISTINGS: i64 = 50;

/// Everything a request handler needs. Generic over the two network
/// clients so tests can stub them.
pub struct App<G = GeocodeClient, S = ObjectStore> {
    pub db: Database,
    pub geocoder: G,
    pub store: S,
    pub sign_in: SignInService,
}

pub fn handle<G: Geocode, S: BlobStore + Sync>(req: Request, app: &App<G, S>) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", [""]) => home(req, app),

        ("GET", ["sign-in"]) => {
            let ctx = PageContext::from_request(&req, &app.db)?;
            ctx.page(sign_in_page(ctx.flash.as_ref()))
        }
        ("POST", ["sign-in"]) => request_sign_in_link(req, app),
        ("GET", ["auth", "magic"]) => redeem_sign_in_link(req, app),
        ("POST", ["sign-out"]) => sign_out(req, app),

        ("GET", ["category", listing_type]) => {
            let listing_type = ListingType::parse(listing_type).map_err(|_| ServerError::NotFound)?;
            category(req, app, listing_type)
        }
        ("GET", ["category", _, id]) => {
            let id = parse_id(id)?;
            listing_detail(req, app, id)
        }

        ("GET", ["listings", "new"]) => {
            let ctx = PageContext::from_request(&req, &app.db)?;
            if ctx.user.is_none() {
                return redirect("/sign-in");
            }
            ctx.page(listing_form_page(&ListingFormVm::create(), ctx.flash.as_ref()))
        }
        ("POST", ["listings", "new"]) => submit_listing(req, app, None),

        ("GET", ["listings", id, "edit"]) => {
            let id = parse_id(id)?;
            edit_listing_form(req, app, id)
        }
        ("POST", ["listings", id, "edit"]) => {
            let id = parse_id(id)?;
            submit_listing(req, app, Some(id))
        }
        ("POST", ["listings", id, "delete"]) => {
            let id = parse_id(id)?;
            delete_listing(req, app, id)
        }

        ("GET", ["static", rest @ ..]) => serve_static(rest),

        _ => Err(ServerError::NotFound),
    }
}

// ---------------------------------------------------------------------
// Page handlers

fn home<G: Geocode, S: BlobStore + Sync>(req: Request, app: &App<G, S>) -> ResultResp {
    let ctx = PageContext::from_request(&req, &app.db)?;
    let recent = listings::get_recent_listings(&app.db, HOME_LISTINGS)?;
    ctx.page(home_page(&recent, ctx.signed_in(), ctx.flash.as_ref()))
}

fn category<G: Geocode, S: BlobStore + Sync>(
    req: Request,
    app: &App<G, S>,
    listing_type: ListingType,
) -> ResultResp {
    let ctx = PageContext::from_request(&req, &app.db)?;
    let results = listings::get_listings_by_type(&app.db, listing_type, CATEGORY_LISTINGS)?;
    ctx.page(category_page(
        listing_type,
        &results,
        ctx.signed_in(),
        ctx.flash.as_ref(),
    ))
}

fn listing_detail<G: Geocode, S: BlobStore + Sync>(
    req: Request,
    app: &App<G, S>,
    id: i64,
) -> ResultResp {
    let ctx = PageContext::from_request(&req, &app.db)?;
    let Some(listing) = listings::get_listing(&app.db, id)? else {
        return Err(ServerError::NotFound);
    };

    let is_owner = ctx.user.as_ref().is_some_and(|u| u.id == listing.user_id);
    ctx.page(listing_page(
        &listing,
        is_owner,
        ctx.signed_in(),
        ctx.flash.as_ref(),
    ))
}

/// Listing loader for the edit form: missing and not-owned listings both
/// bounce back to the home view with an error.
fn edit_listing_form<G: Geocode, S: BlobStore + Sync>(
    req: Request,
    app: &App<G, S>,
    id: i64,
) -> ResultResp {
    let ctx = PageContext::from_request(&req, &app.db)?;
    let Some(user) = &ctx.user else {
        return redirect("/sign-in");
    };

    let Some(listing) = listings::get_listing(&app.db, id)? else {
        return redirect_with_flash("/", Flash::error("Listing does not exist"));
    };
    if listing.user_id != user.id {
        return redirect_with_flash(
            "/",
            Flash::error("You are not authorized to edit that listing"),
        );
    }

    ctx.page(listing_form_page(&ListingFormVm::edit(&listing), ctx.flash.as_ref()))
}

// ---------------------------------------------------------------------
// Submission handlers

/// Create (`listing_id` None) or edit submission: parse the multipart
/// form and run the pipeline. Recoverable failures bounce back to the
/// form with a flash; the pipeline re-checks existence and ownership
/// before touching the network.
fn submit_listing<G: Geocode, S: BlobStore + Sync>(
    req: Request,
    app: &App<G, S>,
    listing_id: Option<i64>,
) -> ResultResp {
    let Some(user) = current_user(&req, &app.db)? else {
        return redirect("/sign-in");
    };

    let back = match listing_id {
        Some(id) => format!("/listings/{id}/edit"),
        None => "/listings/new".to_string(),
    };

    let form = match parse_listing_form(req) {
        Ok(form) => form,
        Err(err) => return recover(err, &back),
    };

    let target = match listing_id {
        Some(id) => SaveTarget::Update { listing_id: id },
        None => SaveTarget::Create,
    };

    match save_listing(
        &app.db,
        &app.geocoder,
        &app.store,
        user.id,
        target,
        &form,
        now_unix(),
    ) {
        Ok(saved) => {
            let message = match target {
                SaveTarget::Create => "Listing created",
                SaveTarget::Update { .. } => "Listing saved",
            };
            redirect_with_flash(&saved.detail_path(), Flash::success(message))
        }
        Err(err) => recover(err, &back),
    }
}

fn delete_listing<G: Geocode, S: BlobStore + Sync>(
    req: Request,
    app: &App<G, S>,
    id: i64,
) -> ResultResp {
    let Some(user) = current_user(&req, &app.db)? else {
        return redirect("/sign-in");
    };

    if listings::delete_listing(&app.db, id, user.id)? {
        redirect_with_flash("/", Flash::success("Listing deleted"))
    } else {
        redirect_with_flash("/", Flash::error("You cannot delete that listing"))
    }
}

/// Map a failed submission to the redirect the user should see. Anything
/// unrecoverable bubbles up to the error page.
fn recover(err: ServerError, back: &str) -> ResultResp {
    match err {
        ServerError::NotFound => redirect_with_flash("/", Flash::error("Listing does not exist")),
        ServerError::Unauthorized(msg) => redirect_with_flash("/", Flash::error(msg)),
        ServerError::Validation(msg) => redirect_with_flash(back, Flash::error(msg)),
        ServerError::Geocode(msg) => {
            eprintln!("⚠️ Geocoding failed: {msg}");
            redirect_with_flash(back, Flash::error("Address lookup failed, please try again"))
        }
        ServerError::Upload(msg) => {
            eprintln!("⚠️ Upload failed: {msg}");
            redirect_with_flash(back, Flash::error("Image upload failed"))
        }
        ServerError::BadRequest(msg) => redirect_with_flash(back, Flash::error(msg)),
        other => Err(other),
    }
}

fn parse_listing_form(req: Request) -> Result<ListingForm, ServerError> {
    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| ServerError::BadRequest("missing content type".into()))?;

    let boundary = boundary_from_content_type(&content_type)?;
    let body = read_body(req)?;
    let multipart = parse_multipart(&body, &boundary)?;
    ListingForm::from_multipart(multipart)
}

// ---------------------------------------------------------------------
// Auth handlers

fn request_sign_in_link<G: Geocode, S: BlobStore + Sync>(
    req: Request,
    app: &App<G, S>,
) -> ResultResp {
    let body = read_body(req)?;
    let params = parse_urlencoded(&body);
    let Some(email) = params.get("email") else {
        return redirect_with_flash("/sign-in", Flash::error("Please enter a valid email"));
    };

    let now = now_unix();
    let issued = app
        .db
        .with_conn(|conn| app.sign_in.request_link(conn, email, now));

    match issued {
        Ok(issued) => {
            // No mailer in this deployment: the link goes to the log.
            println!("📧 Sign-in link for {}: {}", issued.email, issued.link);
            html_response(link_sent_page(&issued.email))
        }
        Err(ServerError::Validation(msg)) => {
            redirect_with_flash("/sign-in", Flash::error(msg))
        }
        Err(other) => Err(other),
    }
}

fn redeem_sign_in_link<G: Geocode, S: BlobStore + Sync>(
    req: Request,
    app: &App<G, S>,
) -> ResultResp {
    let params = parse_urlencoded(req.uri().query().unwrap_or("").as_bytes());
    let token = params.get("token").map(String::as_str).unwrap_or("");

    let now = now_unix();
    let redeemed = app
        .db
        .with_conn(|conn| app.sign_in.redeem(conn, token, now));

    match redeemed {
        Ok(redeemed) => {
            let raw_session = app
                .db
                .with_conn(|conn| sessions::create_session(conn, redeemed.user_id, now))?;
            println!("🔑 {} signed in", redeemed.email);
            redirect_with_cookies(
                "/",
                &[
                    session_cookie(&raw_session),
                    flash::set_cookie(&Flash::success("Signed in")),
                ],
            )
        }
        Err(ServerError::Unauthorized(_)) | Err(ServerError::BadRequest(_)) => {
            redirect_with_flash("/sign-in", Flash::error("That sign-in link is invalid or expired"))
        }
        Err(other) => Err(other),
    }
}

fn sign_out<G: Geocode, S: BlobStore + Sync>(req: Request, app: &App<G, S>) -> ResultResp {
    if let Some(raw) = cookies(&req).get(SESSION_COOKIE) {
        app.db
            .with_conn(|conn| sessions::revoke_session(conn, raw, now_unix()))?;
    }
    redirect_with_cookies("/", &[clear_session_cookie()])
}

// ---------------------------------------------------------------------
// Request helpers

/// Per-request view state: who is signed in, and any pending flash.
struct PageContext {
    user: Option<SessionUser>,
    flash: Option<Flash>,
}

impl PageContext {
    fn from_request(req: &Request, db: &Database) -> Result<Self, ServerError> {
        Ok(Self {
            user: current_user(req, db)?,
            flash: read_flash(req),
        })
    }

    fn signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Render a page, clearing the flash cookie if one was shown.
    fn page(&self, markup: maud::Markup) -> ResultResp {
        if self.flash.is_some() {
            html_response_with_cookies(markup, &[flash::clear_cookie()])
        } else {
            html_response(markup)
        }
    }
}

fn current_user(req: &Request, db: &Database) -> Result<Option<SessionUser>, ServerError> {
    let Some(raw) = cookies(req).get(SESSION_COOKIE).cloned() else {
        return Ok(None);
    };
    db.with_conn(|conn| sessions::load_user_from_session(conn, &raw, now_unix()))
}

fn read_flash(req: &Request) -> Option<Flash> {
    cookies(req)
        .get(FLASH_COOKIE)
        .and_then(|v| flash::decode(v))
}

fn cookies(req: &Request) -> HashMap<String, String> {
    let mut map = HashMap::new();

    let Some(header) = req.headers().get("cookie").and_then(|v| v.to_str().ok()) else {
        return map;
    };
    for pair in header.split(';') {
        if let Some((k, v)) = pair.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }

    map
}

fn read_body(req: Request) -> Result<Vec<u8>, ServerError> {
    let mut body = req.into_body();
    let mut buf = Vec::new();
    body.reader()
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read request body: {e}")))?;
    Ok(buf)
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse().map_err(|_| ServerError::NotFound)
}

fn now_unix() -> i64 {
    Utc::now().timestamp()
}

// ---------------------------------------------------------------------
// Static assets

fn serve_static(segments: &[&str]) -> ResultResp {
    use astra::{Body, ResponseBuilder};

    // No traversal: plain names only.
    if segments.is_empty()
        || segments
            .iter()
            .any(|s| s.is_empty() || s.contains("..") || s.contains('\\'))
    {
        return Err(ServerError::NotFound);
    }

    let path = format!("static/{}", segments.join("/"));
    let bytes = std::fs::read(&path).map_err(|_| ServerError::NotFound)?;

    let content_type = match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("css") => mime::TEXT_CSS_UTF_8.as_ref(),
        Some("svg") => mime::IMAGE_SVG.as_ref(),
        Some("png") => mime::IMAGE_PNG.as_ref(),
        Some("ico") => "image/x-icon",
        _ => mime::APPLICATION_OCTET_STREAM.as_ref(),
    };

    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type)
        .header("Cache-Control", "public, max-age=3600")
        .body(Body::from(bytes))
        .unwrap();
    Ok(resp)
}
