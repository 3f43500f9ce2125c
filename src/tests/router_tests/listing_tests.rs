// src/tests/router_tests/listing_tests.rs
use crate::auth::magic::{SignInConfig, SignInService};
use crate::db::connection::Database;
use crate::db::listings;
use crate::domain::listing::{ListingRecord, ListingType};
use crate::router::{handle, App};
use crate::tests::utils::*;

const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0 fake jpeg";

fn seed_listing(db: &Database, user_id: i64) -> i64 {
    let rec = ListingRecord {
        listing_type: ListingType::Rent,
        name: "Sunny two-bed flat".into(),
        bedrooms: 2,
        bathrooms: 1,
        parking: true,
        furnished: false,
        location: "1 Old Address Rd, Somewhere".into(),
        offer: true,
        regular_price: 1800,
        discounted_price: Some(1700),
        img_urls: vec!["https://store.test/images/old.jpg".into()],
        latitude: 0.0,
        longitude: 0.0,
        user_id,
    };
    listings::insert_listing(db, &rec, now_unix() - 100).unwrap()
}

fn submit(uri: &str, cookie: &str, fields: &[(&str, &str)], images: &[(&str, &[u8])]) -> astra::Request {
    let req = post(uri, multipart_body(fields, images));
    let req = with_content_type(req, &multipart_content_type());
    with_cookie(req, cookie)
}

// ---------------------------------------------------------------------
// Browse pages

#[test]
fn home_page_renders_recent_listings() {
    let app = test_app("listing_home");
    let (user_id, _) = signed_in_user(&app.db, "a@b.com");
    seed_listing(&app.db, user_id);

    let resp = handle(get("/"), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Sunny two-bed flat"));
}

#[test]
fn category_page_filters_by_type() {
    let app = test_app("listing_category");
    let (user_id, _) = signed_in_user(&app.db, "a@b.com");
    seed_listing(&app.db, user_id);

    let resp = handle(get("/category/rent"), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Sunny two-bed flat"));

    let resp = handle(get("/category/sale"), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(!body_string(resp).contains("Sunny two-bed flat"));
}

#[test]
fn unknown_category_is_not_found() {
    let app = test_app("listing_category_unknown");
    assert!(handle(get("/category/lease"), &app).is_err());
}

#[test]
fn detail_page_shows_edit_controls_to_owner_only() {
    let app = test_app("listing_detail_owner");
    let (user_id, cookie) = signed_in_user(&app.db, "a@b.com");
    let id = seed_listing(&app.db, user_id);
    let uri = format!("/category/rent/{id}");

    let resp = handle(with_cookie(get(&uri), &cookie), &app).unwrap();
    assert!(body_string(resp).contains("Edit"));

    let resp = handle(get(&uri), &app).unwrap();
    assert!(!body_string(resp).contains(&format!("/listings/{id}/edit")));
}

// ---------------------------------------------------------------------
// Edit form

#[test]
fn edit_form_requires_sign_in() {
    let app = test_app("edit_form_anon");
    let resp = handle(get("/listings/1/edit"), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location_header(&resp), "/sign-in");
}

#[test]
fn edit_form_for_missing_listing_bounces_home() {
    let app = test_app("edit_form_missing");
    let (_, cookie) = signed_in_user(&app.db, "a@b.com");

    let resp = handle(with_cookie(get("/listings/999/edit"), &cookie), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location_header(&resp), "/");
    assert!(set_cookies(&resp).iter().any(|c| c.starts_with("flash=e.")));
}

#[test]
fn edit_form_rejects_non_owner() {
    let app = test_app("edit_form_non_owner");
    let (owner, _) = signed_in_user(&app.db, "owner@b.com");
    let (_, other_cookie) = signed_in_user(&app.db, "other@b.com");
    let id = seed_listing(&app.db, owner);

    let resp = handle(
        with_cookie(get(&format!("/listings/{id}/edit")), &other_cookie),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location_header(&resp), "/");
    assert!(set_cookies(&resp).iter().any(|c| c.starts_with("flash=e.")));
}

#[test]
fn edit_form_is_seeded_with_current_values() {
    let app = test_app("edit_form_seeded");
    let (user_id, cookie) = signed_in_user(&app.db, "a@b.com");
    let id = seed_listing(&app.db, user_id);

    let resp = handle(
        with_cookie(get(&format!("/listings/{id}/edit")), &cookie),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Sunny two-bed flat"));
    // The address field starts from the stored canonical location.
    assert!(body.contains("1 Old Address Rd, Somewhere"));
}

// ---------------------------------------------------------------------
// Edit submission

#[test]
fn edit_post_geocodes_uploads_and_overwrites() {
    let app = test_app("edit_post_ok");
    let (user_id, cookie) = signed_in_user(&app.db, "a@b.com");
    let id = seed_listing(&app.db, user_id);

    let req = submit(
        &format!("/listings/{id}/edit"),
        &cookie,
        &listing_fields(),
        &[("front.jpg", JPEG_BYTES), ("back.png", JPEG_BYTES)],
    );
    let resp = handle(req, &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location_header(&resp), format!("/category/rent/{id}"));
    assert!(set_cookies(&resp).iter().any(|c| c.starts_with("flash=s.")));

    let listing = listings::get_listing(&app.db, id).unwrap().unwrap();
    assert_eq!(listing.location, CANONICAL_ADDRESS);
    assert_eq!(listing.img_urls.len(), 2);
    assert!(listing.img_urls[0].starts_with("https://store.test/images/"));
    // offer=false in the form drops the old discount
    assert!(!listing.offer);
    assert_eq!(listing.discounted_price, None);
    assert!(listing.updated_at.is_some());
    assert_eq!(app.store.upload_count(), 2);
}

#[test]
fn edit_post_by_non_owner_touches_nothing() {
    let app = test_app("edit_post_non_owner");
    let (owner, _) = signed_in_user(&app.db, "owner@b.com");
    let (_, other_cookie) = signed_in_user(&app.db, "other@b.com");
    let id = seed_listing(&app.db, owner);

    let req = submit(
        &format!("/listings/{id}/edit"),
        &other_cookie,
        &listing_fields(),
        &[("front.jpg", JPEG_BYTES)],
    );
    let resp = handle(req, &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location_header(&resp), "/");

    // Rejected before any upload or write.
    assert_eq!(app.store.upload_count(), 0);
    let listing = listings::get_listing(&app.db, id).unwrap().unwrap();
    assert_eq!(listing.location, "1 Old Address Rd, Somewhere");
    assert_eq!(listing.updated_at, None);
}

#[test]
fn invalid_form_bounces_back_before_any_network_call() {
    let app = test_app("edit_post_invalid");
    let (user_id, cookie) = signed_in_user(&app.db, "a@b.com");
    let id = seed_listing(&app.db, user_id);

    let mut fields = listing_fields();
    for field in fields.iter_mut() {
        if field.0 == "name" {
            field.1 = "short"; // below the 10-char minimum
        }
    }
    let req = submit(
        &format!("/listings/{id}/edit"),
        &cookie,
        &fields,
        &[("front.jpg", JPEG_BYTES)],
    );
    let resp = handle(req, &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location_header(&resp), format!("/listings/{id}/edit"));

    assert_eq!(app.store.upload_count(), 0);
    let listing = listings::get_listing(&app.db, id).unwrap().unwrap();
    assert_eq!(listing.name, "Sunny two-bed flat");
}

#[test]
fn unresolvable_address_bounces_back_without_uploading() {
    let app = App {
        db: init_test_db("edit_post_bad_address"),
        geocoder: StubGeocoder::zero_results(),
        store: StubStore::ok(),
        sign_in: SignInService::new(SignInConfig::default()),
    };
    let (user_id, cookie) = signed_in_user(&app.db, "a@b.com");
    let id = seed_listing(&app.db, user_id);

    let req = submit(
        &format!("/listings/{id}/edit"),
        &cookie,
        &listing_fields(),
        &[("front.jpg", JPEG_BYTES)],
    );
    let resp = handle(req, &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location_header(&resp), format!("/listings/{id}/edit"));
    assert!(set_cookies(&resp).iter().any(|c| c.starts_with("flash=e.")));

    assert_eq!(app.store.upload_count(), 0);
    let listing = listings::get_listing(&app.db, id).unwrap().unwrap();
    assert_eq!(listing.location, "1 Old Address Rd, Somewhere");
}

#[test]
fn edit_post_for_missing_listing_bounces_home() {
    let app = test_app("edit_post_missing");
    let (_, cookie) = signed_in_user(&app.db, "a@b.com");

    let req = submit(
        "/listings/424242/edit",
        &cookie,
        &listing_fields(),
        &[("front.jpg", JPEG_BYTES)],
    );
    let resp = handle(req, &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location_header(&resp), "/");
    assert_eq!(app.store.upload_count(), 0);
}

// ---------------------------------------------------------------------
// Create submission

#[test]
fn create_post_requires_sign_in() {
    let app = test_app("create_post_anon");
    let req = post("/listings/new", multipart_body(&listing_fields(), &[("a.jpg", JPEG_BYTES)]));
    let req = with_content_type(req, &multipart_content_type());

    let resp = handle(req, &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location_header(&resp), "/sign-in");
    assert_eq!(app.store.upload_count(), 0);
}

#[test]
fn create_post_inserts_and_redirects_to_detail() {
    let app = test_app("create_post_ok");
    let (user_id, cookie) = signed_in_user(&app.db, "a@b.com");

    let req = submit(
        "/listings/new",
        &cookie,
        &listing_fields(),
        &[("front.jpg", JPEG_BYTES)],
    );
    let resp = handle(req, &app).unwrap();
    assert_eq!(resp.status(), 302);

    let location = location_header(&resp);
    assert!(location.starts_with("/category/rent/"), "got {location}");
    let id: i64 = location.rsplit('/').next().unwrap().parse().unwrap();

    let listing = listings::get_listing(&app.db, id).unwrap().unwrap();
    assert_eq!(listing.user_id, user_id);
    assert_eq!(listing.location, CANONICAL_ADDRESS);
    assert_eq!(listing.img_urls.len(), 1);
    assert_eq!(listing.regular_price, 1800);
    assert_eq!(app.store.upload_count(), 1);
}

#[test]
fn create_post_without_images_is_rejected() {
    let app = test_app("create_post_no_images");
    let (_, cookie) = signed_in_user(&app.db, "a@b.com");

    let req = submit("/listings/new", &cookie, &listing_fields(), &[]);
    let resp = handle(req, &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location_header(&resp), "/listings/new");
    assert_eq!(app.store.upload_count(), 0);
}

// ---------------------------------------------------------------------
// Delete

#[test]
fn delete_post_removes_owned_listing() {
    let app = test_app("delete_post_owner");
    let (user_id, cookie) = signed_in_user(&app.db, "a@b.com");
    let id = seed_listing(&app.db, user_id);

    let resp = handle(
        with_cookie(post(&format!("/listings/{id}/delete"), Vec::new()), &cookie),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location_header(&resp), "/");
    assert!(listings::get_listing(&app.db, id).unwrap().is_none());
}

#[test]
fn delete_post_by_non_owner_keeps_listing() {
    let app = test_app("delete_post_non_owner");
    let (owner, _) = signed_in_user(&app.db, "owner@b.com");
    let (_, other_cookie) = signed_in_user(&app.db, "other@b.com");
    let id = seed_listing(&app.db, owner);

    let resp = handle(
        with_cookie(
            post(&format!("/listings/{id}/delete"), Vec::new()),
            &other_cookie,
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert!(set_cookies(&resp).iter().any(|c| c.starts_with("flash=e.")));
    assert!(listings::get_listing(&app.db, id).unwrap().is_some());
}
