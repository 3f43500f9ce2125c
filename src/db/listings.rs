// src/db/listings.rs
use rusqlite::{params, OptionalExtension, Row};

use crate::db::connection::Database;
use crate::domain::listing::{Listing, ListingRecord, ListingType};
use crate::errors::ServerError;

const LISTING_COLUMNS: &str = "id, listing_type, name, bedrooms, bathrooms, parking, furnished, \
     location, offer, regular_price, discounted_price, img_urls, latitude, longitude, \
     user_id, created_at, updated_at";

// Raw row before the JSON column and the type tag are decoded.
struct RawListing {
    id: i64,
    listing_type: String,
    name: String,
    bedrooms: i64,
    bathrooms: i64,
    parking: bool,
    furnished: bool,
    location: String,
    offer: bool,
    regular_price: i64,
    discounted_price: Option<i64>,
    img_urls: String,
    latitude: f64,
    longitude: f64,
    user_id: i64,
    created_at: i64,
    updated_at: Option<i64>,
}

fn read_raw(row: &Row) -> rusqlite::Result<RawListing> {
    Ok(RawListing {
        id: row.get(0)?,
        listing_type: row.get(1)?,
        name: row.get(2)?,
        bedrooms: row.get(3)?,
        bathrooms: row.get(4)?,
        parking: row.get(5)?,
        furnished: row.get(6)?,
        location: row.get(7)?,
        offer: row.get(8)?,
        regular_price: row.get(9)?,
        discounted_price: row.get(10)?,
        img_urls: row.get(11)?,
        latitude: row.get(12)?,
        longitude: row.get(13)?,
        user_id: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

fn decode(raw: RawListing) -> Result<Listing, ServerError> {
    let img_urls: Vec<String> = serde_json::from_str(&raw.img_urls)
        .map_err(|e| ServerError::DbError(format!("bad img_urls column: {e}")))?;

    Ok(Listing {
        id: raw.id,
        listing_type: ListingType::parse(&raw.listing_type)?,
        name: raw.name,
        bedrooms: raw.bedrooms,
        bathrooms: raw.bathrooms,
        parking: raw.parking,
        furnished: raw.furnished,
        location: raw.location,
        offer: raw.offer,
        regular_price: raw.regular_price,
        discounted_price: raw.discounted_price,
        img_urls,
        latitude: raw.latitude,
        longitude: raw.longitude,
        user_id: raw.user_id,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    })
}

fn encode_img_urls(urls: &[String]) -> Result<String, ServerError> {
    serde_json::to_string(urls).map_err(|e| ServerError::DbError(e.to_string()))
}

pub fn insert_listing(
    db: &Database,
    rec: &ListingRecord,
    created_at: i64,
) -> Result<i64, ServerError> {
    let img_urls = encode_img_urls(&rec.img_urls)?;

    db.with_conn(|conn| {
        conn.execute(
            r#"
            insert into listings (
                listing_type, name, bedrooms, bathrooms, parking, furnished,
                location, offer, regular_price, discounted_price, img_urls,
                latitude, longitude, user_id, created_at
            ) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                rec.listing_type.as_str(),
                rec.name,
                rec.bedrooms,
                rec.bathrooms,
                rec.parking,
                rec.furnished,
                rec.location,
                rec.offer,
                rec.regular_price,
                rec.discounted_price,
                img_urls,
                rec.latitude,
                rec.longitude,
                rec.user_id,
                created_at,
            ],
        )
        .map_err(|e| ServerError::DbError(format!("insert listing failed: {e}")))?;

        Ok(conn.last_insert_rowid())
    })
}

/// Full overwrite of the provided fields under an existing id. The
/// discounted price is written as given (NULL when the record carries
/// none), so an offer turned off clears any previous discount.
pub fn update_listing(
    db: &Database,
    id: i64,
    rec: &ListingRecord,
    updated_at: i64,
) -> Result<(), ServerError> {
    let img_urls = encode_img_urls(&rec.img_urls)?;

    db.with_conn(|conn| {
        let changed = conn
            .execute(
                r#"
                update listings set
                    listing_type = ?, name = ?, bedrooms = ?, bathrooms = ?,
                    parking = ?, furnished = ?, location = ?, offer = ?,
                    regular_price = ?, discounted_price = ?, img_urls = ?,
                    latitude = ?, longitude = ?, updated_at = ?
                where id = ?
                "#,
                params![
                    rec.listing_type.as_str(),
                    rec.name,
                    rec.bedrooms,
                    rec.bathrooms,
                    rec.parking,
                    rec.furnished,
                    rec.location,
                    rec.offer,
                    rec.regular_price,
                    rec.discounted_price,
                    img_urls,
                    rec.latitude,
                    rec.longitude,
                    updated_at,
                    id,
                ],
            )
            .map_err(|e| ServerError::DbError(format!("update listing failed: {e}")))?;

        if changed != 1 {
            return Err(ServerError::NotFound);
        }
        Ok(())
    })
}

pub fn get_listing(db: &Database, id: i64) -> Result<Option<Listing>, ServerError> {
    let raw = db.with_conn(|conn| {
        conn.query_row(
            &format!("select {LISTING_COLUMNS} from listings where id = ?"),
            params![id],
            read_raw,
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select listing failed: {e}")))
    })?;

    raw.map(decode).transpose()
}

pub fn get_recent_listings(db: &Database, limit: i64) -> Result<Vec<Listing>, ServerError> {
    query_listings(
        db,
        &format!(
            "select {LISTING_COLUMNS} from listings order by coalesce(updated_at, created_at) desc limit ?"
        ),
        params![limit],
    )
}

pub fn get_listings_by_type(
    db: &Database,
    listing_type: ListingType,
    limit: i64,
) -> Result<Vec<Listing>, ServerError> {
    query_listings(
        db,
        &format!(
            "select {LISTING_COLUMNS} from listings where listing_type = ? \
             order by coalesce(updated_at, created_at) desc limit ?"
        ),
        params![listing_type.as_str(), limit],
    )
}

fn query_listings(
    db: &Database,
    sql: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Listing>, ServerError> {
    let raws = db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map(args, read_raw)
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| ServerError::DbError(e.to_string()))?);
        }
        Ok(out)
    })?;

    raws.into_iter().map(decode).collect()
}

/// Delete a listing owned by `user_id`. Returns whether a row was removed.
pub fn delete_listing(db: &Database, id: i64, user_id: i64) -> Result<bool, ServerError> {
    db.with_conn(|conn| {
        let deleted = conn
            .execute(
                "delete from listings where id = ? and user_id = ?",
                params![id, user_id],
            )
            .map_err(|e| ServerError::DbError(format!("delete listing failed: {e}")))?;
        Ok(deleted == 1)
    })
}
