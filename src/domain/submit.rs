// src/domain/submit.rs
//
// The submission pipeline shared by create and edit:
//
//     validate -> (ownership) -> geocode -> upload images -> assemble -> write
//
// Strictly linear; the first failure aborts the submission and nothing is
// persisted. Blobs uploaded before a later failure are left behind.
use crate::db::connection::Database;
use crate::db::listings;
use crate::domain::form::ListingForm;
use crate::domain::listing::{ListingRecord, ListingType};
use crate::errors::ServerError;
use crate::geocode::Geocode;
use crate::storage::{store_images, BlobStore};

#[derive(Debug, Clone, Copy)]
pub enum SaveTarget {
    Create,
    Update { listing_id: i64 },
}

#[derive(Debug, Clone, Copy)]
pub struct SavedListing {
    pub id: i64,
    pub listing_type: ListingType,
}

impl SavedListing {
    pub fn detail_path(&self) -> String {
        format!("/category/{}/{}", self.listing_type.as_str(), self.id)
    }
}

pub fn save_listing<G: Geocode, S: BlobStore + Sync>(
    db: &Database,
    geocoder: &G,
    store: &S,
    user_id: i64,
    target: SaveTarget,
    form: &ListingForm,
    now: i64,
) -> Result<SavedListing, ServerError> {
    // All local checks first: a rejected form makes no network call.
    form.validate()?;

    if let SaveTarget::Update { listing_id } = target {
        let existing = listings::get_listing(db, listing_id)?.ok_or(ServerError::NotFound)?;
        if existing.user_id != user_id {
            return Err(ServerError::Unauthorized(
                "You are not authorized to edit that listing".into(),
            ));
        }
    }

    eprintln!("📍 Geocoding address: {}", form.address);
    let geo = geocoder.geocode(&form.address)?;

    let img_urls = store_images(store, user_id, &form.images)?;

    let record = ListingRecord {
        listing_type: form.listing_type,
        name: form.name.clone(),
        bedrooms: form.bedrooms,
        bathrooms: form.bathrooms,
        parking: form.parking,
        furnished: form.furnished,
        location: geo.canonical_address,
        offer: form.offer,
        regular_price: form.regular_price,
        // No offer, no discount, whatever the form carried.
        discounted_price: if form.offer { form.discounted_price } else { None },
        img_urls,
        latitude: geo.lat,
        longitude: geo.lng,
        user_id,
    };

    let id = match target {
        SaveTarget::Create => listings::insert_listing(db, &record, now)?,
        SaveTarget::Update { listing_id } => {
            listings::update_listing(db, listing_id, &record, now)?;
            listing_id
        }
    };

    eprintln!("💾 Listing {id} saved");
    Ok(SavedListing {
        id,
        listing_type: record.listing_type,
    })
}
