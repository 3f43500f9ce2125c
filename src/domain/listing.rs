// src/domain/listing.rs
use crate::errors::ServerError;

/// Limits carried over from the listing form.
pub const MAX_IMAGES: usize = 6;
pub const NAME_MIN_LEN: usize = 10;
pub const NAME_MAX_LEN: usize = 32;
pub const ROOMS_MIN: i64 = 1;
pub const ROOMS_MAX: i64 = 50;
pub const PRICE_MIN: i64 = 50;
pub const PRICE_MAX: i64 = 750_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingType {
    Sale,
    Rent,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Sale => "sale",
            ListingType::Rent => "rent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListingType::Sale => "For Sale",
            ListingType::Rent => "For Rent",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ServerError> {
        match s {
            "sale" => Ok(ListingType::Sale),
            "rent" => Ok(ListingType::Rent),
            other => Err(ServerError::BadRequest(format!(
                "unknown listing type: {other}"
            ))),
        }
    }
}

/// A listing as read from the DB.
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: i64,
    pub listing_type: ListingType,
    pub name: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub parking: bool,
    pub furnished: bool,
    /// Canonical address from the geocoder.
    pub location: String,
    pub offer: bool,
    pub regular_price: i64,
    pub discounted_price: Option<i64>,
    pub img_urls: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub user_id: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// The fields a submission writes. Assembled by the persist step only after
/// geocoding and uploads succeed; never carries raw files or the raw
/// address the user typed.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub listing_type: ListingType,
    pub name: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub parking: bool,
    pub furnished: bool,
    pub location: String,
    pub offer: bool,
    pub regular_price: i64,
    pub discounted_price: Option<i64>,
    pub img_urls: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub user_id: i64,
}

impl Listing {
    pub fn price(&self) -> i64 {
        self.discounted_price.unwrap_or(self.regular_price)
    }

    pub fn detail_path(&self) -> String {
        format!("/category/{}/{}", self.listing_type.as_str(), self.id)
    }
}
