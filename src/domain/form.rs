// src/domain/form.rs
use crate::domain::listing::{
    ListingType, MAX_IMAGES, NAME_MAX_LEN, NAME_MIN_LEN, PRICE_MAX, PRICE_MIN, ROOMS_MAX,
    ROOMS_MIN,
};
use crate::errors::ServerError;
use crate::forms::multipart::MultipartForm;

/// An image selected in the form's file input.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Form state for create and edit submissions. `address` is the raw text
/// the user typed; it never reaches the DB (the geocoder's canonical
/// address does). `images` is the whole selection: a new file input always
/// replaces the previous list.
#[derive(Debug, Clone)]
pub struct ListingForm {
    pub listing_type: ListingType,
    pub name: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub parking: bool,
    pub furnished: bool,
    pub address: String,
    pub offer: bool,
    pub regular_price: i64,
    pub discounted_price: Option<i64>,
    pub images: Vec<ImageFile>,
}

impl ListingForm {
    pub fn from_multipart(form: MultipartForm) -> Result<Self, ServerError> {
        let images = form
            .files
            .iter()
            .filter(|f| f.name == "images" && !f.filename.is_empty() && !f.data.is_empty())
            .map(|f| {
                Ok(ImageFile {
                    content_type: image_content_type(&f.filename)?,
                    filename: f.filename.clone(),
                    data: f.data.clone(),
                })
            })
            .collect::<Result<Vec<_>, ServerError>>()?;

        Ok(Self {
            listing_type: ListingType::parse(require(&form, "type")?)?,
            name: require(&form, "name")?.trim().to_string(),
            bedrooms: parse_count(&form, "bedrooms")?,
            bathrooms: parse_count(&form, "bathrooms")?,
            parking: parse_bool(&form, "parking")?,
            furnished: parse_bool(&form, "furnished")?,
            address: require(&form, "address")?.trim().to_string(),
            offer: parse_bool(&form, "offer")?,
            regular_price: parse_price(&form, "regular_price")?,
            discounted_price: match form.field("discounted_price") {
                None | Some("") => None,
                Some(v) => Some(parse_i64("discounted_price", v)?),
            },
            images,
        })
    }

    /// All local checks. Runs before any network call is made, so a
    /// rejected submission never geocodes, uploads, or writes.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.offer {
            let Some(discounted) = self.discounted_price else {
                return Err(ServerError::Validation(
                    "A discounted price is required when the listing has an offer".into(),
                ));
            };
            if discounted >= self.regular_price {
                return Err(ServerError::Validation(
                    "Discounted price needs to be less than the regular price".into(),
                ));
            }
        }

        if self.images.len() > MAX_IMAGES {
            return Err(ServerError::Validation(format!("Max {MAX_IMAGES} images")));
        }
        if self.images.is_empty() {
            return Err(ServerError::Validation("At least one image is required".into()));
        }

        let name_len = self.name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name_len) {
            return Err(ServerError::Validation(format!(
                "Name must be {NAME_MIN_LEN}-{NAME_MAX_LEN} characters"
            )));
        }

        for (label, n) in [("Bedrooms", self.bedrooms), ("Bathrooms", self.bathrooms)] {
            if !(ROOMS_MIN..=ROOMS_MAX).contains(&n) {
                return Err(ServerError::Validation(format!(
                    "{label} must be between {ROOMS_MIN} and {ROOMS_MAX}"
                )));
            }
        }

        let mut prices = vec![self.regular_price];
        prices.extend(self.discounted_price);
        if prices.iter().any(|p| !(PRICE_MIN..=PRICE_MAX).contains(p)) {
            return Err(ServerError::Validation(format!(
                "Prices must be between {PRICE_MIN} and {PRICE_MAX}"
            )));
        }

        if self.address.is_empty() {
            return Err(ServerError::Validation("Address is required".into()));
        }

        Ok(())
    }
}

fn require<'a>(form: &'a MultipartForm, name: &str) -> Result<&'a str, ServerError> {
    form.field(name)
        .ok_or_else(|| ServerError::BadRequest(format!("missing field: {name}")))
}

/// Boolean inputs submit the literal strings "true" / "false".
fn parse_bool(form: &MultipartForm, name: &str) -> Result<bool, ServerError> {
    match require(form, name)? {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ServerError::BadRequest(format!(
            "field {name} must be true or false, got: {other}"
        ))),
    }
}

fn parse_i64(name: &str, value: &str) -> Result<i64, ServerError> {
    value
        .trim()
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("field {name} must be a number")))
}

fn parse_count(form: &MultipartForm, name: &str) -> Result<i64, ServerError> {
    parse_i64(name, require(form, name)?)
}

fn parse_price(form: &MultipartForm, name: &str) -> Result<i64, ServerError> {
    parse_i64(name, require(form, name)?)
}

/// The form accepts .jpg/.jpeg/.png only.
fn image_content_type(filename: &str) -> Result<String, ServerError> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok(mime::IMAGE_JPEG.to_string()),
        "png" => Ok(mime::IMAGE_PNG.to_string()),
        _ => Err(ServerError::Validation(format!(
            "Unsupported image type: {filename}"
        ))),
    }
}
