pub mod flash;
pub mod listing_card;

pub use flash::flash_banner;
pub use listing_card::listing_card;
