pub mod category;
pub mod home;
pub mod listing_detail;
pub mod listing_form;
pub mod sign_in;

pub use category::category_page;
pub use home::home_page;
pub use listing_detail::listing_page;
pub use listing_form::{listing_form_page, ListingFormVm};
pub use sign_in::{link_sent_page, sign_in_page};
