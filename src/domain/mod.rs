pub mod form;
pub mod listing;
pub mod submit;
