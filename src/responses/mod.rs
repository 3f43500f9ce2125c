pub mod errors;
pub mod flash;
pub mod html;
pub mod redirect;

pub use errors::{error_to_response, html_error_response, ResultResp};
pub use html::{html_response, html_response_with_cookies};
pub use redirect::{redirect, redirect_with_cookies, redirect_with_flash};
