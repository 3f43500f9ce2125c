use astra::{Body, ResponseBuilder};

use crate::responses::flash::{self, Flash};
use crate::responses::ResultResp;

pub fn redirect(location: &str) -> ResultResp {
    redirect_with_cookies(location, &[])
}

/// Redirect carrying a transient message for the next page.
pub fn redirect_with_flash(location: &str, flash: Flash) -> ResultResp {
    redirect_with_cookies(location, &[flash::set_cookie(&flash)])
}

pub fn redirect_with_cookies(location: &str, cookies: &[String]) -> ResultResp {
    let mut builder = ResponseBuilder::new()
        .status(302)
        .header("Location", location);

    for cookie in cookies {
        builder = builder.header("Set-Cookie", cookie.as_str());
    }

    Ok(builder.body(Body::empty()).unwrap())
}
