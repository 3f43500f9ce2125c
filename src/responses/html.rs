use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use maud::Markup;

pub fn html_response(markup: Markup) -> ResultResp {
    html_response_with_cookies(markup, &[])
}

/// HTML page plus Set-Cookie headers (flash clearing, session changes).
pub fn html_response_with_cookies(markup: Markup, cookies: &[String]) -> ResultResp {
    let body = markup.into_string();

    let mut builder = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8");

    for cookie in cookies {
        builder = builder.header("Set-Cookie", cookie.as_str());
    }

    let resp = builder.body(Body::from(body)).unwrap();
    Ok(resp)
}
