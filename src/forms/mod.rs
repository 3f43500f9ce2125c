pub mod multipart;

use std::collections::HashMap;

/// Decode an application/x-www-form-urlencoded body or query string.
pub fn parse_urlencoded(input: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(input)
        .into_owned()
        .collect()
}
