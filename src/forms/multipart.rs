// src/forms/multipart.rs
//
// Minimal multipart/form-data parser, enough for the listing forms: text
// fields plus a repeated file input. Bodies are small (6 images max), so
// everything is parsed in memory.
use std::str::FromStr;

use mime::Mime;

use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct FilePart {
    pub name: String,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    /// Text fields in document order. Later values win in `field()`,
    /// matching how repeated inputs overwrite form state.
    pub fields: Vec<(String, String)>,
    /// File parts in document order.
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Extract the boundary parameter from a Content-Type header value.
pub fn boundary_from_content_type(content_type: &str) -> Result<String, ServerError> {
    let mime = Mime::from_str(content_type)
        .map_err(|e| ServerError::BadRequest(format!("bad content type: {e}")))?;

    if mime.type_() != mime::MULTIPART || mime.subtype() != mime::FORM_DATA {
        return Err(ServerError::BadRequest(format!(
            "expected multipart/form-data, got {mime}"
        )));
    }

    mime.get_param(mime::BOUNDARY)
        .map(|b| b.as_str().to_string())
        .ok_or_else(|| ServerError::BadRequest("multipart boundary missing".into()))
}

/// Parse a multipart/form-data body into fields and file parts.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Result<MultipartForm, ServerError> {
    let delim = format!("--{boundary}");
    let delim = delim.as_bytes();

    let mut form = MultipartForm::default();

    // Position just after the first delimiter line.
    let Some(first) = find_bytes(body, delim, 0) else {
        return Err(ServerError::BadRequest("multipart body has no boundary".into()));
    };
    let mut pos = first + delim.len();

    loop {
        // After a delimiter: "--" closes the body, CRLF opens a part.
        if body[pos..].starts_with(b"--") {
            break;
        }
        if body[pos..].starts_with(b"\r\n") {
            pos += 2;
        } else {
            return Err(ServerError::BadRequest("malformed multipart boundary".into()));
        }

        let header_end = find_bytes(body, b"\r\n\r\n", pos)
            .ok_or_else(|| ServerError::BadRequest("multipart part missing header block".into()))?;
        let headers = String::from_utf8_lossy(&body[pos..header_end]);
        let content_start = header_end + 4;

        // Content runs to the CRLF preceding the next delimiter.
        let mut next_delim = find_bytes(body, delim, content_start)
            .ok_or_else(|| ServerError::BadRequest("multipart body not terminated".into()))?;
        if next_delim < 2 || &body[next_delim - 2..next_delim] != b"\r\n" {
            return Err(ServerError::BadRequest("malformed multipart part".into()));
        }
        let content = &body[content_start..next_delim - 2];

        let (name, filename) = parse_content_disposition(&headers)?;
        let content_type = header_value(&headers, "content-type");

        match filename {
            Some(filename) => form.files.push(FilePart {
                name,
                filename,
                content_type: content_type.unwrap_or_else(|| "application/octet-stream".into()),
                data: content.to_vec(),
            }),
            None => form
                .fields
                .push((name, String::from_utf8_lossy(content).into_owned())),
        }

        next_delim += delim.len();
        pos = next_delim;
    }

    Ok(form)
}

fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

fn header_value(headers: &str, name: &str) -> Option<String> {
    headers.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        if k.trim().eq_ignore_ascii_case(name) {
            Some(v.trim().to_string())
        } else {
            None
        }
    })
}

/// Pull name and optional filename out of a Content-Disposition header.
fn parse_content_disposition(headers: &str) -> Result<(String, Option<String>), ServerError> {
    let value = header_value(headers, "content-disposition")
        .ok_or_else(|| ServerError::BadRequest("part missing content-disposition".into()))?;

    let mut name = None;
    let mut filename = None;

    for param in value.split(';').skip(1) {
        let Some((k, v)) = param.split_once('=') else {
            continue;
        };
        let v = v.trim().trim_matches('"').to_string();
        match k.trim() {
            "name" => name = Some(v),
            "filename" => filename = Some(v),
            _ => {}
        }
    }

    let name =
        name.ok_or_else(|| ServerError::BadRequest("part missing field name".into()))?;
    Ok((name, filename))
}
