// src/responses/flash.rs
//
// Transient success/error messages, carried across a redirect in a
// short-lived cookie and cleared when the next page renders.
use base64::Engine;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Cookie value: kind tag + base64 of the message, so arbitrary text
/// survives cookie syntax.
pub fn encode(flash: &Flash) -> String {
    let tag = match flash.kind {
        FlashKind::Success => 's',
        FlashKind::Error => 'e',
    };
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&flash.message);
    format!("{tag}.{payload}")
}

pub fn decode(value: &str) -> Option<Flash> {
    let (tag, payload) = value.split_once('.')?;
    let kind = match tag {
        "s" => FlashKind::Success,
        "e" => FlashKind::Error,
        _ => return None,
    };
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .ok()?;
    let message = String::from_utf8(bytes).ok()?;
    Some(Flash { kind, message })
}

/// Set-Cookie value carrying the flash across the next redirect.
pub fn set_cookie(flash: &Flash) -> String {
    format!("{FLASH_COOKIE}={}; Path=/; Max-Age=60", encode(flash))
}

/// Set-Cookie value clearing the flash once it has been shown.
pub fn clear_cookie() -> String {
    format!("{FLASH_COOKIE}=; Path=/; Max-Age=0")
}
