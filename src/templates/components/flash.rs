use maud::{html, Markup};

use crate::responses::flash::{Flash, FlashKind};

/// Transient banner shown once after a redirect.
pub fn flash_banner(flash: Option<&Flash>) -> Markup {
    html! {
        @if let Some(flash) = flash {
            @let class = match flash.kind {
                FlashKind::Success => "flash flash-success",
                FlashKind::Error => "flash flash-error",
            };
            div class=(class) role="status" {
                (flash.message)
            }
        }
    }
}
