use maud::{html, Markup};

use crate::responses::flash::Flash;
use crate::templates::{desktop_layout, flash_banner};

pub fn sign_in_page(flash: Option<&Flash>) -> Markup {
    desktop_layout(
        "Sign in",
        false,
        html! {
            main class="container narrow" {
                (flash_banner(flash))

                h1 { "Sign in" }
                p class="lead" {
                    "Enter your email and we’ll send you a secure sign-in link."
                }

                form action="/sign-in" method="post" {
                    label class="form-label" for="email" { "Email" }
                    input type="email" id="email" name="email" required;
                    button type="submit" class="button primary" { "Send link" }
                }
            }
        },
    )
}

pub fn link_sent_page(email: &str) -> Markup {
    desktop_layout(
        "Check your email",
        false,
        html! {
            main class="container narrow" {
                h1 { "Check your email" }
                p {
                    "We sent a sign-in link to " strong { (email) } "."
                    " It expires in 15 minutes."
                }
            }
        },
    )
}
