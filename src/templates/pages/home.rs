use maud::{html, Markup};

use crate::domain::listing::Listing;
use crate::responses::flash::Flash;
use crate::templates::{desktop_layout, flash_banner, listing_card};

pub fn home_page(recent: &[Listing], signed_in: bool, flash: Option<&Flash>) -> Markup {
    desktop_layout(
        "Openhouse",
        signed_in,
        html! {
            main class="container" {
                (flash_banner(flash))

                h1 { "Find your next place" }
                p class="lead" {
                    "Browse places " a href="/category/sale" { "for sale" }
                    " or " a href="/category/rent" { "for rent" } "."
                }

                section {
                    h2 { "Recent listings" }
                    @if recent.is_empty() {
                        p { "No listings yet." }
                    } @else {
                        div class="listing-grid" {
                            @for listing in recent {
                                (listing_card(listing))
                            }
                        }
                    }
                }
            }
        },
    )
}
