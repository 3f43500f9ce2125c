use maud::{html, Markup};

use crate::domain::listing::{Listing, ListingType};
use crate::responses::flash::Flash;
use crate::templates::{desktop_layout, flash_banner, listing_card};

pub fn category_page(
    listing_type: ListingType,
    listings: &[Listing],
    signed_in: bool,
    flash: Option<&Flash>,
) -> Markup {
    desktop_layout(
        listing_type.label(),
        signed_in,
        html! {
            main class="container" {
                (flash_banner(flash))

                h1 { "Places " (listing_type.label()) }
                @if listings.is_empty() {
                    p { "No listings in this category yet." }
                } @else {
                    div class="listing-grid" {
                        @for listing in listings {
                            (listing_card(listing))
                        }
                    }
                }
            }
        },
    )
}
