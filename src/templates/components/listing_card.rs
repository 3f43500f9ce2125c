use maud::{html, Markup};

use crate::domain::listing::Listing;

pub fn listing_card(listing: &Listing) -> Markup {
    html! {
        a class="card listing-card" href=(listing.detail_path()) {
            @if let Some(cover) = listing.img_urls.first() {
                img class="listing-cover" src=(cover) alt=(listing.name);
            }
            div class="card-body" {
                h2 { (listing.name) }
                p class="listing-location" { (listing.location) }
                p class="listing-price" {
                    "$" (listing.price())
                    @if listing.listing_type.as_str() == "rent" { " / month" }
                }
                @if listing.offer {
                    span class="badge" { "Offer" }
                }
                p class="listing-facts" {
                    (listing.bedrooms) " bed · " (listing.bathrooms) " bath"
                }
            }
        }
    }
}
