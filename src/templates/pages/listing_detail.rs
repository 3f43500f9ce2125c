use maud::{html, Markup};

use crate::domain::listing::Listing;
use crate::responses::flash::Flash;
use crate::templates::{desktop_layout, flash_banner};

pub fn listing_page(
    listing: &Listing,
    is_owner: bool,
    signed_in: bool,
    flash: Option<&Flash>,
) -> Markup {
    desktop_layout(
        &listing.name,
        signed_in,
        html! {
            main class="container" {
                (flash_banner(flash))

                h1 { (listing.name) }
                p class="listing-location" { (listing.location) }

                p class="listing-price" {
                    "$" (listing.price())
                    @if listing.listing_type.as_str() == "rent" { " / month" }
                    @if listing.offer {
                        @if let Some(discounted) = listing.discounted_price {
                            span class="badge" {
                                "$" (listing.regular_price - discounted) " off"
                            }
                        }
                    }
                }

                ul class="listing-facts" {
                    li { (listing.bedrooms) " bedrooms" }
                    li { (listing.bathrooms) " bathrooms" }
                    @if listing.parking { li { "Parking spot" } }
                    @if listing.furnished { li { "Furnished" } }
                }

                div class="listing-gallery" {
                    @for url in &listing.img_urls {
                        img src=(url) alt=(listing.name);
                    }
                }

                @if is_owner {
                    div class="owner-actions" {
                        a class="button" href=(format!("/listings/{}/edit", listing.id)) {
                            "Edit listing"
                        }
                        form
                            action=(format!("/listings/{}/delete", listing.id))
                            method="post"
                            class="inline"
                        {
                            button type="submit" class="button danger" { "Delete" }
                        }
                    }
                }
            }
        },
    )
}
