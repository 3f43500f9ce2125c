use maud::{html, Markup};

use crate::domain::listing::{Listing, ListingType, NAME_MAX_LEN, NAME_MIN_LEN, PRICE_MAX, PRICE_MIN, ROOMS_MAX, ROOMS_MIN};
use crate::responses::flash::Flash;
use crate::templates::{desktop_layout, flash_banner};

/// View model for the shared create/edit form.
pub struct ListingFormVm {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,

    pub listing_type: ListingType,
    pub name: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub parking: bool,
    pub furnished: bool,
    /// Prefilled with the canonical address when editing.
    pub address: String,
    pub offer: bool,
    pub regular_price: i64,
    pub discounted_price: Option<i64>,
}

impl ListingFormVm {
    pub fn create() -> Self {
        Self {
            heading: "Create Listing",
            action: "/listings/new".to_string(),
            submit_label: "Create Listing",
            listing_type: ListingType::Rent,
            name: String::new(),
            bedrooms: 1,
            bathrooms: 1,
            parking: false,
            furnished: false,
            address: String::new(),
            offer: false,
            regular_price: 0,
            discounted_price: None,
        }
    }

    /// Seed form state from the loaded record (the stored canonical
    /// address becomes the editable address field).
    pub fn edit(listing: &Listing) -> Self {
        Self {
            heading: "Edit Listing",
            action: format!("/listings/{}/edit", listing.id),
            submit_label: "Save Listing",
            listing_type: listing.listing_type,
            name: listing.name.clone(),
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            parking: listing.parking,
            furnished: listing.furnished,
            address: listing.location.clone(),
            offer: listing.offer,
            regular_price: listing.regular_price,
            discounted_price: listing.discounted_price,
        }
    }
}

fn bool_choice(field: &str, value: bool) -> Markup {
    html! {
        div class="form-buttons" {
            label {
                input type="radio" name=(field) value="true" checked[value];
                " Yes"
            }
            label {
                input type="radio" name=(field) value="false" checked[!value];
                " No"
            }
        }
    }
}

pub fn listing_form_page(vm: &ListingFormVm, flash: Option<&Flash>) -> Markup {
    desktop_layout(
        vm.heading,
        true,
        html! {
            main class="container narrow" {
                (flash_banner(flash))

                h1 { (vm.heading) }

                form action=(vm.action) method="post" enctype="multipart/form-data" {
                    label class="form-label" { "Sell / Rent" }
                    div class="form-buttons" {
                        label {
                            input type="radio" name="type" value="sale"
                                checked[vm.listing_type == ListingType::Sale];
                            " Sell"
                        }
                        label {
                            input type="radio" name="type" value="rent"
                                checked[vm.listing_type == ListingType::Rent];
                            " Rent"
                        }
                    }

                    label class="form-label" for="name" { "Name" }
                    input type="text" id="name" name="name" value=(vm.name)
                        minlength=(NAME_MIN_LEN) maxlength=(NAME_MAX_LEN) required;

                    div class="form-rooms flex" {
                        div {
                            label class="form-label" for="bedrooms" { "Bedrooms" }
                            input type="number" id="bedrooms" name="bedrooms"
                                value=(vm.bedrooms) min=(ROOMS_MIN) max=(ROOMS_MAX) required;
                        }
                        div {
                            label class="form-label" for="bathrooms" { "Bathrooms" }
                            input type="number" id="bathrooms" name="bathrooms"
                                value=(vm.bathrooms) min=(ROOMS_MIN) max=(ROOMS_MAX) required;
                        }
                    }

                    label class="form-label" { "Parking" }
                    (bool_choice("parking", vm.parking))

                    label class="form-label" { "Furnished" }
                    (bool_choice("furnished", vm.furnished))

                    label class="form-label" for="address" { "Address" }
                    textarea id="address" name="address" required { (vm.address) }

                    label class="form-label" { "Offer" }
                    (bool_choice("offer", vm.offer))

                    label class="form-label" for="regular_price" { "Regular Price" }
                    div class="form-price" {
                        input type="number" id="regular_price" name="regular_price"
                            value=(vm.regular_price) min=(PRICE_MIN) max=(PRICE_MAX) required;
                        @if vm.listing_type == ListingType::Rent {
                            span { "$ / Month" }
                        }
                    }

                    label class="form-label" for="discounted_price" { "Discounted Price" }
                    input type="number" id="discounted_price" name="discounted_price"
                        value=[vm.discounted_price] min=(PRICE_MIN) max=(PRICE_MAX);
                    p class="form-hint" { "Only used when the listing has an offer." }

                    label class="form-label" for="images" { "Images" }
                    p class="form-hint" { "The first image will be the cover (max 6)." }
                    input type="file" id="images" name="images"
                        accept=".jpg,.png,.jpeg" multiple required;

                    button type="submit" class="button primary" { (vm.submit_label) }
                }
            }
        },
    )
}
