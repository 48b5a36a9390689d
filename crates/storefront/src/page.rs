//! Product page controller.
//!
//! Translates user input into cart and selection changes and pushes the
//! results to the host's [`ViewRenderer`]. The host wires its UI events to
//! the `on_*` methods:
//!
//! | UI event                      | Method                                   |
//! |-------------------------------|------------------------------------------|
//! | page load                     | [`PageController::load_product`]         |
//! | size button clicked           | [`PageController::on_size_selected`]     |
//! | add-to-cart clicked           | [`PageController::on_add_to_cart_clicked`] |
//! | cart quantity input changed   | [`PageController::on_cart_quantity_changed`] |
//! | cart icon clicked             | [`PageController::on_cart_toggle_clicked`] |
//! | click anywhere on the page    | [`PageController::on_document_clicked`]  |

use tee_storefront_core::{CartSnapshot, ProductRecord, SizeError};

use crate::cart::{CartError, CartStore, SelectedSize};
use crate::clock::Clock;
use crate::error::add_breadcrumb;
use crate::product::{ProductDataService, ProductError, ProductSource};
use crate::store::KeyValueStore;
use crate::view::{NoticeKind, ViewRenderer};

/// Visibility of the cart dropdown. Starts hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartDropdown {
    visible: bool,
}

impl CartDropdown {
    /// Returns `true` if the dropdown is showing.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.visible
    }

    /// Flip visibility. Returns the new state.
    pub const fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Hide the dropdown. Returns `true` if it was showing.
    pub const fn close(&mut self) -> bool {
        let was_visible = self.visible;
        self.visible = false;
        was_visible
    }
}

/// State and event handling for the single-product page.
pub struct PageController<S, P, C, V> {
    products: ProductDataService<S, P, C>,
    view: V,
    product: Option<ProductRecord>,
    cart: CartStore,
    selected: SelectedSize,
    dropdown: CartDropdown,
}

impl<S, P, C, V> PageController<S, P, C, V>
where
    S: KeyValueStore,
    P: ProductSource,
    C: Clock,
    V: ViewRenderer,
{
    /// Create a controller with an empty cart and no selection.
    #[must_use]
    pub fn new(products: ProductDataService<S, P, C>, view: V) -> Self {
        Self {
            products,
            view,
            product: None,
            cart: CartStore::new(),
            selected: SelectedSize::default(),
            dropdown: CartDropdown::default(),
        }
    }

    /// Load the product and render it.
    ///
    /// A rate-limited lookup notifies the user and renders the stale product
    /// if there is one. A failed lookup notifies the user, renders no product
    /// panel, forgets any product from an earlier load, and returns the error
    /// for the host to report; the cart keeps working either way.
    ///
    /// # Errors
    ///
    /// Returns `ProductError` if the product lookup fails.
    pub async fn load_product(&mut self) -> Result<Option<&ProductRecord>, ProductError> {
        let lookup = match self.products.get_product().await {
            Ok(lookup) => lookup,
            Err(e) => {
                tracing::warn!(error = %e, "Product unavailable, skipping product panel");
                self.product = None;
                self.view
                    .notify(NoticeKind::FetchFailed, NoticeKind::FetchFailed.message());
                return Err(e);
            }
        };

        if lookup.is_rate_limited() {
            self.view.notify_rate_limit_reached();
        }

        self.product = lookup.into_product();
        if let Some(product) = &self.product {
            self.view.display_product(product);
            self.view
                .display_size_options(&product.size_options, self.selected.get());
        }

        Ok(self.product.as_ref())
    }

    /// A size button was clicked.
    ///
    /// # Errors
    ///
    /// Returns `SizeError` if `label` is not a valid size; the previous
    /// selection is kept.
    pub fn on_size_selected(&mut self, label: &str) -> Result<(), SizeError> {
        self.selected.select(label)?;
        add_breadcrumb("cart", "Selected size", Some(&[("size", label)]));

        if let Some(product) = &self.product {
            self.view
                .display_size_options(&product.size_options, self.selected.get());
        }

        Ok(())
    }

    /// The add-to-cart button was clicked.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoSizeSelected` if no size is selected. The user is
    /// notified and the cart is unchanged.
    pub fn on_add_to_cart_clicked(&mut self) -> Result<CartSnapshot, CartError> {
        match self.cart.add_item(self.selected.label()) {
            Ok(snapshot) => {
                add_breadcrumb(
                    "cart",
                    "Added to cart",
                    Some(&[("size", self.selected.label())]),
                );
                self.view.display_cart(&snapshot);
                Ok(snapshot)
            }
            Err(e @ CartError::NoSizeSelected) => {
                self.view.notify(NoticeKind::NoSizeSelected, &e.to_string());
                Err(e)
            }
        }
    }

    /// A cart quantity input changed.
    ///
    /// `raw_quantity` is the input's text. Non-numeric input is ignored and
    /// returns `None`; otherwise the quantity is applied (zero or less
    /// removes the line) and the cart re-rendered.
    pub fn on_cart_quantity_changed(
        &mut self,
        size: &str,
        raw_quantity: &str,
    ) -> Option<CartSnapshot> {
        let Ok(quantity) = raw_quantity.trim().parse::<i64>() else {
            tracing::debug!(size, raw_quantity, "Ignoring non-numeric quantity");
            return None;
        };

        let snapshot = self.cart.set_quantity(size, quantity);
        self.view.display_cart(&snapshot);
        Some(snapshot)
    }

    /// The cart icon was clicked. Returns whether the dropdown is now showing.
    pub fn on_cart_toggle_clicked(&mut self) -> bool {
        let visible = self.dropdown.toggle();
        self.view.set_cart_dropdown_visible(visible);
        visible
    }

    /// A click landed somewhere on the page.
    ///
    /// Clicks outside both the dropdown and the cart icon close the dropdown.
    pub fn on_document_clicked(&mut self, inside_cart: bool) {
        if !inside_cart && self.dropdown.close() {
            self.view.set_cart_dropdown_visible(false);
        }
    }

    /// The product currently rendered, if any.
    #[must_use]
    pub const fn product(&self) -> Option<&ProductRecord> {
        self.product.as_ref()
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// The current size selection.
    #[must_use]
    pub const fn selected(&self) -> &SelectedSize {
        &self.selected
    }

    /// The cart dropdown state.
    #[must_use]
    pub const fn dropdown(&self) -> CartDropdown {
        self.dropdown
    }

    /// The product data service.
    #[must_use]
    pub const fn products(&self) -> &ProductDataService<S, P, C> {
        &self.products
    }

    /// The view.
    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// The view, mutably.
    pub const fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}
