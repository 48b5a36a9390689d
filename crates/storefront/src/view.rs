//! Render surface supplied by the page host.
//!
//! The page logic never draws anything itself. It calls a [`ViewRenderer`]
//! with records and snapshots, and a [`Notifier`] for user-visible notices.

use tee_storefront_core::{CartSnapshot, ProductRecord, Size, SizeOption};

/// Kinds of user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Add to cart was clicked with no size selected.
    NoSizeSelected,
    /// The product fetch was denied by the rate limit.
    RateLimitReached,
    /// The product could not be fetched.
    FetchFailed,
}

impl NoticeKind {
    /// Default message shown for this notice.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoSizeSelected => "Please select a size!",
            Self::RateLimitReached => "API rate limit reached. Please try again later.",
            Self::FetchFailed => "Product details are unavailable right now.",
        }
    }
}

/// Presents notices to the user.
pub trait Notifier {
    /// Show `message` to the user.
    fn notify(&mut self, kind: NoticeKind, message: &str);
}

/// Draws the product page.
pub trait ViewRenderer: Notifier {
    /// Show product image, title, description, and price.
    fn display_product(&mut self, product: &ProductRecord);

    /// Show the size selector, highlighting `selected` if set.
    ///
    /// The host reports clicks back through
    /// [`PageController::on_size_selected`](crate::page::PageController::on_size_selected).
    fn display_size_options(&mut self, options: &[SizeOption], selected: Option<&Size>);

    /// Show cart line items, total, and count.
    fn display_cart(&mut self, snapshot: &CartSnapshot);

    /// Show or hide the cart dropdown.
    fn set_cart_dropdown_visible(&mut self, visible: bool);

    /// Tell the user the product fetch was rate limited.
    fn notify_rate_limit_reached(&mut self) {
        self.notify(
            NoticeKind::RateLimitReached,
            NoticeKind::RateLimitReached.message(),
        );
    }
}
