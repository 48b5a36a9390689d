//! Terminal host for the product page.
//!
//! Renders the page as text and turns input lines into page events.

use std::io::Write;

use tee_storefront_core::{CartSnapshot, Price, ProductRecord, Size, SizeOption};
use tee_storefront::view::{NoticeKind, Notifier, ViewRenderer};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `size <label>` - click a size button
    Size(String),
    /// `add` - click add to cart
    Add,
    /// `qty <size> <quantity>` - edit a cart quantity input
    Quantity { size: String, raw: String },
    /// `cart` - click the cart icon
    ToggleCart,
    /// `click` - click somewhere outside the cart
    ClickOutside,
    /// `reload` - load the product again
    Reload,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

impl Command {
    /// Parse an input line. Returns `None` for blank or unknown input.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match (words.next()?, words.next(), words.next()) {
            ("size", Some(label), None) => Self::Size(label.to_string()),
            ("add", None, None) => Self::Add,
            ("qty", Some(size), Some(raw)) => Self::Quantity {
                size: size.to_string(),
                raw: raw.to_string(),
            },
            ("cart", None, None) => Self::ToggleCart,
            ("click", None, None) => Self::ClickOutside,
            ("reload", None, None) => Self::Reload,
            ("help" | "?", None, None) => Self::Help,
            ("quit" | "exit", None, None) => Self::Quit,
            _ => return None,
        };

        words.next().is_none().then_some(command)
    }
}

/// Usage text for the `help` command.
pub const HELP: &str = "\
commands:
  size <label>       select a size
  add                add the selected size to the cart
  qty <size> <n>     set a cart quantity (0 removes)
  cart               show or hide the cart
  click              click outside the cart
  reload             load the product again
  quit               exit";

/// Writes the page to a terminal.
pub struct TerminalRenderer<W> {
    out: W,
    cart: CartSnapshot,
    cart_visible: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cart: CartSnapshot::default(),
            cart_visible: false,
        }
    }

    /// Write raw text followed by a newline.
    pub fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn draw_cart(&mut self) {
        let mut text = String::from("-- cart --\n");
        if self.cart.is_empty() {
            text.push_str("  (empty)\n");
        }
        for item in &self.cart.items {
            text.push_str(&format!(
                "  {:<20} x{:<3} {}\n",
                item.label(),
                item.quantity,
                Price::from_amount(item.line_total())
            ));
        }
        text.push_str(&format!("Total: {}", self.cart.display_total()));
        self.line(&text);
    }

    /// Consume the renderer and return the writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for TerminalRenderer<W> {
    fn notify(&mut self, kind: NoticeKind, message: &str) {
        tracing::debug!(?kind, "Showing notice");
        self.line(&format!("! {message}"));
    }
}

impl<W: Write> ViewRenderer for TerminalRenderer<W> {
    fn display_product(&mut self, product: &ProductRecord) {
        let mut text = format!("{}\n{}\n", product.title, product.display_price());
        if !product.description.is_empty() {
            text.push_str(&format!("{}\n", product.description));
        }
        if !product.image_url.is_empty() {
            text.push_str(&format!("image: {}", product.image_url));
        }
        self.line(text.trim_end());
    }

    fn display_size_options(&mut self, options: &[SizeOption], selected: Option<&Size>) {
        let buttons: Vec<String> = options
            .iter()
            .map(|option| {
                if selected.is_some_and(|size| size.as_str() == option.label) {
                    format!("[{}*]", option.label)
                } else {
                    format!("[{}]", option.label)
                }
            })
            .collect();
        self.line(&format!("sizes: {}", buttons.join(" ")));
    }

    fn display_cart(&mut self, snapshot: &CartSnapshot) {
        self.cart = snapshot.clone();
        self.line(&format!("cart ({})", self.cart.count));
        if self.cart_visible {
            self.draw_cart();
        }
    }

    fn set_cart_dropdown_visible(&mut self, visible: bool) {
        self.cart_visible = visible;
        if visible {
            self.draw_cart();
        } else {
            self.line("-- cart closed --");
        }
    }
}
