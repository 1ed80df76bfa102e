//! Output writers
//!
//! [`VegaLiteWriter`] turns a [`Figure`](crate::plot::figure::Figure) into a
//! Vega-Lite specification; [`HtmlWriter`] turns a
//! [`LayoutNode`](crate::layout::LayoutNode) tree into a standalone document
//! that embeds those specifications.

mod html;
mod vegalite;

pub use html::HtmlWriter;
pub use vegalite::VegaLiteWriter;

use crate::Result;

/// Converts an input into an output format
pub trait Writer<T: ?Sized> {
    type Output;

    fn write(&self, input: &T) -> Result<Self::Output>;
}
