//! Shared result type.
//!
//! Crates define their own error enums and return them wrapped in a
//! `rootcause::Report`. A plain error converts into its report with `?` or
//! `into()`.

use rootcause::Report;

/// Result whose error is a [`Report`] carrying context `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
