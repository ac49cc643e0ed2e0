//! HTML for the launch page.
//!
//! The page is rendered with `format!` on the server; behavior lives in
//! `static/main.js`, whose states are modelled by [`crate::session::LaunchView`].

pub mod page;

pub use page::{html_shell, index_page};
