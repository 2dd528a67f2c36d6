//! Shared geometry and document-search helpers.

pub mod geometry;
pub mod search;

pub use geometry::{crossform, make_homogeneous, normalize_line};
pub use search::{find_in_value, find_nested};
