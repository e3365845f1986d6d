//! Packing Layer
//!
//! Rule tables and the list generator built on them.

mod generator;
mod templates;

pub use generator::{generate_packing_list, PackingListGenerator};
pub use templates::{clothing_for, TemplateSet, MAX_SHIRTS, MAX_SOCKS, MAX_UNDERWEAR};
