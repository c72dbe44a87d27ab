//! [`HpoTermId`] and [`HpoGroup`] are the basic building blocks of the ontology
//!
//! Terms are identified through their [`HpoTermId`], which is a thin wrapper around
//! the integer part of the term's CURIE. Sets of terms, e.g. the parents
//! of a term, are stored in [`HpoGroup`]s.

mod group;
mod hpotermid;
pub(crate) mod internal;

pub use group::{HpoGroup, HpoTermIds};
pub use hpotermid::HpoTermId;
