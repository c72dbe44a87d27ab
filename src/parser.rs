//! Thin tokenizers for the input files
//!
//! The parsers only split files into their raw fields. All semantic
//! checks of the field values are done by the [`crate::Validator`].

/// Module to parse the `hp.obo` file
pub(crate) mod hp_obo;
/// Module to read the list of diseases that must not be ingested
pub mod omit_list;
/// Module to read the 14-column small files
pub mod small_file;
