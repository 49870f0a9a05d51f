//! Row extraction and normalization.
//!
//! Given a classified sheet and its [`HeaderLayout`](clarity_map::HeaderLayout),
//! produces a [`NormalizedTable`](clarity_model::NormalizedTable): one row per
//! data row, keyed by canonical column, with blank markers nulled and subject
//! identifiers normalized.

#![deny(unsafe_code)]

mod extract;

pub mod normalization;

pub use extract::{Extraction, extract_rows};
pub use normalization::{NA_MARKERS, is_na_marker, normalize_subject_id, nullify_blank};
