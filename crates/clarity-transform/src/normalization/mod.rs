//! Value-level cleanup applied to every extracted cell.

pub mod blank;
pub mod identifier;

pub use blank::{NA_MARKERS, is_na_marker, nullify_blank};
pub use identifier::normalize_subject_id;
