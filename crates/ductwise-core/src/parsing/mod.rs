pub mod codes;
pub mod dates;
pub mod values;

pub use codes::{extract_duct_no, extract_unit_wbs};
