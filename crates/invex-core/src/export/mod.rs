//! Export and display formatting of invoice records.

pub mod amount;
pub mod csv;

pub use amount::format_amount;
