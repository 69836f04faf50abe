pub mod math;

pub use math::{column_totals, proportions};
