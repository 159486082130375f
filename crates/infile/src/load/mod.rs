//! Bulk load planning and the special-table policy.

mod plan;
mod special;

pub use plan::{BulkLoadPlanner, LoadOutcome, LoadPlan};
pub use special::SpecialTables;
