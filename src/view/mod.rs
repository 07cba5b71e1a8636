//! Client-side view state: the authoritative list and its displayed
//! projection.

pub mod list;
pub mod query;

pub use list::{ListViewModel, RefreshOutcome};
pub use query::{Projectable, SortDirection, SortState, SortValue, project};
