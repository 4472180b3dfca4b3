pub mod assembler;
pub mod filters;
pub mod grouping;
pub mod metrics;
pub mod sorting;
pub mod state;

pub use assembler::assemble;
pub use filters::{filter_options, FilterCriteria};
pub use sorting::SortField;
pub use state::{Action, FetchRequest, ViewState};
