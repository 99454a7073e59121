pub mod predicate;
pub mod query;
pub mod sort;
pub mod spec;
pub mod summary;

pub use predicate::PropertyPredicate;
pub use query::{query, QueryEngine};
pub use sort::{comparator_for, sort_properties, Comparator};
pub use spec::{FilterSpec, SortKey, ALL_STATUSES};
pub use summary::{results_heading, saved_badge, ActiveFilter, FilterKind};
