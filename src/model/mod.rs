pub mod assignment;
pub mod collection;
pub mod draft;
pub mod filter;
pub mod palette;
pub mod reminder;
pub mod sort;
pub mod timeline;

pub use assignment::{Assignment, Grade, Status};
pub use collection::AssignmentList;
pub use draft::AssignmentDraft;
pub use filter::FilterCriteria;
pub use palette::ColorAssignments;
pub use reminder::{Notification, ReminderConfig, ReminderEvaluator};
pub use sort::{SortDirection, SortField, SortSpec};
pub use timeline::{FocusedWeek, TimelineLayout, TimelineMetrics};
