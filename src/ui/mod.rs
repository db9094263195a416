pub mod assignment_table;
pub mod dashboard;
pub mod dialogs;
pub mod filter_bar;
pub mod theme;
pub mod toolbar;
