pub mod menu;
pub mod progress_bar;
pub mod question_area;
pub mod stats_table;
pub mod summary;
