pub mod drill;
pub mod input;
pub mod machine;
pub mod mode;
pub mod result;
pub mod timer;
