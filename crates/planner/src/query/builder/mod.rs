pub mod condition;
pub mod joiner;
pub mod wrapper;
