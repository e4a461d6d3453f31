pub mod task;
pub mod template;
