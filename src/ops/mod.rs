pub mod countdown;
pub mod due;
pub mod task_store;
pub mod view;
