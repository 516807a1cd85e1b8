// File: ./src/model/mod.rs
pub mod display;
pub mod item;
pub mod validate;

pub use display::TaskDisplay;
pub use item::{NewTask, Priority, Task, TaskEdit, TaskField};
