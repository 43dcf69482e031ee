//! Peripheral study widgets.
//!
//! The timer, task list, and scratchpad are plain in-memory state with no
//! presentation attached: a front-end drives them from its own event loop
//! and reads their state back out. Nothing here persists.

mod scratchpad;
mod timer;
mod todo;

pub use scratchpad::Scratchpad;
pub use timer::{PomodoroTimer, TimerPhase};
pub use todo::{TodoItem, TodoList};
