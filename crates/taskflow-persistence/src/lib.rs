pub mod store;
pub mod sync;
pub mod traits;

pub use store::*;
pub use sync::StatusSync;
pub use traits::{TaskStore, TaskUpdate};
