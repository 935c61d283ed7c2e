pub mod manager;
pub mod types;

pub use manager::{
    TaskManager,
    Waker,
};
pub use types::TaskResult;
