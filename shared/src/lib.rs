//! Task model, storage and subtask suggestions shared by the smarttask
//! server and terminal client.

pub mod protocol;
pub mod storage;
pub mod store;
pub mod suggest;
pub mod task;

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{StoreWarning, TaskStore};
pub use suggest::{SuggestError, SuggestionClient};
pub use task::{NewTask, Task, TaskStatus, ValidationError};
