pub mod file_storage;
pub mod memory_storage;
pub mod navigator;
pub mod notifier;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
pub use navigator::WatchNavigator;
pub use notifier::TracingNotifier;
