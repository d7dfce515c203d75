//! Review-queue core for an AI-assisted desktop file organizer: files are
//! batched through a suggestion service, reviewed (or auto-approved) in a
//! live queue, and retired into an immutable history.

pub mod data;
pub mod error;
pub mod models;
pub mod safety;
pub mod services;
pub mod store;

pub use error::AppError;
pub use models::activity::{ActivityItem, HistoryAction, HistoryItem, ItemStatus, UserAction};
pub use models::file_entry::FileEntry;
pub use models::suggestion::Suggestion;
pub use services::auto_apply::AutoApplyAction;
pub use services::oracle::SuggestionOracle;
pub use services::organize_service::{organize_files, preview_batch, OrganizePreview};
pub use services::queue_service::{process_batch, BatchOptions, BatchProgress, QueueEvent};
pub use store::{ActivityStore, QueueUpdate, DEFAULT_SETTLE_DELAY};
