use serde::Serialize;

use crate::error::AppError;
use crate::models::activity::ItemStatus;
use crate::models::file_entry::FileEntry;
use crate::services::auto_apply::{self, AutoApplyAction};
use crate::services::oracle::SuggestionOracle;
use crate::services::queue_service::{self, BatchOptions, QueueEvent};
use crate::store::{ActivityStore, QueueUpdate};

/// Row shown in the pre-flight dialog before a batch is queued: the current
/// name/folder next to what the oracle proposes.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizePreview {
    pub file: FileEntry,
    pub current_name: String,
    pub new_name: String,
    pub current_folder: String,
    pub destination_folder: String,
    pub summary: Option<String>,
}

/// Run a batch through the suggestion pipeline and into the store.
///
/// Every file shows up in the queue as `processing` before its oracle call,
/// flips to `completed` with its suggestion afterwards, and is auto-approved
/// on the spot when the auto-apply policy says so. The store's processing
/// flag is cleared on the way out even when the batch fails, and items
/// completed before a failure stay in the queue for review.
pub async fn organize_files<O>(
    store: &ActivityStore,
    oracle: &O,
    files: &[FileEntry],
    options: BatchOptions,
) -> Result<(), AppError>
where
    O: SuggestionOracle + ?Sized,
{
    store.set_processing(true);
    store.set_progress(0, files.len());

    let result = queue_service::process_batch(oracle, files, options, |event| match event {
        QueueEvent::Processing { item, .. } => store.add_to_queue(item),
        QueueEvent::Completed {
            id,
            suggested_name,
            suggested_folder,
            summary,
            auto_rename_applied,
            auto_move_applied,
            progress,
        } => {
            store.update_queue_item(
                &id,
                QueueUpdate {
                    status: Some(ItemStatus::Completed),
                    suggested_name: Some(suggested_name),
                    suggested_folder: Some(suggested_folder),
                    summary,
                    auto_rename_applied: Some(auto_rename_applied),
                    auto_move_applied: Some(auto_move_applied),
                    user_action: None,
                },
            );
            store.set_progress(progress.current, progress.total);

            if let Some(item) = store.queue_item(&id) {
                if auto_apply::decide(options.auto_move, options.auto_rename, &item)
                    == AutoApplyAction::AutoApprove
                {
                    store.approve_item(&id);
                }
            }
        }
    })
    .await;

    store.set_processing(false);
    result
}

/// Ask the oracle for the whole batch at once and pair each file with its
/// proposal. Files the oracle has nothing for keep their current name and
/// folder.
pub async fn preview_batch<O>(
    oracle: &O,
    files: &[FileEntry],
) -> Result<Vec<OrganizePreview>, AppError>
where
    O: SuggestionOracle + ?Sized,
{
    let mut suggestions = oracle.organize(files).await?;

    Ok(files
        .iter()
        .map(|file| {
            let suggestion = suggestions.remove(&file.name).unwrap_or_default();
            let current_folder = file.parent_folder();
            OrganizePreview {
                current_name: file.name.clone(),
                new_name: suggestion.rename.unwrap_or_else(|| file.name.clone()),
                destination_folder: suggestion
                    .move_to
                    .unwrap_or_else(|| current_folder.clone()),
                current_folder,
                summary: suggestion.summary,
                file: file.clone(),
            }
        })
        .collect())
}
