use crate::error::AppError;
use crate::models::activity::ActivityItem;
use crate::models::file_entry::FileEntry;
use crate::services::oracle::SuggestionOracle;

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub auto_move: bool,
    pub auto_rename: bool,
}

/// Running completion count for a batch. `current` only advances when a
/// file's suggestion arrives, never on enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub enum QueueEvent {
    /// A file entered the pipeline; emitted before its oracle call starts.
    Processing {
        item: ActivityItem,
        progress: BatchProgress,
    },
    /// The oracle answered. The suggested values already carry the
    /// keep-current fallback for fields the oracle left out, and the
    /// `auto_*_applied` flags record the batch options in force at
    /// completion time.
    Completed {
        id: String,
        suggested_name: String,
        suggested_folder: String,
        summary: Option<String>,
        auto_rename_applied: bool,
        auto_move_applied: bool,
        progress: BatchProgress,
    },
}

/// Drive a batch of files through the suggestion oracle one at a time,
/// reporting every transition through `on_event`. Files are processed in the
/// order given; both events for a file are emitted before the next file
/// starts. The processor touches no shared state itself — callers feed the
/// events wherever they need them.
///
/// An oracle failure stops the batch: the error is returned and no further
/// events are emitted, leaving everything already reported as-is.
pub async fn process_batch<O, F>(
    oracle: &O,
    files: &[FileEntry],
    options: BatchOptions,
    mut on_event: F,
) -> Result<(), AppError>
where
    O: SuggestionOracle + ?Sized,
    F: FnMut(QueueEvent),
{
    let total = files.len();
    let mut current = 0;

    for file in files {
        let item = ActivityItem::processing(file);
        let id = item.id.clone();
        on_event(QueueEvent::Processing {
            item,
            progress: BatchProgress { current, total },
        });

        let suggestion = match oracle.suggest(file).await {
            Ok(suggestion) => suggestion,
            Err(err) => {
                log::error!("suggestion failed for {}, stopping batch: {err}", file.name);
                return Err(err);
            }
        };

        current += 1;
        on_event(QueueEvent::Completed {
            id,
            suggested_name: suggestion.rename.unwrap_or_else(|| file.name.clone()),
            suggested_folder: suggestion
                .move_to
                .unwrap_or_else(|| file.parent_folder()),
            summary: suggestion.summary,
            auto_rename_applied: options.auto_rename,
            auto_move_applied: options.auto_move,
            progress: BatchProgress { current, total },
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::{ItemStatus, UserAction};
    use crate::models::suggestion::Suggestion;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MapOracle {
        suggestions: HashMap<String, Suggestion>,
        fail_on: Option<String>,
    }

    impl MapOracle {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            let suggestions = entries
                .iter()
                .map(|(name, rename, folder)| {
                    (
                        name.to_string(),
                        Suggestion {
                            rename: Some(rename.to_string()),
                            move_to: Some(folder.to_string()),
                            summary: None,
                        },
                    )
                })
                .collect();
            Self {
                suggestions,
                fail_on: None,
            }
        }
    }

    #[async_trait]
    impl SuggestionOracle for MapOracle {
        async fn suggest(&self, file: &FileEntry) -> Result<Suggestion, AppError> {
            if self.fail_on.as_deref() == Some(file.name.as_str()) {
                return Err(AppError::Oracle(format!("no answer for {}", file.name)));
            }
            Ok(self.suggestions.get(&file.name).cloned().unwrap_or_default())
        }
    }

    fn file(name: &str) -> FileEntry {
        FileEntry {
            path: format!("/watched/{name}"),
            name: name.to_string(),
            is_directory: false,
            size_bytes: 1,
            modified_at: None,
        }
    }

    #[tokio::test]
    async fn events_come_in_file_order() {
        let oracle = MapOracle::new(&[("a.txt", "A.txt", "/dest"), ("b.txt", "B.txt", "/dest")]);
        let files = [file("a.txt"), file("b.txt")];
        let mut names = Vec::new();

        process_batch(&oracle, &files, BatchOptions::default(), |event| {
            names.push(match event {
                QueueEvent::Processing { item, .. } => format!("processing {}", item.original_name),
                QueueEvent::Completed { suggested_name, .. } => {
                    format!("completed {suggested_name}")
                }
            });
        })
        .await
        .unwrap();

        assert_eq!(
            names,
            [
                "processing a.txt",
                "completed A.txt",
                "processing b.txt",
                "completed B.txt",
            ]
        );
    }

    #[tokio::test]
    async fn progress_only_advances_on_completion() {
        let oracle = MapOracle::new(&[("a.txt", "A.txt", "/dest"), ("b.txt", "B.txt", "/dest")]);
        let files = [file("a.txt"), file("b.txt")];
        let mut reports = Vec::new();

        process_batch(&oracle, &files, BatchOptions::default(), |event| {
            reports.push(match event {
                QueueEvent::Processing { progress, .. } => (false, progress),
                QueueEvent::Completed { progress, .. } => (true, progress),
            });
        })
        .await
        .unwrap();

        let mut last = 0;
        for (completed, progress) in &reports {
            assert_eq!(progress.total, 2);
            assert!(progress.current >= last, "progress went backwards");
            if !completed {
                assert_eq!(progress.current, last);
            }
            last = progress.current;
        }
        assert_eq!(reports.last().unwrap().1, BatchProgress { current: 2, total: 2 });
        assert_eq!(
            reports.iter().filter(|(_, p)| p.current == 2).count(),
            1,
            "final progress must be reported exactly once"
        );
    }

    #[tokio::test]
    async fn fresh_items_start_processing_and_pending() {
        let oracle = MapOracle::new(&[("a.txt", "A.txt", "/dest")]);
        let files = [file("a.txt")];
        let mut seen = None;

        process_batch(&oracle, &files, BatchOptions::default(), |event| {
            if let QueueEvent::Processing { item, .. } = event {
                seen = Some(item);
            }
        })
        .await
        .unwrap();

        let item = seen.unwrap();
        assert_eq!(item.status, ItemStatus::Processing);
        assert_eq!(item.user_action, UserAction::Pending);
        assert_eq!(item.original_folder, "/watched");
        assert!(item.suggested_name.is_none());
    }

    #[tokio::test]
    async fn omitted_fields_fall_back_to_current_values() {
        let oracle = MapOracle {
            suggestions: HashMap::new(),
            fail_on: None,
        };
        let files = [file("keep.txt")];
        let mut completed = None;

        process_batch(&oracle, &files, BatchOptions::default(), |event| {
            if let QueueEvent::Completed {
                suggested_name,
                suggested_folder,
                ..
            } = event
            {
                completed = Some((suggested_name, suggested_folder));
            }
        })
        .await
        .unwrap();

        let (name, folder) = completed.unwrap();
        assert_eq!(name, "keep.txt");
        assert_eq!(folder, "/watched");
    }

    #[tokio::test]
    async fn batch_options_stamp_applied_flags() {
        let oracle = MapOracle::new(&[("a.txt", "A.txt", "/dest")]);
        let files = [file("a.txt")];
        let options = BatchOptions {
            auto_move: true,
            auto_rename: false,
        };
        let mut flags = None;

        process_batch(&oracle, &files, options, |event| {
            if let QueueEvent::Completed {
                auto_rename_applied,
                auto_move_applied,
                ..
            } = event
            {
                flags = Some((auto_rename_applied, auto_move_applied));
            }
        })
        .await
        .unwrap();

        assert_eq!(flags, Some((false, true)));
    }

    #[tokio::test]
    async fn oracle_failure_halts_batch_and_keeps_earlier_events() {
        let mut oracle = MapOracle::new(&[("a.txt", "A.txt", "/dest")]);
        oracle.fail_on = Some("b.txt".to_string());
        let files = [file("a.txt"), file("b.txt"), file("c.txt")];
        let mut events = Vec::new();

        let result = process_batch(&oracle, &files, BatchOptions::default(), |event| {
            events.push(event);
        })
        .await;

        assert!(matches!(result, Err(AppError::Oracle(_))));
        // a.txt fully reported, b.txt entered processing, c.txt never started.
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[2], QueueEvent::Processing { item, .. } if item.original_name == "b.txt"));
    }

    #[tokio::test]
    async fn empty_batch_emits_nothing() {
        let oracle = MapOracle::new(&[]);
        let mut count = 0;

        process_batch(&oracle, &[], BatchOptions::default(), |_| count += 1)
            .await
            .unwrap();

        assert_eq!(count, 0);
    }
}
