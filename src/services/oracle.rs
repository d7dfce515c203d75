use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::file_entry::FileEntry;
use crate::models::suggestion::Suggestion;

/// External suggestion service proposing a rename/move per file. The caller
/// owns retry and backpressure; implementations just answer.
#[async_trait]
pub trait SuggestionOracle: Send + Sync {
    async fn suggest(&self, file: &FileEntry) -> Result<Suggestion, AppError>;

    /// Batch variant keyed by file name. The default asks for each file in
    /// turn and fails on the first error.
    async fn organize(
        &self,
        files: &[FileEntry],
    ) -> Result<HashMap<String, Suggestion>, AppError> {
        let mut suggestions = HashMap::with_capacity(files.len());
        for file in files {
            suggestions.insert(file.name.clone(), self.suggest(file).await?);
        }
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UppercaseOracle;

    #[async_trait]
    impl SuggestionOracle for UppercaseOracle {
        async fn suggest(&self, file: &FileEntry) -> Result<Suggestion, AppError> {
            Ok(Suggestion {
                rename: Some(file.name.to_uppercase()),
                move_to: None,
                summary: None,
            })
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
    async fn default_batch_maps_suggestions_by_name() {
        let oracle = UppercaseOracle;
        let files = [file("a.txt"), file("b.txt")];

        let suggestions = oracle.organize(&files).await.unwrap();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions["a.txt"].rename.as_deref(), Some("A.TXT"));
        assert_eq!(suggestions["b.txt"].rename.as_deref(), Some("B.TXT"));
    }
}
