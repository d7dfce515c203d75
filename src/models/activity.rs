use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::file_entry::FileEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Processing,
    Completed,
    Approved,
    Rejected,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("unknown item status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserAction {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for UserAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for UserAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("unknown user action: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Approved,
    Rejected,
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for HistoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("unknown history action: {s}")),
        }
    }
}

/// One file's journey through the review queue, from enqueue to retirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: String,
    pub file_path: String,
    pub original_name: String,
    pub original_folder: String,
    pub status: ItemStatus,
    pub suggested_name: Option<String>,
    pub suggested_folder: Option<String>,
    pub summary: Option<String>,
    pub auto_rename_applied: bool,
    pub auto_move_applied: bool,
    pub edited_name: Option<String>,
    pub edited_folder: Option<String>,
    pub user_action: UserAction,
    pub timestamp: DateTime<Utc>,
}

impl ActivityItem {
    /// Build a fresh queue entry for a file about to be sent to the
    /// suggestion service.
    pub fn processing(file: &FileEntry) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_path: file.path.clone(),
            original_name: file.name.clone(),
            original_folder: file.parent_folder(),
            status: ItemStatus::Processing,
            suggested_name: None,
            suggested_folder: None,
            summary: None,
            auto_rename_applied: false,
            auto_move_applied: false,
            edited_name: None,
            edited_folder: None,
            user_action: UserAction::Pending,
            timestamp: Utc::now(),
        }
    }

    /// Name this item would retire under. An edit only counts while the
    /// rename has not already been applied; with no suggestion at all the
    /// original name stands.
    pub fn final_name(&self) -> String {
        if !self.auto_rename_applied {
            if let Some(edited) = &self.edited_name {
                return edited.clone();
            }
        }
        self.suggested_name
            .clone()
            .unwrap_or_else(|| self.original_name.clone())
    }

    /// Folder this item would retire into, with the same edit gating as
    /// [`final_name`](Self::final_name).
    pub fn final_folder(&self) -> String {
        if !self.auto_move_applied {
            if let Some(edited) = &self.edited_folder {
                return edited.clone();
            }
        }
        self.suggested_folder
            .clone()
            .unwrap_or_else(|| self.original_folder.clone())
    }

    /// Convert into the immutable record kept after the item leaves the
    /// queue. A still-pending review resolves to `approved`; that case is
    /// logged because it normally means review was skipped.
    pub fn into_history(self) -> HistoryItem {
        let action = match self.user_action {
            UserAction::Approved => HistoryAction::Approved,
            UserAction::Rejected => HistoryAction::Rejected,
            UserAction::Pending => {
                log::warn!(
                    "retiring {} ({}) without explicit review, recording as approved",
                    self.original_name,
                    self.id
                );
                HistoryAction::Approved
            }
        };

        HistoryItem {
            final_name: self.final_name(),
            final_folder: self.final_folder(),
            id: self.id,
            file_path: self.file_path,
            original_name: self.original_name,
            original_folder: self.original_folder,
            action,
            timestamp: self.timestamp,
        }
    }
}

/// Immutable record of a retired queue item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub file_path: String,
    pub original_name: String,
    pub final_name: String,
    pub original_folder: String,
    pub final_folder: String,
    pub action: HistoryAction,
    pub timestamp: DateTime<Utc>,
}
