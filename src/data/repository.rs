use rusqlite::{params, Connection, OptionalExtension};

use crate::error::AppError;
use crate::models::activity::{HistoryAction, HistoryItem};

const WATCHED_FOLDERS_KEY: &str = "watched_folders";
const DESTINATION_FOLDERS_KEY: &str = "destination_folders";

pub fn insert_history(conn: &Connection, record: &HistoryItem) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO history_log (id, file_path, original_name, final_name, original_folder, final_folder, action, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.id,
            record.file_path,
            record.original_name,
            record.final_name,
            record.original_folder,
            record.final_folder,
            record.action.to_string(),
            record.timestamp,
        ],
    )?;
    Ok(())
}

pub fn list_history(
    conn: &Connection,
    limit: u32,
    offset: u32,
) -> Result<Vec<HistoryItem>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, file_path, original_name, final_name, original_folder, final_folder, action, timestamp
         FROM history_log ORDER BY timestamp DESC LIMIT ?1 OFFSET ?2",
    )?;

    let records = stmt
        .query_map(params![limit, offset], |row| {
            let action: String = row.get(6)?;
            Ok(HistoryItem {
                id: row.get(0)?,
                file_path: row.get(1)?,
                original_name: row.get(2)?,
                final_name: row.get(3)?,
                original_folder: row.get(4)?,
                final_folder: row.get(5)?,
                action: action
                    .parse::<HistoryAction>()
                    .unwrap_or(HistoryAction::Approved),
                timestamp: row.get(7)?,
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(records)
}

pub fn clear_history(conn: &Connection) -> Result<usize, AppError> {
    let count = conn.execute("DELETE FROM history_log", [])?;
    Ok(count)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>, AppError> {
    let value = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<(), AppError> {
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

pub fn watched_folders(conn: &Connection) -> Result<Vec<String>, AppError> {
    folder_list(conn, WATCHED_FOLDERS_KEY)
}

pub fn set_watched_folders(conn: &Connection, folders: &[String]) -> Result<(), AppError> {
    set_setting(conn, WATCHED_FOLDERS_KEY, &serde_json::to_string(folders)?)
}

pub fn destination_folders(conn: &Connection) -> Result<Vec<String>, AppError> {
    folder_list(conn, DESTINATION_FOLDERS_KEY)
}

pub fn set_destination_folders(conn: &Connection, folders: &[String]) -> Result<(), AppError> {
    set_setting(
        conn,
        DESTINATION_FOLDERS_KEY,
        &serde_json::to_string(folders)?,
    )
}

fn folder_list(conn: &Connection, key: &str) -> Result<Vec<String>, AppError> {
    match get_setting(conn, key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}
