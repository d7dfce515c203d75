use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::file_entry::FileEntry;
use crate::safety::{validate_not_protected, validate_path};

/// List a folder's direct children, directories first, then by name.
/// Entries whose metadata cannot be read are skipped.
pub fn read_folder(folder_path: &str) -> Result<Vec<FileEntry>, AppError> {
    validate_path(folder_path)?;
    let path = Path::new(folder_path);
    if !path.is_dir() {
        return Err(AppError::General(format!(
            "folder does not exist: {folder_path}"
        )));
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(path)? {
        let Ok(entry) = entry else { continue };
        let Ok(metadata) = entry.metadata() else {
            continue;
        };

        let modified_at = metadata
            .modified()
            .ok()
            .map(|time| DateTime::<Utc>::from(time).to_rfc3339());

        entries.push(FileEntry {
            path: entry.path().to_string_lossy().to_string(),
            name: entry.file_name().to_string_lossy().to_string(),
            is_directory: metadata.is_dir(),
            size_bytes: metadata.len(),
            modified_at,
        });
    }

    entries.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(entries)
}

/// Hand a file to the platform's default opener.
pub fn open_file(file_path: &str) -> Result<(), AppError> {
    validate_path(file_path)?;
    if !Path::new(file_path).exists() {
        return Err(AppError::General(format!(
            "file does not exist: {file_path}"
        )));
    }

    #[cfg(target_os = "windows")]
    let spawn = std::process::Command::new("cmd")
        .args(["/C", "start", "", file_path])
        .spawn();

    #[cfg(target_os = "macos")]
    let spawn = std::process::Command::new("open").arg(file_path).spawn();

    #[cfg(target_os = "linux")]
    let spawn = std::process::Command::new("xdg-open").arg(file_path).spawn();

    spawn.map_err(|e| AppError::General(format!("failed to open {file_path}: {e}")))?;
    Ok(())
}

/// Send a file to the OS recycle bin.
pub fn delete_file(file_path: &str) -> Result<(), AppError> {
    validate_path(file_path)?;
    validate_not_protected(file_path)?;
    if !Path::new(file_path).exists() {
        return Err(AppError::General(format!(
            "file does not exist: {file_path}"
        )));
    }

    trash::delete(file_path)
        .map_err(|e| AppError::General(format!("failed to recycle {file_path}: {e}")))
}

pub fn create_folder(folder_path: &str) -> Result<(), AppError> {
    validate_path(folder_path)?;
    validate_not_protected(folder_path)?;
    fs::create_dir_all(folder_path)?;
    Ok(())
}

pub fn rename_file(source: &str, destination: &str) -> Result<(), AppError> {
    validate_path(source)?;
    validate_path(destination)?;
    validate_not_protected(source)?;

    if !Path::new(source).exists() {
        return Err(AppError::General(format!(
            "source does not exist: {source}"
        )));
    }
    if Path::new(destination).exists() {
        return Err(AppError::General(format!(
            "destination already exists: {destination}"
        )));
    }

    fs::rename(source, destination)?;
    Ok(())
}

/// Move a file into a destination folder, creating the folder if needed.
/// A name collision gets a ` (1)`, ` (2)`, … suffix. Returns the final path.
pub fn move_file(source: &str, dest_dir: &str) -> Result<String, AppError> {
    validate_path(source)?;
    validate_path(dest_dir)?;
    validate_not_protected(source)?;
    validate_not_protected(dest_dir)?;

    let src_path = Path::new(source);
    if !src_path.exists() {
        return Err(AppError::General(format!(
            "source does not exist: {source}"
        )));
    }
    let file_name = src_path
        .file_name()
        .ok_or_else(|| AppError::General(format!("invalid source path: {source}")))?
        .to_string_lossy()
        .to_string();

    fs::create_dir_all(dest_dir)?;

    let dest = Path::new(dest_dir).join(&file_name);
    let final_dest = if dest.exists() {
        let stem = src_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let ext = src_path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let mut counter = 1;
        loop {
            let candidate = Path::new(dest_dir).join(format!("{stem} ({counter}){ext}"));
            if !candidate.exists() {
                break candidate;
            }
            counter += 1;
        }
    } else {
        dest
    };

    match fs::rename(src_path, &final_dest) {
        Ok(()) => {}
        Err(rename_err) => {
            // Rename fails across filesystems; fall back to copy + remove.
            fs::copy(src_path, &final_dest).map_err(|copy_err| {
                AppError::General(format!(
                    "move failed: {rename_err}, copy failed: {copy_err}"
                ))
            })?;
            fs::remove_file(src_path)?;
        }
    }

    Ok(final_dest.to_string_lossy().to_string())
}
