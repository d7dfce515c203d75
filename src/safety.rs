use crate::error::AppError;
use std::path::{Component, Path};

const PROTECTED_ROOTS: &[&str] = &[
    "/Applications",
    "/bin",
    "/sbin",
    "/usr",
    "/System",
    "/Library",
    "/etc",
    "C:\\Windows",
    "C:\\Program Files",
    "C:\\Program Files (x86)",
];

pub fn validate_path(path: &str) -> Result<(), AppError> {
    if path.is_empty() {
        return Err(AppError::General("path is empty".to_string()));
    }

    if path.contains('\0') {
        return Err(AppError::General(
            "path contains a NUL byte".to_string(),
        ));
    }

    for component in Path::new(path).components() {
        if matches!(component, Component::ParentDir) {
            return Err(AppError::General(
                "path traversal (.. component) not allowed".to_string(),
            ));
        }
    }

    Ok(())
}

pub fn is_protected_path(path: &str) -> bool {
    let normalized = normalize_for_match(path);
    PROTECTED_ROOTS.iter().any(|root| {
        let root_normalized = normalize_for_match(root);
        if is_windows_style_path(&root_normalized) {
            let path_lower = normalized.to_ascii_lowercase();
            let root_lower = root_normalized.to_ascii_lowercase();
            path_lower == root_lower || path_lower.starts_with(&format!("{root_lower}/"))
        } else {
            normalized == root_normalized || normalized.starts_with(&format!("{root_normalized}/"))
        }
    })
}

pub fn validate_not_protected(path: &str) -> Result<(), AppError> {
    if is_protected_path(path) {
        return Err(AppError::General(format!(
            "operation on protected path not allowed: {path}"
        )));
    }
    Ok(())
}

fn normalize_for_match(path: &str) -> String {
    let mut normalized = path.trim().replace('\\', "/");
    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }
    normalized
}

fn is_windows_style_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_rejected() {
        assert!(validate_path("").is_err());
    }

    #[test]
    fn traversal_rejected() {
        assert!(validate_path("/home/user/../../etc/passwd").is_err());
        assert!(validate_path("docs/../secret").is_err());
    }

    #[test]
    fn plain_paths_accepted() {
        assert!(validate_path("/home/user/Downloads/report.pdf").is_ok());
        assert!(validate_path("C:\\Users\\me\\file.txt").is_ok());
    }

    #[test]
    fn protected_roots_detected() {
        assert!(is_protected_path("/usr/bin"));
        assert!(is_protected_path("/etc"));
        assert!(is_protected_path("C:\\Windows\\System32"));
        assert!(!is_protected_path("/home/user/etc"));
        assert!(!is_protected_path("/usrdata"));
    }

    #[test]
    fn validate_not_protected_rejects_system_dirs() {
        assert!(validate_not_protected("/System/Library").is_err());
        assert!(validate_not_protected("/home/user/Documents").is_ok());
    }
}
