/// Access to the destination folder: dated names, enumeration, and lookup.
use chrono::NaiveDate;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::errors::StoreError;

/// Build `<prefix><YYYY-MM-DD><postfix>`.
pub fn dated_filename(prefix: &str, date: NaiveDate, postfix: &str) -> String {
    format!("{}{}{}", prefix, date.format("%Y-%m-%d"), postfix)
}

/// List regular files in `folder`, newest first.
///
/// "Newest" is a descending byte-wise sort of the names, which matches date
/// order for names produced by [`dated_filename`]. Subdirectories are skipped;
/// symlinks count when they point at a regular file.
pub async fn list_files(folder: &Path) -> Result<Vec<String>, StoreError> {
    match tokio::fs::metadata(folder).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(StoreError::FolderMissing(folder.to_path_buf())),
    }

    let mut entries = tokio::fs::read_dir(folder).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let is_file = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!("Skipping non UTF-8 filename {:?}", raw),
        }
    }

    names.sort_by(|a, b| b.cmp(a));
    Ok(names)
}

/// Resolve `filename` to an existing regular file directly inside `folder`.
///
/// Anything that is not a single plain path component, or that canonicalizes
/// to a location outside the folder (e.g. through a symlink), is reported as
/// not found.
pub async fn resolve_file(folder: &Path, filename: &str) -> Result<PathBuf, StoreError> {
    let not_found = || StoreError::FileNotFound(filename.to_string());

    if !is_plain_name(filename) {
        debug!("Rejected filename {:?}", filename);
        return Err(not_found());
    }

    let canonical_folder = tokio::fs::canonicalize(folder)
        .await
        .map_err(|_| not_found())?;
    let canonical_file = tokio::fs::canonicalize(canonical_folder.join(filename))
        .await
        .map_err(|_| not_found())?;

    if !canonical_file.starts_with(&canonical_folder) {
        debug!("Rejected {:?}: resolves outside {}", filename, canonical_folder.display());
        return Err(not_found());
    }

    match tokio::fs::metadata(&canonical_file).await {
        Ok(meta) if meta.is_file() => Ok(canonical_file),
        _ => Err(not_found()),
    }
}

fn is_plain_name(filename: &str) -> bool {
    if filename.is_empty() || filename.contains(|c: char| matches!(c, '/' | '\\' | '\0')) {
        return false;
    }
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str, body: &[u8]) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_dated_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            dated_filename("delta_ops_summary_", date, ".pdf"),
            "delta_ops_summary_2024-03-07.pdf"
        );
        assert_eq!(dated_filename("", date, ""), "2024-03-07");
    }

    #[tokio::test]
    async fn test_list_sorted_descending_files_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.pdf", b"b");
        touch(dir.path(), "a.pdf", b"a");
        touch(dir.path(), "c.pdf", b"c");
        std::fs::create_dir(dir.path().join("z_subdir")).unwrap();

        let files = list_files(dir.path()).await.unwrap();
        assert_eq!(files, vec!["c.pdf", "b.pdf", "a.pdf"]);
    }

    #[tokio::test]
    async fn test_list_dated_names_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        for day in ["2024-01-31", "2024-02-01", "2023-12-31"] {
            touch(dir.path(), &format!("report_{}.pdf", day), b"x");
        }

        let files = list_files(dir.path()).await.unwrap();
        assert_eq!(
            files,
            vec![
                "report_2024-02-01.pdf",
                "report_2024-01-31.pdf",
                "report_2023-12-31.pdf",
            ]
        );
    }

    #[tokio::test]
    async fn test_list_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = list_files(&missing).await.unwrap_err();
        assert!(matches!(err, StoreError::FolderMissing(_)));
        assert_eq!(err.to_string(), format!("Folder {} does not exist.", missing.display()));
    }

    #[tokio::test]
    async fn test_list_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_files(dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "report.pdf", b"%PDF");

        let path = resolve_file(dir.path(), "report.pdf").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF");
    }

    #[tokio::test]
    async fn test_resolve_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_file(dir.path(), "ghost.pdf").await.unwrap_err();
        assert_eq!(err.to_string(), "File ghost.pdf not found.");
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let root = tempfile::tempdir().unwrap();
        let folder = root.path().join("files");
        std::fs::create_dir(&folder).unwrap();
        touch(root.path(), "secret.txt", b"top secret");
        std::fs::create_dir(folder.join("sub")).unwrap();
        touch(&folder.join("sub"), "x.pdf", b"x");

        for name in ["../secret.txt", "/etc/passwd", "sub/x.pdf", "..", ".", ""] {
            let err = resolve_file(&folder, name).await.unwrap_err();
            assert!(
                matches!(err, StoreError::FileNotFound(ref n) if n == name),
                "{:?} should be refused",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_resolve_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("inner")).unwrap();
        assert!(resolve_file(dir.path(), "inner").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_rejects_symlink_escape() {
        let root = tempfile::tempdir().unwrap();
        let folder = root.path().join("files");
        std::fs::create_dir(&folder).unwrap();
        touch(root.path(), "secret.txt", b"top secret");
        std::os::unix::fs::symlink(root.path().join("secret.txt"), folder.join("link.txt")).unwrap();

        assert!(resolve_file(&folder, "link.txt").await.is_err());
    }
}
