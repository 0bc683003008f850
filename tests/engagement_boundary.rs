use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        if let Ok(read_dir) = fs::read_dir(&dir) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
                    files.push(path);
                }
            }
        }
    }
    files
}

fn file_contains(path: &Path, needle: &str) -> bool {
    fs::read_to_string(path)
        .map(|c| c.contains(needle))
        .unwrap_or(false)
}

fn src_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src")
}

/// Like and comment writes must stay inside the engagement repositories so
/// the unique-pair conflict mapping is the only create path.
#[test]
fn engagement_writes_confined_to_their_repositories() {
    let allowed = ["db/likes.rs", "db/comments.rs", "db/schema.rs"];
    let needles = [
        "INSERT INTO blog_likes",
        "INSERT INTO workout_likes",
        "INSERT INTO blog_comments",
        "INSERT INTO workout_comments",
    ];

    let mut offenders = Vec::new();
    for file in collect_rs_files(&src_root()) {
        let path_str = file.to_string_lossy().replace('\\', "/");
        if allowed.iter().any(|a| path_str.ends_with(a)) {
            continue;
        }
        for needle in &needles {
            if file_contains(&file, needle) {
                offenders.push(format!("{path_str}: {needle}"));
            }
        }
    }

    if !offenders.is_empty() {
        panic!(
            "Engagement tables must only be written by their repositories. Offenders: {:?}",
            offenders
        );
    }
}

/// Follow edges are only created through the follows repository, where the
/// self-follow and duplicate rules are enforced.
#[test]
fn follow_writes_confined_to_follows_repository() {
    let allowed = ["db/follows.rs", "db/schema.rs"];

    let mut offenders = Vec::new();
    for file in collect_rs_files(&src_root()) {
        let path_str = file.to_string_lossy().replace('\\', "/");
        if allowed.iter().any(|a| path_str.ends_with(a)) {
            continue;
        }
        if file_contains(&file, "INSERT INTO follows") || file_contains(&file, "DELETE FROM follows")
        {
            offenders.push(path_str.to_string());
        }
    }

    if !offenders.is_empty() {
        panic!(
            "Follow edges must only be written by the follows repository. Offenders: {:?}",
            offenders
        );
    }
}

/// Engagement counts are derived per request; no handler or repository may
/// keep a stored counter column.
#[test]
fn no_stored_engagement_counters() {
    let mut offenders = Vec::new();
    for file in collect_rs_files(&src_root()) {
        let path_str = file.to_string_lossy().replace('\\', "/");
        if file_contains(&file, "likes_count = likes_count")
            || file_contains(&file, "SET blog_likes_count")
            || file_contains(&file, "SET workout_likes_count")
        {
            offenders.push(path_str.to_string());
        }
    }

    if !offenders.is_empty() {
        panic!(
            "Engagement counts must be computed live, never stored. Offenders: {:?}",
            offenders
        );
    }
}
