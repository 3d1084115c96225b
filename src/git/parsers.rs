//! Git output parsers

use super::types::WorkingTreeStatus;
use std::path::PathBuf;

/// Parse `git status --porcelain=v2 --branch` output
pub fn parse_status_output(output: &str) -> WorkingTreeStatus {
    let mut status = WorkingTreeStatus::default();

    for line in output.lines() {
        if let Some(branch_name) = line.strip_prefix("# branch.head ") {
            if branch_name != "(detached)" {
                status.branch = Some(branch_name.to_string());
            }
        } else if line.starts_with("1 ") {
            // 1 <xy> <sub> <mH> <mI> <mW> <hH> <hI> <path>
            if let Some(path) = nth_field_onward(line, 8) {
                status.changed.push(PathBuf::from(path));
            }
        } else if line.starts_with("2 ") {
            // 2 <xy> <sub> <mH> <mI> <mW> <hH> <hI> <X><score> <path><tab><origPath>
            if let Some(paths) = nth_field_onward(line, 9) {
                let path = paths.split('\t').next().unwrap_or(paths);
                status.changed.push(PathBuf::from(path));
            }
        } else if line.starts_with("u ") {
            // u <xy> <sub> <m1> <m2> <m3> <mW> <h1> <h2> <h3> <path>
            if let Some(path) = nth_field_onward(line, 10) {
                status.conflicts.push(PathBuf::from(path));
            }
        } else if let Some(path) = line.strip_prefix("? ") {
            if !path.is_empty() {
                status.untracked.push(PathBuf::from(path));
            }
        }
    }

    status
}

/// Everything from the `n`th space-separated field to the end of the line,
/// so paths containing spaces survive intact.
fn nth_field_onward(line: &str, n: usize) -> Option<&str> {
    line.splitn(n + 1, ' ').nth(n).filter(|rest| !rest.is_empty())
}

/// Split `git for-each-ref --format=%(refname)` output into one full ref
/// name per line; callers strip the `refs/heads/` namespace
pub fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_status() {
        let output = "# branch.oid abc123\n# branch.head develop\n";
        let status = parse_status_output(output);
        assert_eq!(status.branch.as_deref(), Some("develop"));
        assert!(status.is_clean());
    }

    #[test]
    fn test_parse_dirty_status() {
        let output = "\
# branch.oid abc123
# branch.head feature/login
1 .M N... 100644 100644 100644 abc def src/my file.rs
2 R. N... 100644 100644 100644 abc def R100 new.rs\told.rs
u UU N... 100644 100644 100644 100644 a b c conflicted.rs
? notes.txt
";
        let status = parse_status_output(output);
        assert_eq!(status.branch.as_deref(), Some("feature/login"));
        assert_eq!(
            status.changed,
            vec![PathBuf::from("src/my file.rs"), PathBuf::from("new.rs")]
        );
        assert_eq!(status.conflicts, vec![PathBuf::from("conflicted.rs")]);
        assert_eq!(status.untracked, vec![PathBuf::from("notes.txt")]);
        assert!(!status.is_clean());
        assert!(status.has_conflicts());
        assert_eq!(status.dirty_count(), 4);
    }

    #[test]
    fn test_parse_detached_head() {
        let status = parse_status_output("# branch.head (detached)\n");
        assert_eq!(status.branch, None);
    }

    #[test]
    fn test_parse_branch_list() {
        let output = "refs/heads/develop\nrefs/heads/feature/a\n\n";
        assert_eq!(
            parse_branch_list(output),
            vec!["refs/heads/develop", "refs/heads/feature/a"]
        );
        assert!(parse_branch_list("").is_empty());
    }
}
