//! Rule-based commit and pull request text, used when AI generation is disabled or fails.

use crate::ai::parse::{CommitReply, PrReply};
use crate::core::git_status::{FileChange, GitStatus};
use std::path::{Component, Path, PathBuf};

const BUILD_FILES: [&str; 15] = [
    "Cargo.toml",
    "Cargo.lock",
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Makefile",
    "CMakeLists.txt",
    "go.mod",
    "go.sum",
    "pyproject.toml",
    "requirements.txt",
    "build.gradle",
    "pom.xml",
    "Dockerfile",
];

const DOC_EXTENSIONS: [&str; 3] = ["md", "rst", "adoc"];

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

fn is_test(path: &Path) -> bool {
    let name = file_name(path);
    path.components().any(|c| {
        matches!(c, Component::Normal(part) if part == "tests" || part == "test" || part == "__tests__")
    }) || name.starts_with("test_")
        || name.contains("_test.")
        || name.contains(".test.")
        || name.contains(".spec.")
}

fn is_doc(path: &Path) -> bool {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    path.starts_with("docs")
        || DOC_EXTENSIONS.contains(&extension.to_lowercase().as_str())
        || file_name(path).starts_with("LICENSE")
}

fn is_ci(path: &Path) -> bool {
    let name = file_name(path);
    path.starts_with(".github")
        || path.starts_with(".circleci")
        || name == ".gitlab-ci.yml"
        || name == ".travis.yml"
        || name == "Jenkinsfile"
}

fn is_build(path: &Path) -> bool {
    BUILD_FILES.contains(&file_name(path))
}

fn is_source(path: &Path) -> bool {
    !(is_test(path) || is_doc(path) || is_ci(path) || is_build(path))
}

/// Conventional commit type guessed from the changed paths
pub fn infer_commit_type(files: &[FileChange]) -> &'static str {
    if files.is_empty() {
        return "chore";
    }
    let all = |predicate: fn(&Path) -> bool| files.iter().all(|f| predicate(&f.path));

    if all(is_test) {
        "test"
    } else if all(is_doc) {
        "docs"
    } else if all(is_ci) {
        "ci"
    } else if all(is_build) {
        "build"
    } else if files
        .iter()
        .any(|f| f.status == GitStatus::Added && is_source(&f.path))
    {
        "feat"
    } else if files.iter().all(|f| f.status == GitStatus::Deleted) {
        "refactor"
    } else {
        "fix"
    }
}

/// Deepest directory shared by every path, if any
fn common_directory(files: &[FileChange]) -> Option<PathBuf> {
    let mut parents = files.iter().map(|f| f.path.parent().unwrap_or(Path::new("")));
    let first: Vec<Component> = parents.next()?.components().collect();
    let shared = parents.fold(first.len(), |len, parent| {
        first
            .iter()
            .zip(parent.components())
            .take(len)
            .take_while(|(a, b)| *a == b)
            .count()
    });
    let dir: PathBuf = first[..shared].iter().collect();
    (!dir.as_os_str().is_empty()).then_some(dir)
}

fn subject(files: &[FileChange]) -> String {
    match files {
        [] => "update files".to_string(),
        [single] => {
            let verb = match single.status {
                GitStatus::Added | GitStatus::Untracked => "add",
                GitStatus::Deleted => "remove",
                GitStatus::Renamed => "rename to",
                _ => "update",
            };
            format!("{verb} {}", single.path.display())
        }
        many => match common_directory(many) {
            Some(dir) => format!("update {} files in {}", many.len(), dir.display()),
            None => format!("update {} files", many.len()),
        },
    }
}

/// Commit text built from file paths and statuses alone
pub fn heuristic_commit(files: &[FileChange]) -> CommitReply {
    CommitReply {
        commit_type: Some(infer_commit_type(files).to_string()),
        scope: None,
        message: subject(files),
        body: None,
        branch_desc: None,
    }
}

/// `feature/add-toolbar` -> `Add toolbar`
pub fn title_from_branch(branch: &str) -> String {
    let name = branch.rsplit('/').next().unwrap_or(branch);
    let words = name.replace(['-', '_'], " ");
    let words = words.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => branch.to_string(),
    }
}

/// Pull request text from the branch name and `<hash> <subject>` commit lines
pub fn heuristic_pr(branch: &str, commits: &[String]) -> PrReply {
    let body = if commits.is_empty() {
        "## Changes\n\nNo commits yet.".to_string()
    } else {
        let items: Vec<String> = commits
            .iter()
            .map(|line| {
                let subject = line.split_once(' ').map_or(line.as_str(), |(_, s)| s);
                format!("- {subject}")
            })
            .collect();
        format!("## Changes\n\n{}", items.join("\n"))
    };

    PrReply {
        title: title_from_branch(branch),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(status: GitStatus, path: &str) -> FileChange {
        FileChange {
            status,
            path: PathBuf::from(path),
            staged: true,
        }
    }

    #[test]
    fn test_only_tests_is_test() {
        let files = vec![
            change(GitStatus::Modified, "tests/cli.rs"),
            change(GitStatus::Added, "src/parser_test.go"),
        ];
        assert_eq!(infer_commit_type(&files), "test");
    }

    #[test]
    fn test_only_markdown_is_docs() {
        let files = vec![
            change(GitStatus::Modified, "README.md"),
            change(GitStatus::Added, "docs/guide.md"),
        ];
        assert_eq!(infer_commit_type(&files), "docs");
    }

    #[test]
    fn test_ci_and_build() {
        assert_eq!(
            infer_commit_type(&[change(GitStatus::Modified, ".github/workflows/ci.yml")]),
            "ci"
        );
        assert_eq!(
            infer_commit_type(&[
                change(GitStatus::Modified, "Cargo.toml"),
                change(GitStatus::Modified, "Cargo.lock")
            ]),
            "build"
        );
    }

    #[test]
    fn test_added_source_is_feat() {
        let files = vec![
            change(GitStatus::Added, "src/toolbar.rs"),
            change(GitStatus::Modified, "src/lib.rs"),
        ];
        assert_eq!(infer_commit_type(&files), "feat");
    }

    #[test]
    fn test_deletions_only_is_refactor() {
        let files = vec![
            change(GitStatus::Deleted, "src/old.rs"),
            change(GitStatus::Deleted, "src/older.rs"),
        ];
        assert_eq!(infer_commit_type(&files), "refactor");
    }

    #[test]
    fn test_modified_source_is_fix() {
        assert_eq!(infer_commit_type(&[change(GitStatus::Modified, "src/lib.rs")]), "fix");
    }

    #[test]
    fn test_subject() {
        let one = heuristic_commit(&[change(GitStatus::Added, "src/toolbar.rs")]);
        assert_eq!(one.to_message("conventional"), "feat: add src/toolbar.rs");

        let many = heuristic_commit(&[
            change(GitStatus::Modified, "src/core/a.rs"),
            change(GitStatus::Modified, "src/core/b.rs"),
            change(GitStatus::Modified, "src/core/sub/c.rs"),
        ]);
        assert_eq!(many.message, "update 3 files in src/core");

        let spread = heuristic_commit(&[
            change(GitStatus::Modified, "a.rs"),
            change(GitStatus::Modified, "src/b.rs"),
        ]);
        assert_eq!(spread.message, "update 2 files");
    }

    #[test]
    fn test_title_from_branch() {
        assert_eq!(title_from_branch("feature/add-toolbar"), "Add toolbar");
        assert_eq!(title_from_branch("fix_login__bug"), "Fix login bug");
        assert_eq!(title_from_branch("main"), "Main");
    }

    #[test]
    fn test_heuristic_pr_body() {
        let pr = heuristic_pr(
            "feature/x",
            &["a1b2c3d feat: add x".to_string(), "b2c3d4e fix: y".to_string()],
        );
        assert_eq!(pr.title, "X");
        assert_eq!(pr.body, "## Changes\n\n- feat: add x\n- fix: y");
        assert!(heuristic_pr("b", &[]).body.contains("No commits yet"));
    }
}
