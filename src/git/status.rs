//! Parsing of `git status --porcelain` (v1) output.

/// One line of porcelain status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Index status column.
    pub index: char,
    /// Work-tree status column.
    pub worktree: char,
    pub path: String,
}

impl StatusEntry {
    /// Unmerged paths, per the conflict table in git-status(1).
    pub fn is_conflicted(&self) -> bool {
        matches!(
            (self.index, self.worktree),
            ('D', 'D') | ('A', 'U') | ('U', 'D') | ('U', 'A') | ('D', 'U') | ('A', 'A') | ('U', 'U')
        )
    }
}

/// Parse porcelain output, skipping lines too short to carry a status.
pub fn parse_porcelain(output: &str) -> Vec<StatusEntry> {
    output
        .lines()
        .filter_map(|line| {
            let mut chars = line.chars();
            let index = chars.next()?;
            let worktree = chars.next()?;
            let path = chars.as_str().trim();
            if path.is_empty() {
                return None;
            }
            // Renames are reported as "old -> new"
            let path = path.rsplit(" -> ").next().unwrap_or(path);
            Some(StatusEntry {
                index,
                worktree,
                path: path.trim_matches('"').to_string(),
            })
        })
        .collect()
}

/// Paths with unresolved merge conflicts.
pub fn conflicted_paths(entries: &[StatusEntry]) -> Vec<&str> {
    entries
        .iter()
        .filter(|e| e.is_conflicted())
        .map(|e| e.path.as_str())
        .collect()
}
