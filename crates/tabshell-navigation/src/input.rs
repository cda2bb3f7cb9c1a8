//! Navigation bar input resolution

use tabshell_storage::RenameMap;

#[derive(Debug, Clone)]
pub struct InputResolver {
    renames: RenameMap,
}

impl InputResolver {
    pub fn new(renames: RenameMap) -> Self {
        Self { renames }
    }

    pub fn renames(&self) -> &RenameMap {
        &self.renames
    }

    /// Where the engine should go for text submitted in the navigation bar.
    ///
    /// Returns `None` for blank input. Lookup is exact: the text is not
    /// trimmed or case-folded before matching, and unmatched text is returned
    /// verbatim for the engine to interpret.
    pub fn resolve_submission(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }

        let target = self.renames.resolve(text);
        if target != text {
            tracing::debug!(input = %text, target = %target, "Submission renamed");
        }
        Some(target)
    }

    /// What the navigation bar shows for a URL reported by the engine.
    pub fn display_for(&self, url: &str) -> String {
        self.renames.display_name(url)
    }

    /// URL to reopen for a name previously produced by `display_for`.
    ///
    /// Returns `None` for blank names.
    pub fn target_for_display(&self, display: &str) -> Option<String> {
        if display.trim().is_empty() {
            return None;
        }
        Some(self.renames.target_for(display))
    }
}
