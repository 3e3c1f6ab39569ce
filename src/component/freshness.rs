//! Timestamp comparison used by `regenerate` without `--force`.

use super::ArtifactKind;
use std::path::Path;
use std::time::SystemTime;

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// A component is up to date when every generated artifact exists and is
/// strictly newer than `config.json`. A missing schema counts as stale so the
/// caller surfaces the read error.
pub fn is_up_to_date(dir: &Path) -> bool {
    let Some(schema) = modified(&ArtifactKind::Schema.path_in(dir)) else {
        return false;
    };
    ArtifactKind::GENERATED
        .iter()
        .all(|kind| matches!(modified(&kind.path_in(dir)), Some(t) if t > schema))
}
