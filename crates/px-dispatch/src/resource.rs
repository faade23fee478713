use tempfile::TempDir;

/// The top-level orchestrator's resource scope: owns every temporary directory allocated for a
/// single invocation (e.g. an ad hoc [`px_cache::Cache`] when the caller didn't configure a
/// persistent one) and releases them by ordinary `Drop`, not an at-exit hook.
///
/// Replaces a global, process-wide cleanup registry: scoping cleanup to an object the caller
/// owns means cleanup happens deterministically when the pipeline run ends, regardless of how it
/// ends, and without the cross-platform hazards of relying on process-exit hooks.
#[derive(Default)]
pub struct ResourceScope {
    temp_dirs: Vec<TempDir>,
}

impl ResourceScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a temporary directory, keeping it alive for the scope's lifetime.
    pub fn adopt(&mut self, dir: TempDir) {
        self.temp_dirs.push(dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adopted_dir_survives_until_scope_drops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();
        let mut scope = ResourceScope::new();
        scope.adopt(dir);
        assert!(path.exists());
        drop(scope);
        assert!(!path.exists());
    }
}
