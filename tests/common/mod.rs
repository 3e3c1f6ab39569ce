#![allow(dead_code)]

pub mod project {
    use block_factory::component::create_component;
    use block_factory::config::FactoryConfig;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Scratch project with default layout rooted in a temp dir
    pub fn temp_project() -> (TempDir, FactoryConfig) {
        let root = tempfile::tempdir().expect("create temp dir");
        let config = FactoryConfig::for_root(root.path());
        (root, config)
    }

    /// Scratch project with one scaffolded component
    pub fn with_component(name: &str) -> (TempDir, FactoryConfig, String) {
        let (root, config) = temp_project();
        let report = create_component(&config, name, None).expect("create component");
        (root, config, report.slug)
    }

    pub fn artifact(config: &FactoryConfig, slug: &str, file: &str) -> PathBuf {
        config.component_dir(slug).join(file)
    }

    pub fn read(config: &FactoryConfig, slug: &str, file: &str) -> String {
        std::fs::read_to_string(artifact(config, slug, file))
            .unwrap_or_else(|e| panic!("read {file}: {e}"))
    }

    /// Load a schema fixture from `tests/schemas/`
    pub fn fixture(name: &str) -> String {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("schemas")
            .join(name);
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
    }

    /// Push the mtime of a file into the past
    pub fn age(path: &Path, secs: u64) {
        let at = std::time::SystemTime::now() - std::time::Duration::from_secs(secs);
        let file = std::fs::File::options()
            .write(true)
            .open(path)
            .expect("open for set_times");
        file.set_times(std::fs::FileTimes::new().set_modified(at))
            .expect("set mtime");
    }
}
