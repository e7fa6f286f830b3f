//! An in-memory project wired to a [`Stylable`] instance.

use std::path::PathBuf;
use std::rc::Rc;

use stylable::{
    FileSystem, MemoryFileSystem, Meta, Stylable, StylableConfig, StylableResults,
    VerbatimNamespace,
};

/// Project root every fixture path is relative to.
pub const ROOT: &str = "/p";

pub struct Project {
    pub fs: Rc<MemoryFileSystem>,
    pub stylable: Stylable,
}

impl Project {
    /// Files are `(relative path, source)` pairs; namespaces are the file stems.
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self::with_config(files, |config| config)
    }

    pub fn with_config(
        files: &[(&str, &str)],
        configure: impl FnOnce(StylableConfig) -> StylableConfig,
    ) -> Self {
        let fs = Rc::new(MemoryFileSystem::with_files(
            files.iter().map(|(name, source)| (path(name), *source)),
        ));
        let file_system: Rc<dyn FileSystem> = fs.clone();
        let config = StylableConfig::new(ROOT)
            .with_namespace_resolver(VerbatimNamespace)
            .with_file_system(file_system);
        let stylable = Stylable::new(configure(config));
        Self { fs, stylable }
    }

    pub fn transform(&self, name: &str) -> StylableResults {
        self.stylable
            .transform(name)
            .unwrap_or_else(|error| panic!("transform of {name} failed: {error}"))
    }

    pub fn process(&self, name: &str) -> Rc<Meta> {
        self.stylable
            .process(name)
            .unwrap_or_else(|error| panic!("processing {name} failed: {error}"))
    }

    pub fn write(&self, name: &str, source: &str) {
        self.fs.write(path(name), source);
    }

    pub fn touch(&self, name: &str) {
        self.fs.touch(path(name));
    }
}

/// Absolute path of a fixture file.
pub fn path(name: &str) -> PathBuf {
    PathBuf::from(ROOT).join(name)
}
