//! Compiler configuration.

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::base::constants::DEFAULT_DELIMITER;
use crate::custom_values::CustomValueTypes;
use crate::namespace::{HashNamespace, NamespaceResolver};
use crate::resolver::{
    ExternalModules, FileSystem, ModuleResolver, NodeModuleResolver, RealFileSystem,
};

/// Output flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Production,
    /// Keeps the authored selector as a comment before each scoped rule.
    Development,
}

/// Everything a [`Stylable`](crate::Stylable) instance is built from.
pub struct StylableConfig {
    pub project_root: PathBuf,
    pub mode: Mode,
    /// Between a namespace and a local name (`ns__name`).
    pub delimiter: String,
    pub namespace_resolver: Rc<dyn NamespaceResolver>,
    pub module_resolver: Rc<dyn ModuleResolver>,
    pub file_system: Rc<dyn FileSystem>,
    pub external_modules: Rc<ExternalModules>,
    pub custom_values: CustomValueTypes,
}

impl StylableConfig {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            mode: Mode::default(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            namespace_resolver: Rc::new(HashNamespace),
            module_resolver: Rc::new(NodeModuleResolver),
            file_system: Rc::new(RealFileSystem),
            external_modules: Rc::new(ExternalModules::new()),
            custom_values: CustomValueTypes::new(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_namespace_resolver(mut self, resolver: impl NamespaceResolver + 'static) -> Self {
        self.namespace_resolver = Rc::new(resolver);
        self
    }

    pub fn with_module_resolver(mut self, resolver: impl ModuleResolver + 'static) -> Self {
        self.module_resolver = Rc::new(resolver);
        self
    }

    pub fn with_file_system(mut self, file_system: Rc<dyn FileSystem>) -> Self {
        self.file_system = file_system;
        self
    }

    pub fn with_external_modules(mut self, modules: ExternalModules) -> Self {
        self.external_modules = Rc::new(modules);
        self
    }

    pub fn with_custom_values(mut self, custom_values: CustomValueTypes) -> Self {
        self.custom_values = custom_values;
        self
    }
}

impl Default for StylableConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl fmt::Debug for StylableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StylableConfig")
            .field("project_root", &self.project_root)
            .field("mode", &self.mode)
            .field("delimiter", &self.delimiter)
            .field("external_modules", &self.external_modules)
            .field("custom_values", &self.custom_values)
            .finish_non_exhaustive()
    }
}
