//! The export map handed to application code.

use std::path::PathBuf;
use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::error::Result;
use crate::semantic::Meta;
use crate::semantic::features::classes::codes as class_codes;
use crate::semantic::features::states::{boolean_state_class, param_state_class};
use crate::semantic::symbols::SymbolNamespace;

use super::Transformer;

/// Public names of one stylesheet after transformation, keyed by the
/// authored local name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StylableExports {
    pub namespace: String,
    /// Scoped class name followed by every class it composes.
    pub classes: IndexMap<String, String>,
    pub keyframes: IndexMap<String, String>,
    /// Custom properties, keyed without the leading `--`.
    pub vars: IndexMap<String, String>,
    /// Evaluated `:vars` values.
    pub st_vars: IndexMap<String, String>,
    pub layers: IndexMap<String, String>,
    pub containers: IndexMap<String, String>,
}

impl StylableExports {
    /// Class attribute value for `class` in the given states. A state with
    /// a value is a parameterized state, one without is boolean.
    ///
    /// ```
    /// # use stylable::StylableExports;
    /// let mut exports = StylableExports::default();
    /// exports.namespace = "btn".into();
    /// exports.classes.insert("root".into(), "btn__root".into());
    /// assert_eq!(exports.cx("root", &[("active", None)]), "btn__root btn--active");
    /// ```
    pub fn cx(&self, class: &str, states: &[(&str, Option<&str>)]) -> String {
        let mut names: Vec<String> = vec![
            self.classes
                .get(class)
                .cloned()
                .unwrap_or_else(|| class.to_string()),
        ];
        for (state, value) in states {
            names.push(match value {
                Some(value) => param_state_class(&self.namespace, state, value),
                None => boolean_state_class(&self.namespace, state),
            });
        }
        names.join(" ")
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Transformer<'_> {
    pub(super) fn exports(&mut self) -> Result<StylableExports> {
        let meta = Rc::clone(&self.meta);
        let mut exports = StylableExports {
            namespace: meta.namespace.clone(),
            ..StylableExports::default()
        };

        let classes: Vec<(SmolStr, TextRange)> = meta
            .symbols
            .classes()
            .map(|class| (class.name.clone(), class.range))
            .collect();
        for (name, range) in classes {
            let mut visiting = Vec::new();
            let names = self.class_export(&meta, &name, range, &mut visiting)?;
            if !names.is_empty() {
                exports.classes.insert(name.to_string(), names.join(" "));
            }
        }

        for (namespace, map) in [
            (SymbolNamespace::Keyframes, &mut exports.keyframes),
            (SymbolNamespace::Layer, &mut exports.layers),
            (SymbolNamespace::Container, &mut exports.containers),
        ] {
            let names: Vec<(SmolStr, TextRange)> = meta
                .symbols
                .named_symbols(namespace)
                .map(|symbol| (symbol.name.clone(), symbol.range))
                .collect();
            for (name, range) in names {
                if let Some(scoped) = self.scoped_symbol_name(&meta, namespace, &name, range)? {
                    map.insert(name.to_string(), scoped);
                }
            }
        }

        let properties: Vec<(SmolStr, TextRange)> = meta
            .symbols
            .named_symbols(SymbolNamespace::CustomProperty)
            .map(|symbol| (symbol.name.clone(), symbol.range))
            .collect();
        for (name, range) in properties {
            let scoped = self.custom_property_name(&meta, &name, range)?;
            let key = name.strip_prefix("--").unwrap_or(&name);
            exports.vars.insert(key.to_string(), scoped);
        }

        let vars: Vec<(SmolStr, TextRange)> = meta
            .symbols
            .vars()
            .map(|var| (var.name.clone(), var.range))
            .collect();
        for (name, range) in vars {
            if let Some(value) = self.evaluated_var(&name, range)? {
                exports.st_vars.insert(name.to_string(), value);
            }
        }
        Ok(exports)
    }

    /// Scoped name of class `name` followed by its `-st-compose` closure,
    /// without duplicates, dependencies after dependents. `-st-extends`
    /// only affects selectors and never adds names here.
    fn class_export(
        &mut self,
        meta: &Rc<Meta>,
        name: &str,
        range: TextRange,
        visiting: &mut Vec<(PathBuf, SmolStr)>,
    ) -> Result<Vec<String>> {
        let Some(origin) = self.resolver.resolve_symbol(meta, SymbolNamespace::Main, name)? else {
            return Ok(Vec::new());
        };
        let Some(class) = origin.class().cloned() else {
            return Ok(Vec::new());
        };

        let own = match &class.global {
            Some(global) => global
                .iter()
                .flat_map(|selector| selector.class_names())
                .map(|name| name.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            None => self.scoped_name(&origin.meta.namespace, &class.name),
        };
        let mut names = vec![own];

        let key = (origin.meta.source.clone(), class.name.clone());
        if visiting.contains(&key) {
            self.diagnostics.warning(
                class_codes::CIRCULAR_COMPOSE,
                range,
                format!("circular -st-compose through \"{}\"", class.name),
            );
            return Ok(names);
        }
        visiting.push(key);
        for composed in &class.compose {
            for composed_name in self.class_export(&origin.meta, composed, range, visiting)? {
                if !names.contains(&composed_name) {
                    names.push(composed_name);
                }
            }
        }
        visiting.pop();
        Ok(names)
    }
}
