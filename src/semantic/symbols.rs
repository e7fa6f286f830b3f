//! Symbols declared by one stylesheet and the table that holds them.
//!
//! Names are unique per [`SymbolNamespace`]: classes, `:vars` and imports
//! share the main namespace, while elements, keyframes, layers, containers,
//! custom properties and custom selectors each have their own. References
//! to other symbols (`-st-extends`, `-st-compose`, aliases of imports) are
//! stored by name and resolved later, across files, by the resolver.

use indexmap::IndexMap;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::parser::SelectorList;

/// Which table a symbol lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolNamespace {
    Main,
    Element,
    Keyframes,
    Layer,
    Container,
    CustomProperty,
    CustomSelector,
}

impl SymbolNamespace {
    pub const ALL: [SymbolNamespace; 7] = [
        SymbolNamespace::Main,
        SymbolNamespace::Element,
        SymbolNamespace::Keyframes,
        SymbolNamespace::Layer,
        SymbolNamespace::Container,
        SymbolNamespace::CustomProperty,
        SymbolNamespace::CustomSelector,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// What an import binds: the target's default export (its root class) or
/// a named symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportedName {
    Default,
    Named(SmolStr),
}

/// Pointer into [`Meta::imports`](super::Meta::imports) plus the imported name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportRef {
    pub import: usize,
    pub imported: ImportedName,
}

/// Type of a parameterized pseudo-state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateParamType {
    String,
    Number,
    Enum(Vec<String>),
}

/// A pseudo-state definition from `-st-states`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateDef {
    /// `name`
    Boolean,
    /// `name(string)`, `name(number) 0`, `name(enum(a, b)) a`
    Param {
        ty: StateParamType,
        default: Option<String>,
    },
    /// `name(".selector")`: usages are replaced by the selector.
    Mapped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSymbol {
    pub name: SmolStr,
    pub states: IndexMap<SmolStr, StateDef>,
    pub extends: Option<SmolStr>,
    /// Selector from `-st-global`, emitted instead of the scoped class.
    pub global: Option<SelectorList>,
    pub compose: Vec<SmolStr>,
    /// Set when the class name matches an import; the class stands for it.
    pub alias: Option<ImportRef>,
    pub range: TextRange,
}

impl ClassSymbol {
    pub fn new(name: impl Into<SmolStr>, range: TextRange) -> Self {
        Self {
            name: name.into(),
            states: IndexMap::new(),
            extends: None,
            global: None,
            compose: Vec::new(),
            alias: None,
            range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSymbol {
    pub name: SmolStr,
    pub alias: Option<ImportRef>,
    pub range: TextRange,
}

/// A `:vars` build variable. `value` is the authored text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSymbol {
    pub name: SmolStr,
    pub value: String,
    pub range: TextRange,
}

/// Shared shape of keyframes, layers and containers: a scoped name that can
/// be global or imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSymbol {
    pub name: SmolStr,
    pub global: bool,
    pub import: Option<ImportRef>,
    pub range: TextRange,
}

impl NamedSymbol {
    pub fn local(name: impl Into<SmolStr>, global: bool, range: TextRange) -> Self {
        Self {
            name: name.into(),
            global,
            import: None,
            range,
        }
    }

    pub fn imported(name: impl Into<SmolStr>, import: ImportRef, range: TextRange) -> Self {
        Self {
            name: name.into(),
            global: false,
            import: Some(import),
            range,
        }
    }
}

/// `@custom-selector :--name <selector-list>`; `name` excludes `:--`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSelectorSymbol {
    pub name: SmolStr,
    pub selector: SelectorList,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSymbol {
    pub name: SmolStr,
    pub reference: ImportRef,
    pub range: TextRange,
}

/// A named entity declared in one stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Class(ClassSymbol),
    Element(ElementSymbol),
    Var(VarSymbol),
    Keyframes(NamedSymbol),
    Layer(NamedSymbol),
    Container(NamedSymbol),
    /// Name includes the leading `--`.
    CustomProperty(NamedSymbol),
    CustomSelector(CustomSelectorSymbol),
    Import(ImportSymbol),
}

impl Symbol {
    pub fn name(&self) -> &SmolStr {
        match self {
            Symbol::Class(symbol) => &symbol.name,
            Symbol::Element(symbol) => &symbol.name,
            Symbol::Var(symbol) => &symbol.name,
            Symbol::Keyframes(symbol)
            | Symbol::Layer(symbol)
            | Symbol::Container(symbol)
            | Symbol::CustomProperty(symbol) => &symbol.name,
            Symbol::CustomSelector(symbol) => &symbol.name,
            Symbol::Import(symbol) => &symbol.name,
        }
    }

    pub fn namespace(&self) -> SymbolNamespace {
        match self {
            Symbol::Class(_) | Symbol::Var(_) | Symbol::Import(_) => SymbolNamespace::Main,
            Symbol::Element(_) => SymbolNamespace::Element,
            Symbol::Keyframes(_) => SymbolNamespace::Keyframes,
            Symbol::Layer(_) => SymbolNamespace::Layer,
            Symbol::Container(_) => SymbolNamespace::Container,
            Symbol::CustomProperty(_) => SymbolNamespace::CustomProperty,
            Symbol::CustomSelector(_) => SymbolNamespace::CustomSelector,
        }
    }

    /// Human readable kind for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Symbol::Class(_) => "class",
            Symbol::Element(_) => "element",
            Symbol::Var(_) => "var",
            Symbol::Keyframes(_) => "keyframes",
            Symbol::Layer(_) => "layer",
            Symbol::Container(_) => "container",
            Symbol::CustomProperty(_) => "custom property",
            Symbol::CustomSelector(_) => "custom selector",
            Symbol::Import(_) => "import",
        }
    }

    pub fn range(&self) -> TextRange {
        match self {
            Symbol::Class(symbol) => symbol.range,
            Symbol::Element(symbol) => symbol.range,
            Symbol::Var(symbol) => symbol.range,
            Symbol::Keyframes(symbol)
            | Symbol::Layer(symbol)
            | Symbol::Container(symbol)
            | Symbol::CustomProperty(symbol) => symbol.range,
            Symbol::CustomSelector(symbol) => symbol.range,
            Symbol::Import(symbol) => symbol.range,
        }
    }

    /// The import this symbol stands for, if any.
    pub fn import_ref(&self) -> Option<&ImportRef> {
        match self {
            Symbol::Class(symbol) => symbol.alias.as_ref(),
            Symbol::Element(symbol) => symbol.alias.as_ref(),
            Symbol::Keyframes(symbol)
            | Symbol::Layer(symbol)
            | Symbol::Container(symbol)
            | Symbol::CustomProperty(symbol) => symbol.import.as_ref(),
            Symbol::Import(symbol) => Some(&symbol.reference),
            Symbol::Var(_) | Symbol::CustomSelector(_) => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassSymbol> {
        match self {
            Symbol::Class(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_named(&self) -> Option<&NamedSymbol> {
        match self {
            Symbol::Keyframes(symbol)
            | Symbol::Layer(symbol)
            | Symbol::Container(symbol)
            | Symbol::CustomProperty(symbol) => Some(symbol),
            _ => None,
        }
    }
}

// ============================================================================
// SYMBOL TABLE
// ============================================================================

/// Ordered symbol tables of one stylesheet, one per [`SymbolNamespace`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    tables: [IndexMap<SmolStr, Symbol>; 7],
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a symbol, returning the one it replaced.
    pub fn insert(&mut self, symbol: Symbol) -> Option<Symbol> {
        let name = symbol.name().clone();
        self.tables[symbol.namespace().index()].insert(name, symbol)
    }

    pub fn get(&self, namespace: SymbolNamespace, name: &str) -> Option<&Symbol> {
        self.tables[namespace.index()].get(name)
    }

    pub fn get_mut(&mut self, namespace: SymbolNamespace, name: &str) -> Option<&mut Symbol> {
        self.tables[namespace.index()].get_mut(name)
    }

    pub fn contains(&self, namespace: SymbolNamespace, name: &str) -> bool {
        self.tables[namespace.index()].contains_key(name)
    }

    pub fn iter(&self, namespace: SymbolNamespace) -> impl Iterator<Item = &Symbol> {
        self.tables[namespace.index()].values()
    }

    pub fn len(&self) -> usize {
        self.tables.iter().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(IndexMap::is_empty)
    }

    pub fn class(&self, name: &str) -> Option<&ClassSymbol> {
        match self.get(SymbolNamespace::Main, name) {
            Some(Symbol::Class(symbol)) => Some(symbol),
            _ => None,
        }
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut ClassSymbol> {
        match self.get_mut(SymbolNamespace::Main, name) {
            Some(Symbol::Class(symbol)) => Some(symbol),
            _ => None,
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassSymbol> {
        self.iter(SymbolNamespace::Main).filter_map(Symbol::as_class)
    }

    pub fn element(&self, name: &str) -> Option<&ElementSymbol> {
        match self.get(SymbolNamespace::Element, name) {
            Some(Symbol::Element(symbol)) => Some(symbol),
            _ => None,
        }
    }

    pub fn var(&self, name: &str) -> Option<&VarSymbol> {
        match self.get(SymbolNamespace::Main, name) {
            Some(Symbol::Var(symbol)) => Some(symbol),
            _ => None,
        }
    }

    pub fn vars(&self) -> impl Iterator<Item = &VarSymbol> {
        self.iter(SymbolNamespace::Main).filter_map(|symbol| match symbol {
            Symbol::Var(var) => Some(var),
            _ => None,
        })
    }

    pub fn import(&self, name: &str) -> Option<&ImportSymbol> {
        match self.get(SymbolNamespace::Main, name) {
            Some(Symbol::Import(symbol)) => Some(symbol),
            _ => None,
        }
    }

    /// Keyframes, layer, container or custom property symbol.
    pub fn named(&self, namespace: SymbolNamespace, name: &str) -> Option<&NamedSymbol> {
        self.get(namespace, name).and_then(Symbol::as_named)
    }

    pub fn named_symbols(&self, namespace: SymbolNamespace) -> impl Iterator<Item = &NamedSymbol> {
        self.iter(namespace).filter_map(Symbol::as_named)
    }

    pub fn custom_selector(&self, name: &str) -> Option<&CustomSelectorSymbol> {
        match self.get(SymbolNamespace::CustomSelector, name) {
            Some(Symbol::CustomSelector(symbol)) => Some(symbol),
            _ => None,
        }
    }
}
