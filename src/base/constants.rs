//! Domain constants.

/// Extension of a Stylable stylesheet.
pub const STYLESHEET_EXTENSION: &str = ".st.css";

/// Extension of a plain (native) stylesheet.
pub const CSS_EXTENSION: &str = ".css";

/// Name of the implicit root class every stylesheet declares.
pub const ROOT_CLASS: &str = "root";

/// Default delimiter between a namespace and a scoped local name.
pub const DEFAULT_DELIMITER: &str = "__";

/// Separator between a namespace and a boolean state name.
pub const BOOLEAN_STATE_DELIMITER: &str = "--";

/// Separator between a namespace and a parameterized state name.
pub const PARAM_STATE_DELIMITER: &str = "---";

/// Comment directive that redirects the namespace origin path.
pub const NAMESPACE_REFERENCE_DIRECTIVE: &str = "st-namespace-reference";
