//! Stylesheet sources reused across suites.

/// A component with a root, a part and two states.
pub const BUTTON: &str = "\
.root { -st-states: pressed, size(enum(small, large)); }
.label { color: black; }
";

/// Vars and a keyframes animation shared by a theme.
pub const THEME: &str = "\
:vars { base: red; accent: value(base); }
@keyframes fade { from { opacity: 0; } }
.panel { color: value(accent); }
";

/// `:import` of the button's default export plus one named part.
pub const IMPORT_BUTTON: &str =
    ":import { -st-from: './button.st.css'; -st-default: Button; -st-named: label; }";

/// `:import` of the theme's vars.
pub const IMPORT_THEME: &str =
    ":import { -st-from: './theme.st.css'; -st-named: accent, keyframes(fade); }";
