//! Pseudo-element resolution codes and the native pseudo-element list.

pub mod codes {
    pub const UNKNOWN_PSEUDO_ELEMENT: &str = "ST1401";

    pub const ALL: &[&str] = &[UNKNOWN_PSEUDO_ELEMENT];
}

pub const NATIVE_PSEUDO_ELEMENTS: &[&str] = &[
    "after",
    "backdrop",
    "before",
    "cue",
    "cue-region",
    "file-selector-button",
    "first-letter",
    "first-line",
    "grammar-error",
    "highlight",
    "marker",
    "part",
    "placeholder",
    "selection",
    "slotted",
    "spelling-error",
    "target-text",
    "view-transition",
    "view-transition-group",
    "view-transition-image-pair",
    "view-transition-new",
    "view-transition-old",
];

pub fn is_native_pseudo_element(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with("-webkit-")
        || lower.starts_with("-moz-")
        || lower.starts_with("-ms-")
        || NATIVE_PSEUDO_ELEMENTS.contains(&lower.as_str())
}
