//! Pseudo-class classification used when rewriting selectors for a static snapshot.

/// Pseudo-classes that can never match in a static document snapshot.
/// They are stripped from a selector before it is queried.
const UNMATCHABLE_PSEUDO_CLASSES: &[&str] = &[
    "past",
    "current",
    "future",
    "playing",
    "paused",
    "seeking",
    "buffering",
    "stalled",
    "muted",
    "volume-locked",
    "host-context",
    "host",
    "picture-in-picture",
    "active-view-transition",
    "active-view-transition-type",
    "local-link",
    "blank",
    "-moz-focusring",
    "-moz-ui-invalid",
    "-moz-ui-valid",
    "-webkit-full-screen",
    "-moz-full-screen",
    "-webkit-full-screen-ancestor",
];

/// Pseudo-classes whose result depends on user interaction or runtime state.
/// Selectors using them are never queried and their rules are left untouched.
const DYNAMIC_STATE_PSEUDO_CLASSES: &[&str] = &[
    "hover",
    "active",
    "focus",
    "focus-within",
    "focus-visible",
    "visited",
    "target",
    "target-within",
    "checked",
    "indeterminate",
    "default",
    "invalid",
    "valid",
    "in-range",
    "out-of-range",
    "user-invalid",
    "user-valid",
    "placeholder-shown",
    "autofill",
    "-webkit-autofill",
    "open",
    "closed",
    "popover-open",
    "fullscreen",
    "modal",
    "drop",
    "state",
];

/// True for pseudo-classes stripped by the sanitizer (`:past`, `:playing`, `:host-context()`, ...).
pub fn is_unmatchable_pseudo_class(name: &str) -> bool {
    UNMATCHABLE_PSEUDO_CLASSES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(name))
}

/// True for interaction/runtime-state pseudo-classes (`:hover`, `:focus`, `:visited`, ...).
pub fn is_dynamic_state_pseudo_class(name: &str) -> bool {
    DYNAMIC_STATE_PSEUDO_CLASSES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(name))
}
