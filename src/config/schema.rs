//! Recognized configuration keys.
//!
//! The dotted-key surface accepts only keys listed here (plus the dynamic
//! `environment:fallback:<variable>` family). Anything else is rejected at
//! apply time, before a run can start.

/// Expected value shape for a configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Boolean toggle
    Bool,
    /// Numeric value, optionally range-checked
    Number,
    /// One of a fixed set of strings
    Choice(&'static [&'static str]),
}

/// Description of one recognized key.
#[derive(Debug, Clone, Copy)]
pub struct KeySpec {
    /// Dotted key name
    pub key: &'static str,
    /// Expected value shape
    pub kind: ValueKind,
    /// Inclusive numeric range, for `ValueKind::Number`
    pub range: Option<(f64, f64)>,
}

/// Prefix of the dynamic fallback-constant key family.
pub const FALLBACK_PREFIX: &str = "environment:fallback:";

/// Recognized coastline actions.
pub const COASTLINE_ACTIONS: &[&str] = &["stranding", "previous"];

/// All statically recognized keys.
pub const KNOWN_KEYS: &[KeySpec] = &[
    KeySpec {
        key: "processes:dispersion",
        kind: ValueKind::Bool,
        range: None,
    },
    KeySpec {
        key: "processes:evaporation",
        kind: ValueKind::Bool,
        range: None,
    },
    KeySpec {
        key: "processes:emulsification",
        kind: ValueKind::Bool,
        range: None,
    },
    KeySpec {
        key: "processes:biodegradation",
        kind: ValueKind::Bool,
        range: None,
    },
    KeySpec {
        key: "drift:vertical_mixing",
        kind: ValueKind::Bool,
        range: None,
    },
    KeySpec {
        key: "vertical_mixing:timestep",
        kind: ValueKind::Number,
        range: Some((0.1, 3600.0)),
    },
    KeySpec {
        key: "drift:current_uncertainty",
        kind: ValueKind::Number,
        range: Some((0.0, 5.0)),
    },
    KeySpec {
        key: "drift:wind_uncertainty",
        kind: ValueKind::Number,
        range: Some((0.0, 20.0)),
    },
    KeySpec {
        key: "general:coastline_action",
        kind: ValueKind::Choice(COASTLINE_ACTIONS),
        range: None,
    },
    KeySpec {
        key: "general:coastline_approximation_precision",
        kind: ValueKind::Number,
        range: Some((1e-5, 1.0)),
    },
    KeySpec {
        key: "seed:wind_drift_factor",
        kind: ValueKind::Number,
        range: Some((0.0, 0.1)),
    },
    KeySpec {
        key: "seed:rng_seed",
        kind: ValueKind::Number,
        range: Some((0.0, 9.007_199_254_740_992e15)),
    },
];

/// Look up a statically recognized key.
pub fn lookup(key: &str) -> Option<&'static KeySpec> {
    KNOWN_KEYS.iter().find(|spec| spec.key == key)
}
