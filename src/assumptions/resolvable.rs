//! Values that are either system-computed or overridden by the user
//!
//! Scenario files carry these as `{ "mode": "auto" | "manual", "auto": x, "manual": y }`
//! or as a bare number. Either form collapses to a [`Resolvable`] on load.

use serde::{Deserialize, Serialize};

/// A value that may be system-computed (`Auto`) or user-supplied (`Manual`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "ResolvableWire<T>",
    into = "ResolvableWire<T>",
    bound(
        serialize = "T: Serialize + Clone",
        deserialize = "T: Deserialize<'de> + Default"
    )
)]
pub enum Resolvable<T> {
    Auto(T),
    Manual(T),
}

impl<T: Copy> Resolvable<T> {
    /// The effective value
    pub fn resolve(&self) -> T {
        match self {
            Resolvable::Auto(value) | Resolvable::Manual(value) => *value,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Resolvable::Manual(_))
    }
}

/// Resolve an optional value, falling back to `default` when it is absent
pub fn resolve_or<T: Copy>(value: Option<&Resolvable<T>>, default: T) -> T {
    value.map(Resolvable::resolve).unwrap_or(default)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OverrideMode {
    Auto,
    Manual,
}

/// On-disk shape of a resolvable value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged, bound(deserialize = "T: Deserialize<'de> + Default"))]
enum ResolvableWire<T> {
    Bare(T),
    Triplet {
        mode: OverrideMode,
        #[serde(default)]
        auto: T,
        #[serde(default)]
        manual: Option<T>,
    },
}

impl<T> From<ResolvableWire<T>> for Resolvable<T> {
    fn from(wire: ResolvableWire<T>) -> Self {
        match wire {
            ResolvableWire::Bare(value) => Resolvable::Auto(value),
            // A manual mode without a manual value falls back to the computed one
            ResolvableWire::Triplet {
                mode: OverrideMode::Manual,
                manual: Some(manual),
                ..
            } => Resolvable::Manual(manual),
            ResolvableWire::Triplet { auto, .. } => Resolvable::Auto(auto),
        }
    }
}

impl<T: Clone> From<Resolvable<T>> for ResolvableWire<T> {
    fn from(value: Resolvable<T>) -> Self {
        match value {
            Resolvable::Auto(auto) => ResolvableWire::Bare(auto),
            // The computed value is not retained once overridden
            Resolvable::Manual(manual) => ResolvableWire::Triplet {
                mode: OverrideMode::Manual,
                auto: manual.clone(),
                manual: Some(manual),
            },
        }
    }
}
