//! Errors raised while building a reducer configuration.
//!
//! Every variant is a caller mistake in the handler arguments. They surface
//! from [`crate::config::build_reducer_config`] before any action is processed;
//! a built reducer never fails.

use thiserror::Error;

/// Recognized hook names, as listed in error messages.
pub(crate) const HOOK_LIST: &str = "start, progress, flush, done, error, cancel, reset";

/// A handler argument has the wrong shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigShapeError {
    /// No handler was given at all.
    #[error("The handler must be defined")]
    MissingHandler,

    /// The handler is a bare function or scalar instead of an action set or map.
    #[error("The handler must be an object with async actions/objects or async actions objects")]
    NotAnObject,

    /// A map entry is neither an action set nor a valid hook map.
    #[error(
        "The handler `{key}` must be an AsyncAction or a config object with one of the async hooks properties: {}",
        HOOK_LIST
    )]
    InvalidEntry {
        /// Name of the offending entry.
        key: String,
        /// Why the entry was rejected.
        #[source]
        reason: Box<ConfigShapeError>,
    },

    /// A hook map has no keys.
    #[error("A config object needs at least one of the async hooks properties: {}", HOOK_LIST)]
    EmptyConfig,

    /// A hook map key is not a stage name.
    #[error("`{key}` is not one of the async hooks properties: {}", HOOK_LIST)]
    UnknownHook {
        /// The unrecognized key.
        key: String,
    },

    /// A hook map key maps to something other than a function.
    #[error("The async hook `{key}` must be a function")]
    HookNotAFunction {
        /// The stage name whose value is not a function.
        key: String,
    },
}

/// Result alias for configuration building.
pub type Result<T> = std::result::Result<T, ConfigShapeError>;
