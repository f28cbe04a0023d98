use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the everoute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a system name could not be found in the universe.
    #[error("unknown system name: {name}{}", format_suggestions(.suggestions))]
    UnknownSystem {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when no route could be found between two systems.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: String, goal: String },

    /// Raised when a capital planner is configured with an unusable jump range.
    #[error("invalid jump range {value}; expected a positive number of light-years")]
    InvalidJumpRange { value: f64 },

    /// Raised when a capital search expands more systems than it is allowed to.
    #[error("capital search exceeded the expansion limit of {limit} systems")]
    SearchLimitExceeded { limit: usize },

    /// Raised when attempting to load a schema that is not supported.
    #[error("unsupported dataset schema; expected SolarSystems/Jumps or mapSolarSystems tables")]
    UnsupportedSchema,

    /// Dataset could not be located at the given path.
    #[error("dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// Raised when updating or deleting a gate that does not exist.
    #[error("gate {id} not found")]
    GateNotFound { id: i64 },

    /// Raised when updating or deleting a temporary connection that does not exist.
    #[error("temporary connection {id} not found")]
    TemporaryConnectionNotFound { id: i64 },

    /// Raised when a store has no identifiers left to hand out.
    #[error("no {kind} ids left to allocate")]
    IdSpaceExhausted { kind: &'static str },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` for the not-found half of the query error taxonomy.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::UnknownSystem { .. })
    }

    /// Returns `true` when the graph simply had no path.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Error::RouteNotFound { .. })
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
