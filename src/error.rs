//! Error types for the planner pipeline.

/// Failure of a single leg request against the routing provider.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The provider answered, but with a status code other than `Ok`.
    #[error("routing service returned {code}: {message}")]
    Service { code: String, message: String },

    /// Transport failure, timeout or an overloaded provider.
    #[error("routing service unavailable: {0}")]
    Unavailable(String),

    /// `Ok` status without the route/leg the request asked for.
    #[error("malformed routing response: {0}")]
    MalformedResponse(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// OSRM only serves polylines with 5 or 6 decimal digits.
    #[error("unsupported geometry precision {0}, expected 5 or 6")]
    UnsupportedPrecision(u32),
}

impl RoutingError {
    /// Only transport-level failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RoutingError::Unavailable(_))
    }
}

/// Rejected cost matrix.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptimizationError {
    #[error("cost matrix is empty")]
    Empty,

    #[error("cost matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("cost matrix entry ({row}, {col}) is not a finite non-negative number: {value}")]
    InvalidEntry { row: usize, col: usize, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    #[error("encoded polyline ends in the middle of a value at byte {offset}")]
    Truncated { offset: usize },

    #[error("invalid polyline character {byte:#04x} at byte {offset}")]
    InvalidCharacter { offset: usize, byte: u8 },

    #[error("polyline coordinate overflows at byte {offset}")]
    Overflow { offset: usize },
}

/// Failure of a whole tour calculation.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("routing {from} -> {to} failed")]
    Routing {
        from: String,
        to: String,
        #[source]
        source: RoutingError,
    },

    #[error(transparent)]
    Optimization(#[from] OptimizationError),

    #[error("no geometry stored for leg {from} -> {to}")]
    MissingGeometry { from: String, to: String },

    #[error("visiting order does not match the locations: {0}")]
    InvalidOrder(String),

    #[error("undecodable leg geometry")]
    Polyline(#[from] PolylineError),

    #[error("unknown location: {0}")]
    UnknownLocation(String),

    #[error("no locations selected")]
    NoLocations,

    #[error("failed to start routing workers")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("location {0:?} is defined more than once")]
    DuplicateLocation(String),

    #[error("unsupported geometry precision {0}, expected 5 or 6")]
    UnsupportedPrecision(u32),
}
