//! Error type shared by the numerical core.

use thiserror::Error;

/// Errors raised while computing an index.
///
/// Missing values are not errors: NaN propagates through the arithmetic
/// unless an index defines its own masking rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// Two inputs that must line up have different shapes.
    #[error("shape mismatch in {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// The input is too short for a baseline or scan to be meaningful.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A region box contains no grid points.
    #[error("region {region} selects no grid points")]
    EmptyRegion { region: String },

    /// A region key is not present in the catalog.
    #[error("unknown region {0:?}")]
    UnknownRegion(String),

    /// A field has no pressure levels to select from.
    #[error("no pressure levels available")]
    MissingLevel,

    /// Pressure units other than Pa or hPa.
    #[error("pressure units {0:?} not recognised")]
    UnknownUnits(String),

    /// A daily calendar is required but the field is indexed otherwise.
    #[error("{0} requires a daily time axis")]
    MissingCalendar(&'static str),

    /// A thermodynamic index needs the pressure of the field's level.
    #[error("{0} requires the field pressure level")]
    MissingPressure(&'static str),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    pub(crate) fn insufficient(msg: impl Into<String>) -> Self {
        IndexError::InsufficientData(msg.into())
    }

    pub(crate) fn mismatch(what: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        IndexError::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}
