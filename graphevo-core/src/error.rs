//! Parameter validation errors

/// Invalid simulation or topology parameters.
///
/// Raised before any graph or population state exists, so a failed
/// construction never leaves a partially-built value behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("ring degree must be even, got k={0}")]
    OddRingDegree(usize),

    #[error("ring degree must be at least 2, got k={0}")]
    RingDegreeTooSmall(usize),

    #[error("lattice needs a perfect-square node count, got N={0}")]
    NotPerfectSquare(usize),

    #[error("Barabasi-Albert seed clique needs m0 >= 2, got m0={0}")]
    SeedCliqueTooSmall(usize),

    #[error("Barabasi-Albert attachment needs 1 <= m < m0, got m={m}, m0={m0}")]
    AttachmentOutOfRange { m: usize, m0: usize },

    #[error("{topology} needs at least {required} nodes, got N={nodes}")]
    TooFewNodes {
        topology: &'static str,
        required: usize,
        nodes: usize,
    },

    #[error("{name} must lie in [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },

    #[error("selection intensity must be finite and non-negative, got {0}")]
    InvalidIntensity(f64),

    #[error("strategy assignment has {got} entries but the graph has {expected} nodes")]
    PopulationSizeMismatch { expected: usize, got: usize },
}

impl ParamError {
    /// Check that `value` is a probability-like parameter in [0, 1]
    pub fn check_unit(name: &'static str, value: f64) -> Result<(), ParamError> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ParamError::OutOfUnitRange { name, value })
        }
    }
}
