// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Cayley-Klein metric of the ambient projective space.
///
/// The discriminants match the signature convention used by scene attributes:
/// hyperbolic `-1`, euclidean `0`, elliptic `1`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Quadratic form `x² + y² + z² - w²`.
    Hyperbolic,
    /// Degenerate form; distances are measured after dehomogenization.
    #[default]
    Euclidean,
    /// Quadratic form `x² + y² + z² + w²`.
    Elliptic,
}

impl Metric {
    /// Maps a signature integer to a metric; unknown values fall back to euclidean.
    pub fn from_signature(signature: i32) -> Self {
        match signature {
            -1 => Self::Hyperbolic,
            1 => Self::Elliptic,
            _ => Self::Euclidean,
        }
    }

    /// Signature integer for this metric.
    pub fn signature(self) -> i32 {
        match self {
            Self::Hyperbolic => -1,
            Self::Euclidean => 0,
            Self::Elliptic => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trips_and_defaults_to_euclidean() {
        for m in [Metric::Hyperbolic, Metric::Euclidean, Metric::Elliptic] {
            assert_eq!(Metric::from_signature(m.signature()), m);
        }
        assert_eq!(Metric::from_signature(2), Metric::Euclidean);
        assert_eq!(Metric::default(), Metric::Euclidean);
    }
}
