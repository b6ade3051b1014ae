//! Triad value: (∆ structure, ∞ abstraction, Θ concreteness)
//!
//! A triad is an immutable 3-vector normalized to sum to 1.0 with every
//! component clamped to [0, 1]. Transformations always return a new value.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::core::error::TriadError;

const THIRD: f64 = 1.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TriadValue {
    delta: f64,
    infinity: f64,
    theta: f64,
}

impl TriadValue {
    /// Normalize three raw scores into a triad.
    ///
    /// Components are divided by their sum and then clamped to [0, 1]; no
    /// renormalization happens after clamping. A raw triple whose sum is zero
    /// or non-finite maps to [`TriadValue::neutral`].
    pub fn normalize(delta: f64, infinity: f64, theta: f64) -> Self {
        let sum = delta + infinity + theta;
        if sum == 0.0 || !sum.is_finite() {
            return Self::neutral();
        }

        let clamp = |v: f64| {
            let v = v / sum;
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, 1.0)
            }
        };

        Self {
            delta: clamp(delta),
            infinity: clamp(infinity),
            theta: clamp(theta),
        }
    }

    pub fn from_raw(raw: [f64; 3]) -> Self {
        Self::normalize(raw[0], raw[1], raw[2])
    }

    /// Equal thirds, used when no scorer output is available
    pub fn neutral() -> Self {
        Self {
            delta: THIRD,
            infinity: THIRD,
            theta: THIRD,
        }
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn infinity(&self) -> f64 {
        self.infinity
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn as_raw(&self) -> [f64; 3] {
        [self.delta, self.infinity, self.theta]
    }

    /// L1 (Manhattan) distance, in [0, 3]
    pub fn distance(&self, other: &TriadValue) -> f64 {
        self.as_raw()
            .iter()
            .zip(other.as_raw().iter())
            .map(|(a, b)| (a - b).abs())
            .sum()
    }

    /// Cosine similarity. A zero norm is replaced by 1.0, so a zero vector
    /// has similarity 0.0 with anything.
    pub fn cosine_similarity(&self, other: &TriadValue) -> f64 {
        let a = self.as_raw();
        let b = other.as_raw();

        let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm = |v: &[f64; 3]| {
            let n = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            if n == 0.0 {
                1.0
            } else {
                n
            }
        };

        dot / (norm(&a) * norm(&b))
    }

    /// Shift this triad toward a preset region and renormalize.
    pub fn steer(&self, preset: TriadPreset) -> TriadValue {
        let [d, a, c] = self.as_raw();
        match preset {
            TriadPreset::Abstract => Self::normalize(d + 0.15, a + 0.15, c - 0.15),
            TriadPreset::Concrete => Self::normalize(d - 0.15, a - 0.15, c + 0.30),
            TriadPreset::Balanced => {
                Self::normalize(0.5 * d + 0.5 * THIRD, 0.5 * a + 0.5 * THIRD, 0.5 * c + 0.5 * THIRD)
            }
        }
    }
}

impl Default for TriadValue {
    fn default() -> Self {
        Self::neutral()
    }
}

impl fmt::Display for TriadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Triad(Δ={:.3}, ∞={:.3}, Θ={:.3})",
            self.delta, self.infinity, self.theta
        )
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Named bias regions of the triad space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriadPreset {
    /// Explanatory, theoretical content
    Abstract,
    /// Examples, code, step-by-step material
    Concrete,
    Balanced,
}

impl TriadPreset {
    pub fn triad(&self) -> TriadValue {
        match self {
            TriadPreset::Abstract => TriadValue::normalize(0.1, 0.8, 0.1),
            TriadPreset::Concrete => TriadValue::normalize(0.1, 0.1, 0.8),
            TriadPreset::Balanced => TriadValue::neutral(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriadPreset::Abstract => "abstract",
            TriadPreset::Concrete => "concrete",
            TriadPreset::Balanced => "balanced",
        }
    }
}

impl FromStr for TriadPreset {
    type Err = TriadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abstract" | "abstrait" => Ok(TriadPreset::Abstract),
            "concrete" | "concret" => Ok(TriadPreset::Concrete),
            "balanced" | "neutral" => Ok(TriadPreset::Balanced),
            other => Err(TriadError::invalid(format!(
                "unknown triad preset '{}' (expected abstract, concrete or balanced)",
                other
            ))),
        }
    }
}

/// Parse a bias: a preset name or three comma-separated non-negative raw scores
pub fn parse_bias(input: &str) -> Result<TriadValue, TriadError> {
    if let Ok(preset) = input.parse::<TriadPreset>() {
        return Ok(preset.triad());
    }

    let parts: Vec<f64> = input
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| TriadError::invalid(format!("invalid bias '{}'", input)))?;

    match parts.as_slice() {
        [d, a, c] if parts.iter().all(|v| v.is_finite() && *v >= 0.0) => {
            Ok(TriadValue::normalize(*d, *a, *c))
        }
        _ => Err(TriadError::invalid(format!(
            "bias must be a preset or three non-negative numbers, got '{}'",
            input
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn sum(t: &TriadValue) -> f64 {
        t.as_raw().iter().sum()
    }

    #[test]
    fn test_normalize_sums_to_one() {
        let t = TriadValue::normalize(2.0, 1.0, 1.0);
        assert!(approx(t.delta(), 0.5));
        assert!(approx(t.infinity(), 0.25));
        assert!(approx(t.theta(), 0.25));
        assert!(approx(sum(&t), 1.0));
    }

    #[test]
    fn test_normalize_zero_sum_is_neutral() {
        assert_eq!(TriadValue::normalize(0.0, 0.0, 0.0), TriadValue::neutral());
        assert_eq!(TriadValue::normalize(1.0, -1.0, 0.0), TriadValue::neutral());
        assert_eq!(
            TriadValue::normalize(f64::NAN, 1.0, 1.0),
            TriadValue::neutral()
        );
        assert_eq!(
            TriadValue::normalize(f64::INFINITY, 1.0, 1.0),
            TriadValue::neutral()
        );
    }

    #[test]
    fn test_normalize_clamps_negative_raw_scores() {
        let t = TriadValue::normalize(2.0, -0.5, 0.5);
        assert!(approx(t.delta(), 1.0));
        assert!(approx(t.infinity(), 0.0));
        assert!(approx(t.theta(), 0.25));
        for v in t.as_raw() {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_normalize_idempotent() {
        let raws = [
            [1.0, 2.0, 3.0],
            [0.2, 0.0, 0.0],
            [5.0, 5.0, 5.0],
            [0.001, 10.0, 0.3],
            [0.38, 1.0, 0.0],
        ];
        for raw in raws {
            let once = TriadValue::from_raw(raw);
            let twice = TriadValue::from_raw(once.as_raw());
            for (a, b) in once.as_raw().iter().zip(twice.as_raw().iter()) {
                assert!(approx(*a, *b), "{:?} vs {:?}", once, twice);
            }
        }
    }

    #[test]
    fn test_default_is_neutral() {
        let t = TriadValue::default();
        assert!(approx(t.delta(), 1.0 / 3.0));
        assert!(approx(sum(&t), 1.0));
    }

    #[test]
    fn test_distance_metric_laws() {
        let values = [
            TriadValue::normalize(1.0, 0.0, 0.0),
            TriadValue::normalize(0.0, 0.0, 1.0),
            TriadValue::normalize(0.1, 0.8, 0.1),
            TriadValue::neutral(),
            TriadValue::normalize(0.3, 0.3, 0.4),
        ];

        for a in &values {
            assert!(approx(a.distance(a), 0.0));
            for b in &values {
                assert!(approx(a.distance(b), b.distance(a)));
                assert!(a.distance(b) >= 0.0 && a.distance(b) <= 3.0);
                for c in &values {
                    assert!(a.distance(b) + b.distance(c) + EPS >= a.distance(c));
                }
            }
        }

        let x = TriadValue::normalize(1.0, 0.0, 0.0);
        let z = TriadValue::normalize(0.0, 0.0, 1.0);
        assert!(approx(x.distance(&z), 2.0));
    }

    #[test]
    fn test_cosine_bounds() {
        let values = [
            TriadValue::normalize(1.0, 0.0, 0.0),
            TriadValue::normalize(0.0, 1.0, 0.0),
            TriadValue::normalize(0.1, 0.1, 0.8),
            TriadValue::neutral(),
        ];
        for a in &values {
            for b in &values {
                let c = a.cosine_similarity(b);
                assert!((0.0..=1.0 + EPS).contains(&c), "cosine {} out of range", c);
            }
            assert!(approx(a.cosine_similarity(a), 1.0));
        }

        let x = TriadValue::normalize(1.0, 0.0, 0.0);
        let y = TriadValue::normalize(0.0, 1.0, 0.0);
        assert!(approx(x.cosine_similarity(&y), 0.0));
    }

    #[test]
    fn test_presets() {
        let abs = TriadPreset::Abstract.triad();
        assert!(approx(abs.infinity(), 0.8));
        let con = TriadPreset::Concrete.triad();
        assert!(approx(con.theta(), 0.8));
        assert_eq!(TriadPreset::Balanced.triad(), TriadValue::neutral());

        assert_eq!("abstract".parse::<TriadPreset>().unwrap(), TriadPreset::Abstract);
        assert_eq!(" Concrete ".parse::<TriadPreset>().unwrap(), TriadPreset::Concrete);
        assert_eq!("balanced".parse::<TriadPreset>().unwrap(), TriadPreset::Balanced);
        assert!(matches!(
            "sideways".parse::<TriadPreset>(),
            Err(TriadError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_steer_moves_toward_preset() {
        let base = TriadValue::neutral();

        let abs = base.steer(TriadPreset::Abstract);
        assert!(abs.theta() < base.theta());
        assert!(abs.infinity() > base.infinity());

        let con = base.steer(TriadPreset::Concrete);
        assert!(con.theta() > base.theta());

        let skewed = TriadValue::normalize(1.0, 0.0, 0.0);
        let bal = skewed.steer(TriadPreset::Balanced);
        assert!(bal.distance(&TriadValue::neutral()) < skewed.distance(&TriadValue::neutral()));
        assert!(approx(sum(&bal), 1.0));
    }

    #[test]
    fn test_display() {
        let t = TriadValue::normalize(0.1, 0.8, 0.1);
        assert_eq!(t.to_string(), "Triad(Δ=0.100, ∞=0.800, Θ=0.100)");
    }

    #[test]
    fn test_parse_bias_presets_and_triples() {
        assert_eq!(parse_bias("abstract").unwrap(), TriadPreset::Abstract.triad());
        assert_eq!(parse_bias("concret").unwrap(), TriadPreset::Concrete.triad());
        assert_eq!(
            parse_bias("1, 2, 1").unwrap(),
            TriadValue::normalize(1.0, 2.0, 1.0)
        );
        assert!(parse_bias("1,2").is_err());
        assert!(parse_bias("-1,2,3").is_err());
        assert!(parse_bias("sideways").is_err());
    }
}
