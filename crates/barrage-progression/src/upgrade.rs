//! Additive + percentage escalation formula.

use serde::{Deserialize, Serialize};

use barrage_core::constants::{MAX_UPGRADE_PERCENTAGE, MIN_UPGRADE_PERCENTAGE};

/// Growth applied to a stat each time its stream spawns.
///
/// For spawn index `n` and base `v` the result is
/// `v + n * (v * percentage / 100 + additive)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeFormula {
    pub additive: f64,
    /// Percent of the base added per spawn. Kept in `[0, 100]`.
    pub percentage: f64,
}

impl UpgradeFormula {
    pub const IDENTITY: UpgradeFormula = UpgradeFormula {
        additive: 0.0,
        percentage: 0.0,
    };

    pub fn new(additive: f64, percentage: f64) -> Self {
        Self {
            additive,
            percentage,
        }
        .sanitized()
    }

    /// Copy with the percentage clamped into range. NaN becomes 0.
    pub fn sanitized(self) -> Self {
        let percentage = if self.percentage.is_nan() {
            0.0
        } else {
            self.percentage
                .clamp(MIN_UPGRADE_PERCENTAGE, MAX_UPGRADE_PERCENTAGE)
        };
        let additive = if self.additive.is_nan() {
            0.0
        } else {
            self.additive
        };
        Self {
            additive,
            percentage,
        }
    }

    /// Whether the percentage lies in `[0, 100]`.
    pub fn is_valid(&self) -> bool {
        (MIN_UPGRADE_PERCENTAGE..=MAX_UPGRADE_PERCENTAGE).contains(&self.percentage)
    }

    pub fn is_identity(&self) -> bool {
        self.additive == 0.0 && self.percentage == 0.0
    }

    /// Escalated value for the given spawn count.
    pub fn apply(&self, base: f64, spawn_count: u32) -> f64 {
        if spawn_count == 0 {
            return base;
        }
        let step = base * self.percentage / 100.0 + self.additive;
        base + f64::from(spawn_count) * step
    }

    /// Integer form: float computation, then truncation toward zero.
    pub fn apply_int(&self, base: i64, spawn_count: u32) -> i64 {
        // `as` truncates toward zero and saturates at the i64 bounds.
        self.apply(base as f64, spawn_count) as i64
    }

    /// Count form: truncation toward zero, floored at zero.
    pub fn apply_u32(&self, base: u32, spawn_count: u32) -> u32 {
        // `as` saturates: negatives become 0, overflow becomes u32::MAX.
        self.apply(f64::from(base), spawn_count) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_at_zero_spawns() {
        let formulas = [
            UpgradeFormula::new(5.0, 10.0),
            UpgradeFormula::new(-3.0, 100.0),
            UpgradeFormula::new(0.0, 0.0),
            UpgradeFormula::new(1e6, 50.0),
        ];
        for formula in formulas {
            for base in [0.0, 1.0, -7.5, 123.25, 1e9] {
                assert_eq!(formula.apply(base, 0), base);
            }
        }
    }

    #[test]
    fn linear_growth() {
        let formula = UpgradeFormula::new(2.0, 10.0);
        // step = 100 * 0.1 + 2 = 12
        assert_eq!(formula.apply(100.0, 1), 112.0);
        assert_eq!(formula.apply(100.0, 3), 136.0);
    }

    #[test]
    fn monotonic_for_non_negative_terms() {
        let formula = UpgradeFormula::new(0.5, 7.0);
        for base in [0.0, 1.0, 10.0, 250.0] {
            let mut previous = formula.apply(base, 0);
            for n in 1..50 {
                let value = formula.apply(base, n);
                assert!(value >= previous, "apply({base}, {n}) decreased");
                previous = value;
            }
        }
    }

    #[test]
    fn int_truncates_toward_zero() {
        let formula = UpgradeFormula::new(0.0, 15.0);
        // 3 + 1 * 0.45 = 3.45 -> 3
        assert_eq!(formula.apply_int(3, 1), 3);
        // 3 + 3 * 0.45 = 4.35 -> 4
        assert_eq!(formula.apply_int(3, 3), 4);
        // -3 - 0.45 = -3.45 -> -3, not -4
        assert_eq!(formula.apply_int(-3, 1), -3);

        let shrinking = UpgradeFormula::new(-2.0, 0.0);
        assert_eq!(shrinking.apply_u32(3, 5), 0);
    }

    #[test]
    fn percentage_is_clamped() {
        assert_eq!(UpgradeFormula::new(1.0, 250.0).percentage, 100.0);
        assert_eq!(UpgradeFormula::new(1.0, -5.0).percentage, 0.0);
        assert_eq!(UpgradeFormula::new(1.0, f64::NAN).percentage, 0.0);
        let raw = UpgradeFormula {
            additive: 0.0,
            percentage: 120.0,
        };
        assert!(!raw.is_valid());
        assert!(raw.sanitized().is_valid());
    }
}
