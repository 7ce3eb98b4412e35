//! Axis descriptors of the voxel grid

use super::constants::keys;
use super::key::MagicKey;

/// Grid axis; the file stores them in the order X, Y, Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in file order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of the axis in [`Axis::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Upper-case letter used as key suffix
    pub const fn letter(self) -> u8 {
        match self {
            Axis::X => b'X',
            Axis::Y => b'Y',
            Axis::Z => b'Z',
        }
    }

    /// Keys of the six blocks describing this axis
    pub const fn keys(self) -> AxisKeys {
        let l = self.letter();
        AxisKeys {
            start: MagicKey::with_suffix(keys::AXIS_START, l),
            n_steps: MagicKey::with_suffix(keys::AXIS_STEPS, l),
            lower: MagicKey::with_suffix(keys::AXIS_LOWER, l),
            upper: MagicKey::with_suffix(keys::AXIS_UPPER, l),
            step: MagicKey::with_suffix(keys::AXIS_STEP, l),
            end: MagicKey::with_suffix(keys::AXIS_END, l),
        }
    }
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Magic keys of one axis section, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisKeys {
    pub start: MagicKey,
    pub n_steps: MagicKey,
    pub lower: MagicKey,
    pub upper: MagicKey,
    pub step: MagicKey,
    pub end: MagicKey,
}

/// Uniform binning of one axis, lengths in cm
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisSpec {
    pub n_steps: u32,
    pub lower: f64,
    pub upper: f64,
    pub step: f64,
}

impl AxisSpec {
    /// Create an axis from all four stored fields
    pub const fn new(n_steps: u32, lower: f64, upper: f64, step: f64) -> Self {
        Self {
            n_steps,
            lower,
            upper,
            step,
        }
    }

    /// Create an axis whose upper bound is derived from the binning
    pub fn from_steps(lower: f64, step: f64, n_steps: u32) -> Self {
        Self {
            n_steps,
            lower,
            upper: lower + step * f64::from(n_steps),
            step,
        }
    }

    /// Upper bound implied by `lower`, `step` and `n_steps`
    pub fn expected_upper(&self) -> f64 {
        self.lower + self.step * f64::from(self.n_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_keys() {
        let keys = Axis::Z.keys();
        assert_eq!(keys.start, MagicKey::new(*b"AXIZ"));
        assert_eq!(keys.n_steps, MagicKey::new(*b"NBOZ"));
        assert_eq!(keys.lower, MagicKey::new(*b"MINZ"));
        assert_eq!(keys.upper, MagicKey::new(*b"MAXZ"));
        assert_eq!(keys.step, MagicKey::new(*b"STEZ"));
        assert_eq!(keys.end, MagicKey::new(*b"ENDZ"));
    }

    #[test]
    fn test_axis_order() {
        for (i, axis) in Axis::ALL.iter().enumerate() {
            assert_eq!(axis.index(), i);
        }
    }

    #[test]
    fn test_from_steps() {
        let axis = AxisSpec::from_steps(-10.0, 2.5, 8);
        assert_eq!(axis.upper, 10.0);
        assert_eq!(axis.expected_upper(), 10.0);
    }
}
