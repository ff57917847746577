use glam::DVec3;

/// A high-resolution world coordinate.
///
/// Each axis is a 256-bit signed fixed-point value split into eight 32-bit
/// words, most significant word first, with the binary point between words
/// 3 and 4 (128 integer bits, 128 fraction bits). Word 3 therefore holds
/// whole meters for everyday magnitudes, which keeps universe-scale origins
/// exact while still resolving sub-nanometer offsets.
///
/// Values round-trip through the binary codec word-for-word; the `f64`
/// conversions are approximations for tooling and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HiResCoord {
    pub x: [i32; 8],
    pub y: [i32; 8],
    pub z: [i32; 8],
}

impl HiResCoord {
    pub const ORIGIN: Self = Self {
        x: [0; 8],
        y: [0; 8],
        z: [0; 8],
    };

    #[must_use]
    pub fn new(x: [i32; 8], y: [i32; 8], z: [i32; 8]) -> Self {
        Self { x, y, z }
    }

    /// Builds a coordinate from meters, with f64 precision.
    #[must_use]
    pub fn from_meters(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: axis_from_meters(x),
            y: axis_from_meters(y),
            z: axis_from_meters(z),
        }
    }

    /// Approximates the coordinate in meters.
    #[must_use]
    pub fn to_meters(&self) -> DVec3 {
        DVec3::new(
            axis_to_meters(&self.x),
            axis_to_meters(&self.y),
            axis_to_meters(&self.z),
        )
    }

    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            x: axis_add(&self.x, &other.x),
            y: axis_add(&self.y, &other.y),
            z: axis_add(&self.z, &other.z),
        }
    }

    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.negate())
    }

    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            x: axis_negate(&self.x),
            y: axis_negate(&self.y),
            z: axis_negate(&self.z),
        }
    }

    /// Straight-line distance to `other`, in meters.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        self.sub(other).to_meters().length()
    }
}

// Word 0 is most significant; carries propagate from word 7 upward.
fn axis_add(a: &[i32; 8], b: &[i32; 8]) -> [i32; 8] {
    let mut out = [0i32; 8];
    let mut carry = 0u64;
    for i in (0..8).rev() {
        let sum = u64::from(a[i] as u32) + u64::from(b[i] as u32) + carry;
        out[i] = (sum as u32) as i32;
        carry = sum >> 32;
    }
    out
}

fn axis_negate(a: &[i32; 8]) -> [i32; 8] {
    let mut out = [0i32; 8];
    let mut carry = 1u64;
    for i in (0..8).rev() {
        let sum = u64::from(!(a[i] as u32)) + carry;
        out[i] = (sum as u32) as i32;
        carry = sum >> 32;
    }
    out
}

fn axis_from_meters(v: f64) -> [i32; 8] {
    let mut words = [0i32; 8];
    let magnitude = v.abs();
    let whole = magnitude.trunc();
    let frac = magnitude - whole;

    words[3] = (whole as u64 as u32) as i32;
    words[2] = ((whole as u64) >> 32) as i32;
    words[4] = ((frac * 4_294_967_296.0) as u64 as u32) as i32;

    if v < 0.0 { axis_negate(&words) } else { words }
}

fn axis_to_meters(words: &[i32; 8]) -> f64 {
    let negative = words[0] < 0;
    let w = if negative { axis_negate(words) } else { *words };

    let mut value = 0.0f64;
    for (i, word) in w.iter().enumerate() {
        let weight = 2.0f64.powi(32 * (3 - i as i32));
        value += f64::from(*word as u32) * weight;
    }
    if negative { -value } else { value }
}
