//! Edge handling
//!
//! Decides what a read-only, value-returning pixel access yields for a
//! coordinate outside the grid. The mutable access path ignores the
//! policy and always requires in-domain coordinates.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Out-of-domain read behaviour for [`Grid::get_pixel`](crate::Grid::get_pixel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgePolicy {
    /// Out-of-domain reads report [`Error::OutOfDomain`]; convolution
    /// omits the tap.
    Skip,
    /// Coordinates saturate to `[0, W-1] x [0, H-1]` before the lookup.
    #[default]
    Clamp,
    /// Out-of-domain reads return zero.
    Zero,
}

/// Where an image-space coordinate lands under a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolved {
    /// Read the sample at this flat index.
    Index(usize),
    /// Read the additive identity.
    Zero,
    /// Nothing to read.
    Miss,
}

impl EdgePolicy {
    /// All policies, in declaration order.
    pub const ALL: [EdgePolicy; 3] = [EdgePolicy::Skip, EdgePolicy::Clamp, EdgePolicy::Zero];

    /// Lower-case name used by [`FromStr`] and [`fmt::Display`].
    pub fn name(self) -> &'static str {
        match self {
            EdgePolicy::Skip => "skip",
            EdgePolicy::Clamp => "clamp",
            EdgePolicy::Zero => "zero",
        }
    }

    /// Map `(x, y)` on a `width x height` domain to a storage decision.
    ///
    /// An empty domain has nothing to clamp to, so Clamp degrades to a miss.
    #[inline]
    pub(crate) fn resolve(self, x: i64, y: i64, width: u32, height: u32) -> Resolved {
        let (w, h) = (width as i64, height as i64);
        if x >= 0 && y >= 0 && x < w && y < h {
            return Resolved::Index((y * w + x) as usize);
        }
        match self {
            EdgePolicy::Skip => Resolved::Miss,
            EdgePolicy::Zero => Resolved::Zero,
            EdgePolicy::Clamp => {
                if w == 0 || h == 0 {
                    return Resolved::Miss;
                }
                let cx = x.clamp(0, w - 1);
                let cy = y.clamp(0, h - 1);
                Resolved::Index((cy * w + cx) as usize)
            }
        }
    }
}

impl fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(EdgePolicy::Skip),
            "clamp" => Ok(EdgePolicy::Clamp),
            "zero" => Ok(EdgePolicy::Zero),
            other => Err(Error::Usage(format!(
                "unknown edge policy '{other}' (expected skip, clamp or zero)"
            ))),
        }
    }
}
