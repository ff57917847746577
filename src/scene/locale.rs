use crate::scene::hires::HiResCoord;
use crate::scene::NodeKey;

/// A named attachment point in the universe.
///
/// A locale fixes a [`HiResCoord`] origin and holds the set of branch
/// graphs currently attached there. Membership is ordered by attachment
/// time; detaching and re-attaching the same set restores it.
#[derive(Debug, Clone)]
pub struct Locale {
    /// High-resolution origin of this locale.
    pub hi_res: HiResCoord,
    pub(crate) branch_graphs: Vec<NodeKey>,
}

impl Locale {
    #[must_use]
    pub fn new(hi_res: HiResCoord) -> Self {
        Self {
            hi_res,
            branch_graphs: Vec::new(),
        }
    }

    /// Locale at the universe origin.
    #[must_use]
    pub fn at_origin() -> Self {
        Self::new(HiResCoord::ORIGIN)
    }

    /// Roots of the branch graphs currently attached to this locale.
    #[inline]
    #[must_use]
    pub fn branch_graphs(&self) -> &[NodeKey] {
        &self.branch_graphs
    }
}
