//! Extracted samples.

use std::collections::BTreeMap;
use std::ops::Deref;

use ndarray::Array4;

/// Patches of one sample keyed by channel name, in ascending name order.
///
/// Each patch is `(c, z, y, x)` and owns its data.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<A> {
    patches: BTreeMap<String, Array4<A>>,
}

impl<A> Sample<A> {
    pub(crate) fn new(patches: BTreeMap<String, Array4<A>>) -> Self {
        Self { patches }
    }

    pub fn into_inner(self) -> BTreeMap<String, Array4<A>> {
        self.patches
    }
}

impl<A> Deref for Sample<A> {
    type Target = BTreeMap<String, Array4<A>>;

    fn deref(&self) -> &Self::Target {
        &self.patches
    }
}

impl<A> IntoIterator for Sample<A> {
    type Item = (String, Array4<A>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Array4<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.patches.into_iter()
    }
}
