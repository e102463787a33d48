//! Hierarchy trait - read-only parent links of the host's node tree
//!
//! The host owns the tree. The dispatcher only ever asks "who is the parent
//! of this node?" and never mutates the answer.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

/// Parent lookup over an externally owned hierarchy.
///
/// Returning `None` marks a root. Implementations are expected to describe a
/// tree; a cyclic parent chain is tolerated by the dispatcher but never
/// produces a `Handled` result past the first repeated node.
pub trait Hierarchy {
    /// Node identity. Equality is the hierarchy's notion of "same node".
    type Node: Eq + Hash + Clone + Debug;

    fn parent_of(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Iterate from `start` (inclusive) towards the root.
    ///
    /// Does not guard against cycles; callers walking untrusted hierarchies
    /// must bound the iteration themselves.
    fn ancestors(&self, start: Self::Node) -> Ancestors<'_, Self>
    where
        Self: Sized,
    {
        Ancestors {
            hierarchy: self,
            next: Some(start),
        }
    }
}

/// Iterator returned by [`Hierarchy::ancestors`].
pub struct Ancestors<'a, H: Hierarchy> {
    hierarchy: &'a H,
    next: Option<H::Node>,
}

impl<H: Hierarchy> Iterator for Ancestors<'_, H> {
    type Item = H::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = self.hierarchy.parent_of(&current);
        Some(current)
    }
}

impl<T: Hierarchy + ?Sized> Hierarchy for &T {
    type Node = T::Node;

    fn parent_of(&self, node: &Self::Node) -> Option<Self::Node> {
        (**self).parent_of(node)
    }
}

impl<T: Hierarchy + ?Sized> Hierarchy for Arc<T> {
    type Node = T::Node;

    fn parent_of(&self, node: &Self::Node) -> Option<Self::Node> {
        (**self).parent_of(node)
    }
}

/// Explicit child -> parent map.
///
/// Nodes absent from the map, and nodes inserted as roots, have no parent.
#[derive(Debug, Clone)]
pub struct ParentMap<N> {
    parents: HashMap<N, Option<N>>,
}

impl<N> Default for ParentMap<N> {
    fn default() -> Self {
        Self {
            parents: HashMap::new(),
        }
    }
}

impl<N: Eq + Hash + Clone + Debug> ParentMap<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `child`'s parent, replacing any previous link.
    pub fn insert(&mut self, child: N, parent: N) -> &mut Self {
        self.parents.insert(child, Some(parent));
        self
    }

    /// Record `node` as a root.
    pub fn insert_root(&mut self, node: N) -> &mut Self {
        self.parents.insert(node, None);
        self
    }

    pub fn remove(&mut self, node: &N) -> Option<Option<N>> {
        self.parents.remove(node)
    }

    pub fn contains(&self, node: &N) -> bool {
        self.parents.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// All nodes known to the map, in arbitrary order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.parents.keys()
    }

    /// Direct children of `node`, in arbitrary order.
    pub fn children_of<'a>(&'a self, node: &'a N) -> impl Iterator<Item = &'a N> + 'a {
        self.parents
            .iter()
            .filter(move |(_, parent)| parent.as_ref() == Some(node))
            .map(|(child, _)| child)
    }

    /// Nodes with no parent, in arbitrary order.
    pub fn roots(&self) -> impl Iterator<Item = &N> {
        self.parents
            .iter()
            .filter(|(_, parent)| parent.is_none())
            .map(|(node, _)| node)
    }

    /// Build from a chain given leaf first: `[leaf, mid, root]`.
    pub fn from_chain(chain: &[N]) -> Self {
        let mut map = Self::new();
        for pair in chain.windows(2) {
            map.insert(pair[0].clone(), pair[1].clone());
        }
        if let Some(root) = chain.last() {
            map.insert_root(root.clone());
        }
        map
    }
}

impl<N: Eq + Hash + Clone + Debug> Hierarchy for ParentMap<N> {
    type Node = N;

    fn parent_of(&self, node: &N) -> Option<N> {
        self.parents.get(node).cloned().flatten()
    }
}

impl<N: Eq + Hash + Clone + Debug> FromIterator<(N, Option<N>)> for ParentMap<N> {
    fn from_iter<I: IntoIterator<Item = (N, Option<N>)>>(iter: I) -> Self {
        Self {
            parents: iter.into_iter().collect(),
        }
    }
}

/// Hierarchy backed by a closure; see [`parent_fn`].
pub struct ParentFn<F, N> {
    lookup: F,
    _node: PhantomData<fn(&N) -> Option<N>>,
}

/// Adapt a `parentOf` closure supplied by the host.
///
/// ```
/// use contracts::{parent_fn, Hierarchy};
///
/// // integer tree where every node's parent is n / 2, rooted at 1
/// let tree = parent_fn(|n: &u32| (*n > 1).then(|| n / 2));
/// assert_eq!(tree.ancestors(6).collect::<Vec<_>>(), vec![6, 3, 1]);
/// ```
pub fn parent_fn<F, N>(lookup: F) -> ParentFn<F, N>
where
    F: Fn(&N) -> Option<N>,
{
    ParentFn {
        lookup,
        _node: PhantomData,
    }
}

impl<F, N> Hierarchy for ParentFn<F, N>
where
    F: Fn(&N) -> Option<N>,
    N: Eq + Hash + Clone + Debug,
{
    type Node = N;

    fn parent_of(&self, node: &N) -> Option<N> {
        (self.lookup)(node)
    }
}
