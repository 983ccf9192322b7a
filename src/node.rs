//! The document tree.
//!
//! A document is a tree of [`Node`]s. Each node carries an id, an ordered
//! list of data fields, and an ordered list of children; the node returned
//! by a parse is the root, whose id and data are empty and whose children
//! are the top-level nodes in source order. Duplicate ids are permitted —
//! consumers distinguish matches by position or with the find/iterate
//! helpers below.
//!
//! `Node` is generic over its string storage:
//!
//! - [`Document`] (`Node<Vec<u8>>`) owns its bytes and outlives the source
//!   text.
//! - [`DocumentView`] (`Node<&[u8]>`) borrows every string from the source
//!   buffer given to [`from_mut_slice`](crate::from_mut_slice); it costs
//!   no byte copies but is tied to that buffer's lifetime.
//!
//! The two flavours compare structurally against each other:
//!
//! ```rust
//! let mut buf = b"Key value".to_vec();
//! let view = nodus::from_mut_slice(&mut buf);
//! let owned = nodus::from_slice("Key value");
//! assert_eq!(view, owned);
//! ```

use std::cmp::Ordering;

use crate::convert::{opt_bool, opt_integer, Integer};

/// One element of a document tree: an id, ordered data fields, and
/// ordered children.
///
/// All strings are byte strings — the format treats non-ASCII bytes as
/// opaque, and base64 blocks can hold arbitrary binary data. Use
/// [`Node::id_str`] and [`Node::data_str_at`] where UTF-8 is expected.
///
/// # Examples
///
/// Building a document by hand:
///
/// ```rust
/// use nodus::{Document, Node};
///
/// let mut doc = Document::default();
/// doc.children.push(Node::with_id("EmptyNode"));
/// doc.children.push(Node::with_data("NodeWithData", ["data1", "data2"]));
///
/// assert_eq!(nodus::to_bytes(&doc), b"EmptyNode\nNodeWithData data1 data2\n");
/// ```
#[derive(Debug, Clone, Default, Hash)]
pub struct Node<S> {
    /// The node's name. Empty only for the root.
    pub id: S,
    /// The node's data fields, in source order.
    pub data: Vec<S>,
    /// Nested child nodes, in source order.
    pub children: Vec<Node<S>>,
}

/// A document tree that owns its strings.
pub type Document = Node<Vec<u8>>;

/// A document tree whose strings borrow from the parsed source buffer.
pub type DocumentView<'a> = Node<&'a [u8]>;

impl Document {
    /// Creates a node with the given id and no data or children.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nodus::Node;
    ///
    /// let node = Node::with_id("Key");
    /// assert_eq!(node.id, b"Key");
    /// assert!(node.data.is_empty());
    /// ```
    #[must_use]
    pub fn with_id(id: impl Into<Vec<u8>>) -> Document {
        Node {
            id: id.into(),
            data: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a node with the given id and data fields.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nodus::Node;
    ///
    /// let node = Node::with_data("Key", ["a", "b"]);
    /// assert_eq!(node.data.len(), 2);
    /// ```
    #[must_use]
    pub fn with_data<I>(id: impl Into<Vec<u8>>, data: I) -> Document
    where
        I: IntoIterator,
        I::Item: Into<Vec<u8>>,
    {
        Node {
            id: id.into(),
            data: data.into_iter().map(Into::into).collect(),
            children: Vec::new(),
        }
    }
}

impl<S: AsRef<[u8]>> Node<S> {
    /// The node id as UTF-8, if it is valid UTF-8.
    #[must_use]
    pub fn id_str(&self) -> Option<&str> {
        std::str::from_utf8(self.id.as_ref()).ok()
    }

    /// The data field at `index`, or `None` when out of bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let doc = nodus::from_slice("Key first second");
    /// let node = &doc.children[0];
    /// assert_eq!(node.data_at(1), Some(&b"second"[..]));
    /// assert_eq!(node.data_at(2), None);
    /// ```
    #[must_use]
    pub fn data_at(&self, index: usize) -> Option<&[u8]> {
        self.data.get(index).map(AsRef::as_ref)
    }

    /// The data field at `index` as UTF-8, if present and valid.
    #[must_use]
    pub fn data_str_at(&self, index: usize) -> Option<&str> {
        self.data_at(index).and_then(|d| std::str::from_utf8(d).ok())
    }

    /// Converts the data field at `index` with [`opt_bool`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// let doc = nodus::from_slice("Flags true false maybe");
    /// let node = &doc.children[0];
    /// assert_eq!(node.bool_at(0), Some(true));
    /// assert_eq!(node.bool_at(2), None);
    /// assert_eq!(node.bool_at(9), None);
    /// ```
    #[must_use]
    pub fn bool_at(&self, index: usize) -> Option<bool> {
        self.data_at(index).and_then(opt_bool)
    }

    /// Converts the data field at `index` with [`opt_integer`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// let doc = nodus::from_slice("Limits -50 1'000");
    /// let node = &doc.children[0];
    /// assert_eq!(node.integer_at::<i32>(0), Some(-50));
    /// assert_eq!(node.integer_at::<u32>(1), Some(1000));
    /// ```
    #[must_use]
    pub fn integer_at<T: Integer>(&self, index: usize) -> Option<T> {
        self.data_at(index).and_then(opt_integer)
    }

    /// The first child whose id equals `id`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let doc = nodus::from_slice("Alpha a1\nBeta b1\nAlpha a2");
    /// let node = doc.find("Alpha").unwrap();
    /// assert_eq!(node.data_at(0), Some(&b"a1"[..]));
    /// assert!(doc.find("Gamma").is_none());
    /// ```
    #[must_use]
    pub fn find(&self, id: impl AsRef<[u8]>) -> Option<&Node<S>> {
        let key = id.as_ref();
        self.children.iter().find(|child| child.id.as_ref() == key)
    }

    /// Mutable variant of [`Node::find`].
    #[must_use]
    pub fn find_mut(&mut self, id: impl AsRef<[u8]>) -> Option<&mut Node<S>> {
        let key = id.as_ref();
        self.children
            .iter_mut()
            .find(|child| child.id.as_ref() == key)
    }

    /// The last child whose id equals `id`.
    #[must_use]
    pub fn rfind(&self, id: impl AsRef<[u8]>) -> Option<&Node<S>> {
        let key = id.as_ref();
        self.children
            .iter()
            .rev()
            .find(|child| child.id.as_ref() == key)
    }

    /// Mutable variant of [`Node::rfind`].
    #[must_use]
    pub fn rfind_mut(&mut self, id: impl AsRef<[u8]>) -> Option<&mut Node<S>> {
        let key = id.as_ref();
        self.children
            .iter_mut()
            .rev()
            .find(|child| child.id.as_ref() == key)
    }

    /// Iterates over the children whose id equals `id`, in source order.
    ///
    /// The iterator is lazy and double-ended; reverse with
    /// [`Iterator::rev`]. The borrow checker prevents mutating
    /// `children` while it is live.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let doc = nodus::from_slice("Alpha a1\nBeta b1\nAlpha a2");
    /// let found: Vec<_> = doc
    ///     .children_with_id("Alpha")
    ///     .filter_map(|n| n.data_str_at(0))
    ///     .collect();
    /// assert_eq!(found, ["a1", "a2"]);
    /// ```
    pub fn children_with_id<'a>(
        &'a self,
        id: impl AsRef<[u8]> + 'a,
    ) -> impl DoubleEndedIterator<Item = &'a Node<S>> + 'a {
        self.children
            .iter()
            .filter(move |child| child.id.as_ref() == id.as_ref())
    }

    /// Mutable variant of [`Node::children_with_id`].
    pub fn children_with_id_mut<'a>(
        &'a mut self,
        id: impl AsRef<[u8]> + 'a,
    ) -> impl DoubleEndedIterator<Item = &'a mut Node<S>> + 'a {
        self.children
            .iter_mut()
            .filter(move |child| child.id.as_ref() == id.as_ref())
    }
}

impl<S: Clone> Node<S> {
    /// Appends copies of `other`'s data and children onto this node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nodus::Document;
    ///
    /// let first = nodus::from_slice("#First\nDummy\n#");
    /// let mut merged = Document::default();
    /// merged.merge(&first);
    /// merged.merge(&nodus::from_slice("#Second\nDummy\n#"));
    ///
    /// assert_eq!(merged.children.len(), 2);
    /// assert!(!first.children.is_empty());
    /// ```
    pub fn merge(&mut self, other: &Node<S>) {
        self.data.extend(other.data.iter().cloned());
        self.children.extend(other.children.iter().cloned());
    }
}

impl<S> Node<S> {
    /// Moves `other`'s data and children onto this node, leaving `other`
    /// with empty data and children.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nodus::Document;
    ///
    /// let mut first = nodus::from_slice("#First\nDummy\n#");
    /// let mut merged = Document::default();
    /// merged.merge_from(&mut first);
    ///
    /// assert_eq!(merged.children.len(), 1);
    /// assert!(first.children.is_empty());
    /// ```
    pub fn merge_from(&mut self, other: &mut Node<S>) {
        self.data.append(&mut other.data);
        self.children.append(&mut other.children);
    }
}

fn cmp_nodes<S, T>(a: &Node<S>, b: &Node<T>) -> Ordering
where
    S: AsRef<[u8]>,
    T: AsRef<[u8]>,
{
    a.id.as_ref()
        .cmp(b.id.as_ref())
        .then_with(|| {
            let lhs = a.data.iter().map(AsRef::as_ref);
            let rhs = b.data.iter().map(AsRef::as_ref);
            lhs.cmp(rhs)
        })
        .then_with(|| {
            let mut lhs = a.children.iter();
            let mut rhs = b.children.iter();
            loop {
                match (lhs.next(), rhs.next()) {
                    (None, None) => return Ordering::Equal,
                    (None, Some(_)) => return Ordering::Less,
                    (Some(_), None) => return Ordering::Greater,
                    (Some(x), Some(y)) => match cmp_nodes(x, y) {
                        Ordering::Equal => {}
                        other => return other,
                    },
                }
            }
        })
}

impl<S, T> PartialEq<Node<T>> for Node<S>
where
    S: AsRef<[u8]>,
    T: AsRef<[u8]>,
{
    fn eq(&self, other: &Node<T>) -> bool {
        cmp_nodes(self, other) == Ordering::Equal
    }
}

impl<S: AsRef<[u8]>> Eq for Node<S> {}

impl<S, T> PartialOrd<Node<T>> for Node<S>
where
    S: AsRef<[u8]>,
    T: AsRef<[u8]>,
{
    fn partial_cmp(&self, other: &Node<T>) -> Option<Ordering> {
        Some(cmp_nodes(self, other))
    }
}

impl<S: AsRef<[u8]>> Ord for Node<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_nodes(self, other)
    }
}
