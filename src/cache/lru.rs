//! LRU List Module
//!
//! Implements the recency order used for LRU eviction and ordered iteration.

// == Node Handle ==
/// Stable handle to a node in an [`LruList`].
///
/// A handle stays valid until its node is removed; slots are reused afterwards.
pub(crate) type NodeId = usize;

#[derive(Debug)]
struct Node<T> {
    item: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

// == LRU List ==
/// Doubly linked list stored in a slab, ordered by recency.
///
/// - Front = Least recently used
/// - Back = Most recently used
///
/// Push, remove and move-to-back are all O(1) given a [`NodeId`].
#[derive(Debug)]
pub(crate) struct LruList<T> {
    /// Node storage, None marks a free slot
    slots: Vec<Option<Node<T>>>,
    /// Free slot indices available for reuse
    free: Vec<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Back ==
    /// Appends an item at the most recently used end and returns its handle.
    pub(crate) fn push_back(&mut self, item: T) -> NodeId {
        let node = Node {
            item,
            prev: None,
            next: None,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.link_back(id);
        self.len += 1;
        id
    }

    // == Move To Back ==
    /// Marks a node as most recently used.
    pub(crate) fn move_to_back(&mut self, id: NodeId) {
        if self.tail == Some(id) || self.node(id).is_none() {
            return;
        }
        self.unlink(id);
        self.link_back(id);
    }

    // == Remove ==
    /// Removes a node and returns its item.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        self.node(id)?;
        self.unlink(id);
        let node = self.slots[id].take()?;
        self.free.push(id);
        self.len -= 1;
        Some(node.item)
    }

    // == Pop Front ==
    /// Removes and returns the least recently used item.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        self.remove(id)
    }

    // == Front ==
    /// Returns the handle of the least recently used node.
    #[cfg(test)]
    pub(crate) fn front(&self) -> Option<NodeId> {
        self.head
    }

    // == Accessors ==
    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.item)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(|node| &mut node.item)
    }

    /// Iterates from least to most recently used.
    pub(crate) fn iter(&self) -> LruIter<'_, T> {
        LruIter {
            list: self,
            cursor: self.head,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }

    /// Detaches a node from its neighbours without freeing its slot.
    fn unlink(&mut self, id: NodeId) {
        let (prev, next) = match self.node(id) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev.and_then(|p| self.node_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }
    }

    /// Attaches a detached node at the back.
    fn link_back(&mut self, id: NodeId) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(id) {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail.and_then(|t| self.node_mut(t)) {
            Some(tail_node) => tail_node.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// == Iterator ==
/// Recency-ordered iterator over an [`LruList`], oldest first.
pub(crate) struct LruIter<'a, T> {
    list: &'a LruList<T>,
    cursor: Option<NodeId>,
}

impl<'a, T> Iterator for LruIter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.list.node(id)?;
        self.cursor = node.next;
        Some((id, &node.item))
    }
}
