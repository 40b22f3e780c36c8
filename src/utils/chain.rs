use std::fmt::{self, Display, Formatter};
use std::iter::successors;
use std::ops::{Index, IndexMut};

use itertools::Itertools;

/// Stable handle to a node of a [`Chain`]. Handles stay valid after the node
/// is unlinked, they just stop being reachable from the head.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Doubly linked list stored in an arena, so that splicing is O(1) and nodes
/// can be addressed by position without shared mutable pointers.
#[derive(Debug)]
pub struct Chain<T> {
    nodes: Vec<Node<T>>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl<T> Chain<T> {
    pub fn new() -> Self {
        Chain {
            nodes: vec![],
            head: None,
            tail: None,
        }
    }

    pub fn push_back(&mut self, value: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.nodes[tail.0].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].prev
    }

    /// Splices `id` out of the chain, joining its neighbours.
    pub fn unlink(&mut self, id: NodeId) {
        let (prev, next) = (self.prev(id), self.next(id));
        match prev {
            Some(prev) => self.nodes[prev.0].next = next,
            None if self.head == Some(id) => self.head = next,
            None => {}
        }
        match next {
            Some(next) => self.nodes[next.0].prev = prev,
            None if self.tail == Some(id) => self.tail = prev,
            None => {}
        }
        let node = &mut self.nodes[id.0];
        node.prev = None;
        node.next = None;
    }

    /// Walks forward from `start` (inclusive) along `next` links.
    pub fn walk_from(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        successors(Some(start), move |&id| self.next(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        successors(self.head, move |&id| self.next(id))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.ids().map(move |id| &self[id])
    }

    pub fn len(&self) -> usize {
        self.ids().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for Chain<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        &self.nodes[id.0].value
    }
}

impl<T> IndexMut<NodeId> for Chain<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.0].value
    }
}

impl<T: Display> Display for Chain<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values().join(" "))
    }
}
