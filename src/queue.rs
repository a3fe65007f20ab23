//! FIFO queue backed by a singly linked chain of owned nodes.

use std::fmt;
use std::ptr::NonNull;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::error::Error;

struct Node<T> {
    elem: T,
    next: Option<Box<Node<T>>>,
}

/// A FIFO queue with O(1) enqueue and dequeue.
///
/// `head` owns the first node and, transitively, the whole chain. `tail`
/// is a non-owning pointer to the last node so that enqueue does not have
/// to walk the chain; it is `None` exactly when the queue is empty.
pub struct Queue<T> {
    head: Option<Box<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
}

// The tail pointer only ever aliases a node the queue itself owns.
unsafe impl<T: Send> Send for Queue<T> {}
unsafe impl<T: Sync> Sync for Queue<T> {}

impl<T> Queue<T> {
    /// Creates an empty queue. Does not allocate.
    pub fn new() -> Self {
        Queue {
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `elem` at the tail.
    pub fn enqueue(&mut self, elem: T) {
        let node = Box::new(Node { elem, next: None });
        match self.tail {
            Some(mut tail) => {
                // Writing through `tail` is sound: it points to the last
                // node of the chain, which `head` keeps alive.
                let tail = unsafe { tail.as_mut() };
                tail.next = Some(node);
                self.tail = tail.next.as_deref_mut().map(NonNull::from);
            }
            None => {
                self.head = Some(node);
                self.tail = self.head.as_deref_mut().map(NonNull::from);
            }
        }
        self.len += 1;
    }

    /// Removes and returns the front element, or `None` if the queue is
    /// empty.
    pub fn dequeue(&mut self) -> Option<T> {
        let node = self.head.take()?;
        let node = *node;
        self.head = node.next;
        if self.head.is_none() {
            // Emptied: the tail would otherwise dangle into the freed node.
            self.tail = None;
        }
        self.len -= 1;
        Some(node.elem)
    }

    /// Borrows the front element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.head.as_deref().map(|node| &node.elem)
    }

    /// Copies the elements into a `Vec` in dequeue order, front first.
    /// The result is independent of the queue.
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        // One node at a time; letting the chain drop as a unit would
        // recurse `len` deep.
        while self.dequeue().is_some() {}
    }

    fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl<T: Serialize> Queue<T> {
    /// Encodes the queue as a JSON array in dequeue order.
    pub fn to_json(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl<T> Queue<T>
where
    T: serde::de::DeserializeOwned,
{
    /// Replaces the queue's contents with the elements of a JSON array,
    /// in array order. The input is decoded in full before the queue is
    /// touched, so any failure leaves it unchanged.
    pub fn from_json(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let elems: Vec<T> = serde_json::from_slice(bytes)?;
        self.clear();
        for elem in elems {
            self.enqueue(elem);
        }
        Ok(())
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Log format: `LinkedListQueue: <json>`, with the same JSON body as
/// [`Queue::to_json`].
impl<T: Serialize> fmt::Display for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "LinkedListQueue: {json}")
    }
}

impl<T: Serialize> Serialize for Queue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for elem in self.iter() {
            seq.serialize_element(elem)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Queue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let elems = Vec::<T>::deserialize(deserializer)?;
        let mut queue = Queue::new();
        for elem in elems {
            queue.enqueue(elem);
        }
        Ok(queue)
    }
}

struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(&node.elem)
    }
}

pub struct IntoIter<T> {
    queue: Queue<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.dequeue()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len();
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for Queue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Consumes the queue, yielding elements in dequeue order.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter { queue: self }
    }
}
