//! LIFO stack backed by a singly linked chain of owned nodes.

use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::error::Error;

struct Node<T> {
    elem: T,
    next: Option<Box<Node<T>>>,
}

/// A LIFO stack with O(1) push and pop.
///
/// `head` owns the top node; every node owns its successor, so no tail
/// bookkeeping is needed.
pub struct Stack<T> {
    head: Option<Box<Node<T>>>,
    len: usize,
}

impl<T> Stack<T> {
    /// Creates an empty stack. Does not allocate.
    pub fn new() -> Self {
        Stack { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pushes `elem` on top of the stack.
    pub fn push(&mut self, elem: T) {
        let node = Box::new(Node {
            elem,
            next: self.head.take(),
        });
        self.head = Some(node);
        self.len += 1;
    }

    /// Removes and returns the top element, or `None` if the stack is
    /// empty.
    pub fn pop(&mut self) -> Option<T> {
        let node = self.head.take()?;
        let node = *node;
        self.head = node.next;
        self.len -= 1;
        Some(node.elem)
    }

    /// Borrows the top element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.head.as_deref().map(|node| &node.elem)
    }

    /// Copies the elements into a `Vec` in LIFO order, top first.
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Copies the elements into a `Vec` in push order, earliest first.
    /// This is the ordering the JSON codec uses.
    pub fn list_values(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = self.values();
        values.reverse();
        values
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        // One node at a time; letting the chain drop as a unit would
        // recurse `len` deep.
        while self.pop().is_some() {}
    }

    fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl<T: Serialize> Stack<T> {
    /// Encodes the stack as a JSON array in push order: index 0 is the
    /// bottom, the last element is the top.
    pub fn to_json(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl<T> Stack<T>
where
    T: serde::de::DeserializeOwned,
{
    /// Replaces the stack's contents with the elements of a JSON array,
    /// pushed in array order so the last element becomes the top. The
    /// input is decoded in full before the stack is touched, so any
    /// failure leaves it unchanged.
    pub fn from_json(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let elems: Vec<T> = serde_json::from_slice(bytes)?;
        self.clear();
        for elem in elems {
            self.push(elem);
        }
        Ok(())
    }
}

impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Log format: `LinkedListStack: <json>`, with the same JSON body as
/// [`Stack::to_json`].
impl<T: Serialize> fmt::Display for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "LinkedListStack: {json}")
    }
}

impl<T: Serialize> Serialize for Stack<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // The chain runs top-to-bottom; the wire format is push order.
        let elems: Vec<&T> = self.iter().collect();
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for elem in elems.into_iter().rev() {
            seq.serialize_element(elem)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Stack<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let elems = Vec::<T>::deserialize(deserializer)?;
        let mut stack = Stack::new();
        for elem in elems {
            stack.push(elem);
        }
        Ok(stack)
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
    stack: Stack<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.stack.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.stack.len();
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for Stack<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Consumes the stack, yielding elements top first.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter { stack: self }
    }
}
