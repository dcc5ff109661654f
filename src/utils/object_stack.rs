use core::ops::{Index, IndexMut};

/// An arena with stack-discipline deallocation.
///
/// Objects are allocated at the top of the stack and addressed by their index.
/// [`ObjectStack::push`] records the current top and [`ObjectStack::pop`] frees
/// everything allocated since the matching push. Capacity is retained so that
/// a pool reused across queries stops allocating once warmed up.
#[derive(Clone, Debug)]
pub struct ObjectStack<T> {
    objects: Vec<T>,
    markers: Vec<usize>,
}

impl<T> Default for ObjectStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObjectStack<T> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Records the current top of the stack.
    pub fn push(&mut self) {
        self.markers.push(self.objects.len());
    }

    /// Frees all the objects allocated since the last call to `push`.
    ///
    /// Does nothing but log if there is no matching `push`.
    pub fn pop(&mut self) {
        if let Some(top) = self.markers.pop() {
            self.objects.truncate(top);
        } else {
            log::debug!("ObjectStack::pop called without a matching push.");
        }
    }

    /// Allocates `value` at the top of the stack and returns its handle.
    #[inline]
    pub fn alloc(&mut self, value: T) -> usize {
        self.objects.push(value);
        self.objects.len() - 1
    }

    /// Frees every object and every marker.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.markers.clear();
    }

    /// The number of live objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Is this stack empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The number of objects this stack can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.objects.capacity()
    }
}

impl<T> Index<usize> for ObjectStack<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.objects[i]
    }
}

impl<T> IndexMut<usize> for ObjectStack<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.objects[i]
    }
}
