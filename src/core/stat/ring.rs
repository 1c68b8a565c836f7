use crate::utils;

/// Ring is a fixed-capacity circular buffer. The requested capacity is
/// rounded up to the next power of two so wrap-around is a single mask,
/// and pushing into a full ring overwrites the oldest element.
#[derive(Debug)]
pub struct Ring<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    count: usize,
    mask: usize,
}

impl<T> Ring<T> {
    pub fn new(cap: usize) -> Self {
        let cap = utils::next_power_of_two(cap);
        Ring {
            slots: (0..cap).map(|_| None).collect(),
            head: 0,
            tail: 0,
            count: 0,
            mask: cap.wrapping_sub(1),
        }
    }

    /// Resets the indices. Slot contents are left in place; the owner
    /// re-initializes them when it wants a clean state.
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn cap(&self) -> usize {
        self.slots.len()
    }

    pub fn head(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    pub fn tail(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.tail.wrapping_sub(1) & self.mask].as_ref()
    }

    /// Returns the element `i` positions after the head. The index is
    /// interpreted modulo the capacity; negative indices wrap to the
    /// tail side, so `at(-1)` is the most recently pushed element.
    pub fn at(&self, i: isize) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.head.wrapping_add(i as usize) & self.mask].as_ref()
    }

    pub fn at_mut(&mut self, i: isize) -> Option<&mut T> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.head.wrapping_add(i as usize) & self.mask].as_mut()
    }

    pub fn push(&mut self, value: T) {
        if self.slots.is_empty() {
            return;
        }
        self.slots[self.tail] = Some(value);
        self.tail = (self.tail + 1) & self.mask;
        if self.count < self.cap() {
            self.count += 1;
        } else {
            self.head = (self.head + 1) & self.mask;
        }
    }

    pub fn values(&self) -> &[Option<T>] {
        &self.slots
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn capacity_is_power_of_two() {
        for n in 1..200usize {
            let r = Ring::<i32>::new(n);
            let cap = r.cap();
            assert!(cap.is_power_of_two(), "cap {} for request {}", cap, n);
            assert!(cap >= n);
        }
        assert_eq!(Ring::<i32>::new(0).cap(), 0);
    }

    #[test]
    fn push() {
        let mut r = Ring::new(3);
        assert_eq!(r.len(), 0);
        assert_eq!(r.cap(), 4);

        // first loop
        r.push(1);
        assert_eq!(r.len(), 1);
        assert_eq!(r.head(), Some(&1));
        assert_eq!(r.tail(), Some(&1));

        r.push(2);
        r.push(3);
        r.push(4);
        assert_eq!(r.len(), 4);
        assert_eq!(r.cap(), 4);
        assert_eq!(r.head(), Some(&1));
        assert_eq!(r.tail(), Some(&4));

        // second loop, overwriting the oldest
        r.push(5);
        assert_eq!(r.len(), 4);
        assert_eq!(r.head(), Some(&2));
        assert_eq!(r.tail(), Some(&5));

        r.push(6);
        assert_eq!(r.len(), 4);
        assert_eq!(r.head(), Some(&3));
        assert_eq!(r.tail(), Some(&6));
    }

    #[test]
    fn overwrite_keeps_len_full() {
        let mut r = Ring::new(4);
        for i in 0..11 {
            r.push(i);
        }
        assert_eq!(r.len(), r.cap());
        // the oldest pushes are gone; the head is the oldest survivor
        assert_eq!(r.head(), Some(&7));
        assert_eq!(r.tail(), Some(&10));
    }

    #[test]
    fn reset() {
        let mut r = Ring::new(3);
        r.push(1);
        r.push(2);
        r.push(3);
        r.push(4);
        assert_eq!(r.len(), 4);

        r.reset();
        assert_eq!(r.len(), 0);
        assert_eq!(r.cap(), 4);
        assert_eq!(r.head(), None);
        assert_eq!(r.tail(), None);

        r.push(7);
        r.push(8);
        r.push(9);
        r.push(10);
        assert_eq!(r.len(), 4);
        assert_eq!(r.head(), Some(&7));
        assert_eq!(r.tail(), Some(&10));
    }

    #[test]
    fn at() {
        let mut r = Ring::new(3);
        r.push(1);
        r.push(2);
        r.push(3);
        r.push(4);

        assert_eq!(r.at(0), Some(&1));
        assert_eq!(r.at(1), Some(&2));
        assert_eq!(r.at(2), Some(&3));
        assert_eq!(r.at(3), Some(&4));
        assert_eq!(r.at(-1), Some(&4));
        assert_eq!(r.at(-2), Some(&3));

        // second loop
        r.push(5);
        r.push(6);

        assert_eq!(r.at(0), Some(&3));
        assert_eq!(r.at(1), Some(&4));
        assert_eq!(r.at(2), Some(&5));
        assert_eq!(r.at(3), Some(&6));
        assert_eq!(r.at(-1), Some(&6));
        assert_eq!(r.at(-2), Some(&5));
    }

    #[test]
    fn values() {
        let mut r = Ring::new(3);
        r.push(1);
        r.push(2);
        r.push(3);
        assert_eq!(r.values(), &[Some(1), Some(2), Some(3), None]);

        r.push(4);
        r.push(5);
        r.push(6);
        assert_eq!(r.values(), &[Some(5), Some(6), Some(3), Some(4)]);
    }
}
