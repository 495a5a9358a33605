/// A min-heap keyed by an explicit weight, with a stable tie-break.
///
/// Entries of equal weight pop in reverse insertion order (most recent
/// first). Tree construction relies on this: together with seeding leaves in
/// ascending symbol order it pins down one exact tree shape per frequency
/// distribution, so the bit output is reproducible across runs.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    weight: u64,
    seq: u64,
    value: T,
}

impl<T> Entry<T> {
    /// Heap ordering key: lower weight wins, then higher sequence number.
    fn key(&self) -> (u64, std::cmp::Reverse<u64>) {
        (self.weight, std::cmp::Reverse(self.seq))
    }
}

impl<T> MinHeap<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            entries: Vec::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, value: T, weight: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { weight, seq, value });
        self.sift_up(self.entries.len() - 1);
    }

    /// Removes and returns the minimum entry as `(value, weight)`.
    pub fn pop(&mut self) -> Option<(T, u64)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let entry = self.entries.remove(last);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((entry.value, entry.weight))
    }

    /// Removes the two minimum entries at once, or `None` if fewer than two
    /// remain. The first returned pair is the overall minimum.
    pub fn pop_two(&mut self) -> Option<((T, u64), (T, u64))> {
        if self.entries.len() < 2 {
            return None;
        }
        let first = self.pop()?;
        let second = self.pop()?;
        Some((first, second))
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].key() < self.entries[parent].key() {
                self.entries.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.entries.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;
            if left < n && self.entries[left].key() < self.entries[smallest].key() {
                smallest = left;
            }
            if right < n && self.entries[right].key() < self.entries[smallest].key() {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.entries.swap(i, smallest);
            i = smallest;
        }
    }
}
