use warden_compiler::graph::StateIdx;

/// A set of automaton states, stored as a fixed-width bitset.
///
/// The width is fixed at construction to the model's state count, so two
/// sets for the same model can be swapped and cleared without reallocating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSet {
    words: Vec<u64>,
    len: usize,
}

impl StateSet {
    pub fn with_capacity(states: usize) -> Self {
        Self {
            words: vec![0; states.div_ceil(64)],
            len: 0,
        }
    }

    pub fn singleton(states: usize, idx: StateIdx) -> Self {
        let mut set = Self::with_capacity(states);
        set.insert(idx);
        set
    }

    /// Insert a state, returning true if it was not already present.
    pub fn insert(&mut self, idx: StateIdx) -> bool {
        let (word, bit) = split(idx);
        let mask = 1u64 << bit;
        if self.words[word] & mask != 0 {
            return false;
        }
        self.words[word] |= mask;
        self.len += 1;
        true
    }

    pub fn contains(&self, idx: StateIdx) -> bool {
        let (word, bit) = split(idx);
        self.words
            .get(word)
            .is_some_and(|w| w & (1u64 << bit) != 0)
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Members in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = StateIdx> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &bits)| {
            let base = (w * 64) as StateIdx;
            BitIter(bits).map(move |b| base + b)
        })
    }
}

fn split(idx: StateIdx) -> (usize, u32) {
    ((idx / 64) as usize, idx % 64)
}

struct BitIter(u64);

impl Iterator for BitIter {
    type Item = StateIdx;

    fn next(&mut self) -> Option<StateIdx> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(bit)
    }
}
