//! Brute-force search space and its enumeration order.
//!
//! Candidates are ordered by increasing length, then within a length as the
//! Cartesian product of the alphabet in alphabet order, rightmost position
//! varying fastest. Ordinals are 0-based positions in that order and are
//! stable across runs.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpaceError {
    #[error("Alphabet is empty")]
    EmptyAlphabet,

    #[error("Alphabet repeats symbol '{0}'")]
    DuplicateSymbol(char),

    #[error("Minimum length must be at least 1")]
    ZeroLength,

    #[error("Invalid length range: min ({min}) > max ({max})")]
    InvertedRange { min: usize, max: usize },
}

/// An ordered, duplicate-free alphabet and an inclusive length range.
#[derive(Debug, Clone)]
pub struct SearchSpaceSpec {
    alphabet: Vec<char>,
    positions: HashMap<char, usize>,
    min_len: usize,
    max_len: usize,
}

impl SearchSpaceSpec {
    pub fn new(
        alphabet: impl IntoIterator<Item = char>,
        min_len: usize,
        max_len: usize,
    ) -> Result<Self, SpaceError> {
        let alphabet: Vec<char> = alphabet.into_iter().collect();
        if alphabet.is_empty() {
            return Err(SpaceError::EmptyAlphabet);
        }
        if min_len == 0 {
            return Err(SpaceError::ZeroLength);
        }
        if min_len > max_len {
            return Err(SpaceError::InvertedRange {
                min: min_len,
                max: max_len,
            });
        }

        let mut positions = HashMap::with_capacity(alphabet.len());
        for (pos, &c) in alphabet.iter().enumerate() {
            if positions.insert(c, pos).is_some() {
                return Err(SpaceError::DuplicateSymbol(c));
            }
        }

        Ok(Self {
            alphabet,
            positions,
            min_len,
            max_len,
        })
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Number of candidates of exactly `len` symbols (saturating).
    pub fn size_of_length(&self, len: usize) -> u128 {
        let base = self.alphabet.len() as u128;
        (0..len).fold(1u128, |acc, _| acc.saturating_mul(base))
    }

    /// Σ alphabet^len over the length range (saturating).
    pub fn total_size(&self) -> u128 {
        (self.min_len..=self.max_len).fold(0u128, |acc, len| {
            acc.saturating_add(self.size_of_length(len))
        })
    }

    /// Ordinal of the first candidate with `len` symbols.
    fn length_offset(&self, len: usize) -> u128 {
        (self.min_len..len).fold(0u128, |acc, l| acc.saturating_add(self.size_of_length(l)))
    }

    /// Candidate at a given ordinal, or `None` past the end of the space.
    pub fn candidate_at(&self, ordinal: u64) -> Option<String> {
        let (len, digits) = self.unrank(ordinal)?;
        debug_assert_eq!(digits.len(), len);
        Some(digits.iter().map(|&d| self.alphabet[d]).collect())
    }

    /// Ordinal of `word`, or `None` if it is outside the space.
    pub fn ordinal_of(&self, word: &str) -> Option<u64> {
        let len = word.chars().count();
        if len < self.min_len || len > self.max_len {
            return None;
        }
        let base = self.alphabet.len() as u128;
        let mut within = 0u128;
        for c in word.chars() {
            let pos = *self.positions.get(&c)?;
            within = within.checked_mul(base)?.checked_add(pos as u128)?;
        }
        u64::try_from(self.length_offset(len).checked_add(within)?).ok()
    }

    /// Every candidate, in enumeration order.
    pub fn candidates(&self) -> Candidates<'_> {
        self.candidates_from(0)
    }

    /// Candidates starting at `ordinal`.
    pub fn candidates_from(&self, ordinal: u64) -> Candidates<'_> {
        match self.unrank(ordinal) {
            Some((len, digits)) => Candidates::new(self, ordinal, len, digits),
            None => Candidates::exhausted(self),
        }
    }

    fn unrank(&self, ordinal: u64) -> Option<(usize, Vec<usize>)> {
        let base = self.alphabet.len() as u128;
        let mut rest = ordinal as u128;
        for len in self.min_len..=self.max_len {
            let size = self.size_of_length(len);
            if rest < size {
                let mut digits = vec![0usize; len];
                for slot in digits.iter_mut().rev() {
                    *slot = (rest % base) as usize;
                    rest /= base;
                }
                return Some((len, digits));
            }
            rest -= size;
        }
        None
    }
}

/// Odometer over the search space.
///
/// [`Candidates::next_candidate`] lends the current word without allocating;
/// the `Iterator` impl clones it.
#[derive(Debug, Clone)]
pub struct Candidates<'s> {
    spec: &'s SearchSpaceSpec,
    digits: Vec<usize>,
    len: usize,
    ordinal: u64,
    word: String,
    done: bool,
    started: bool,
}

impl<'s> Candidates<'s> {
    fn new(spec: &'s SearchSpaceSpec, ordinal: u64, len: usize, digits: Vec<usize>) -> Self {
        Self {
            spec,
            digits,
            len,
            ordinal,
            word: String::with_capacity(spec.max_len * 4),
            done: false,
            started: false,
        }
    }

    fn exhausted(spec: &'s SearchSpaceSpec) -> Self {
        Self {
            spec,
            digits: Vec::new(),
            len: 0,
            ordinal: 0,
            word: String::new(),
            done: true,
            started: true,
        }
    }

    /// Advance and return the next `(ordinal, candidate)`.
    pub fn next_candidate(&mut self) -> Option<(u64, &str)> {
        if self.done {
            return None;
        }
        if self.started {
            if !self.step() {
                self.done = true;
                return None;
            }
            self.ordinal += 1;
        }
        self.started = true;

        self.word.clear();
        let spec = self.spec;
        let alphabet = spec.alphabet();
        self.word.extend(self.digits.iter().map(|&d| alphabet[d]));
        Some((self.ordinal, &self.word))
    }

    /// Move the odometer one position. Returns false past the last length.
    fn step(&mut self) -> bool {
        let base = self.spec.alphabet.len();
        for slot in self.digits.iter_mut().rev() {
            *slot += 1;
            if *slot < base {
                return true;
            }
            *slot = 0;
        }
        if self.len >= self.spec.max_len {
            return false;
        }
        self.len += 1;
        self.digits = vec![0; self.len];
        true
    }
}

impl Iterator for Candidates<'_> {
    type Item = (u64, String);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_candidate().map(|(ord, word)| (ord, word.to_string()))
    }
}
