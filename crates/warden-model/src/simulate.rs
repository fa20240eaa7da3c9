//! Word acceptance by subset walk.
//!
//! The automaton may be non-deterministic, so the walk tracks the set of
//! every state reachable after each symbol instead of a single state. A
//! deterministic model is just one whose sets are always singletons.
//!
//! Epsilon transitions are carried by the model but never followed here:
//! a state is only entered by consuming a symbol.

use warden_compiler::graph::{AutomatonModel, StateIdx};

use crate::state::StateSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    pub accepted: bool,
    /// Symbols consumed before the walk ended.
    pub symbols_consumed: usize,
    /// Position of the first symbol no reachable state could consume.
    pub dead_at: Option<usize>,
    /// States reachable after the last consumed symbol. Empty when the walk died.
    pub reached: Vec<StateIdx>,
}

/// Decide whether `model` accepts `word`.
pub fn accepts(model: &AutomatonModel, word: &str) -> bool {
    Simulator::new(model).accepts(word)
}

/// Run `word` through `model` and report where the walk ended.
pub fn simulate(model: &AutomatonModel, word: &str) -> SimulationResult {
    Simulator::new(model).run(word)
}

/// Reusable simulation buffers bound to one model.
///
/// Search drivers keep one per worker so the hot loop does not allocate.
#[derive(Debug, Clone)]
pub struct Simulator<'m> {
    model: &'m AutomatonModel,
    current: StateSet,
    next: StateSet,
}

impl<'m> Simulator<'m> {
    pub fn new(model: &'m AutomatonModel) -> Self {
        let states = model.state_count();
        Self {
            model,
            current: StateSet::with_capacity(states),
            next: StateSet::with_capacity(states),
        }
    }

    pub fn model(&self) -> &'m AutomatonModel {
        self.model
    }

    pub fn accepts(&mut self, word: &str) -> bool {
        match self.walk(word) {
            Some(_) => false,
            None => self.current.iter().any(|s| self.model.is_final(s)),
        }
    }

    pub fn run(&mut self, word: &str) -> SimulationResult {
        match self.walk(word) {
            Some(position) => SimulationResult {
                accepted: false,
                symbols_consumed: position,
                dead_at: Some(position),
                reached: Vec::new(),
            },
            None => {
                let reached: Vec<StateIdx> = self.current.iter().collect();
                SimulationResult {
                    accepted: reached.iter().any(|&s| self.model.is_final(s)),
                    symbols_consumed: word.chars().count(),
                    dead_at: None,
                    reached,
                }
            }
        }
    }

    /// Advance the state set one symbol at a time. Returns the position of
    /// the symbol that emptied the set, or `None` if the whole word was read.
    fn walk(&mut self, word: &str) -> Option<usize> {
        self.current.clear();
        self.current.insert(self.model.initial());

        for (position, symbol) in word.chars().enumerate() {
            self.next.clear();
            for state in self.current.iter() {
                for t in self.model.outgoing(state) {
                    if t.matcher.matches(symbol) {
                        self.next.insert(t.to);
                    }
                }
            }
            if self.next.is_empty() {
                return Some(position);
            }
            std::mem::swap(&mut self.current, &mut self.next);
        }
        None
    }
}
