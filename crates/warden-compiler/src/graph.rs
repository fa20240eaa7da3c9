use std::collections::HashMap;

use crate::matcher::SymbolMatcher;

/// Dense index of a state inside an [`AutomatonModel`].
pub type StateIdx = u32;

#[derive(Debug, Clone)]
pub struct State {
    /// Id from the definition document.
    pub id: String,
    pub name: String,
    pub is_initial: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub from: StateIdx,
    pub to: StateIdx,
    pub matcher: SymbolMatcher,
}

/// A validated, immutable automaton.
///
/// Only built by [`crate::compile::compile`], which guarantees a non-empty
/// state set, exactly one initial state and in-range transition endpoints.
/// Exposes graph queries only; simulation lives in `warden-model`.
#[derive(Debug, Clone)]
pub struct AutomatonModel {
    states: Vec<State>,
    transitions: Vec<Transition>,
    /// Transition indices per source state, in document order.
    outgoing: Vec<Vec<usize>>,
    by_id: HashMap<String, StateIdx>,
    initial: StateIdx,
}

impl AutomatonModel {
    pub(crate) fn from_parts(
        states: Vec<State>,
        transitions: Vec<Transition>,
        initial: StateIdx,
    ) -> Self {
        let mut outgoing = vec![Vec::new(); states.len()];
        for (idx, t) in transitions.iter().enumerate() {
            outgoing[t.from as usize].push(idx);
        }
        let by_id = states
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.id.clone(), idx as StateIdx))
            .collect();
        Self {
            states,
            transitions,
            outgoing,
            by_id,
            initial,
        }
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, idx: StateIdx) -> &State {
        &self.states[idx as usize]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Look up a state by its document id.
    pub fn state_by_id(&self, id: &str) -> Option<StateIdx> {
        self.by_id.get(id).copied()
    }

    pub fn initial(&self) -> StateIdx {
        self.initial
    }

    pub fn is_final(&self, idx: StateIdx) -> bool {
        self.states[idx as usize].is_final
    }

    pub fn final_states(&self) -> impl Iterator<Item = StateIdx> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_final)
            .map(|(idx, _)| idx as StateIdx)
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Transitions leaving `idx`, in document order.
    pub fn outgoing(&self, idx: StateIdx) -> impl Iterator<Item = &Transition> + '_ {
        self.outgoing[idx as usize]
            .iter()
            .map(move |&t| &self.transitions[t])
    }

    pub fn epsilon_count(&self) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.matcher.is_epsilon())
            .count()
    }

    /// True when no state has two non-epsilon transitions that can both
    /// consume the same symbol.
    ///
    /// Overlap is checked exhaustively over ASCII and over the literal
    /// symbols the model mentions; non-ASCII class overlap is not probed.
    pub fn is_deterministic(&self) -> bool {
        let mut probes: Vec<char> = (0u8..128).map(char::from).collect();
        for t in &self.transitions {
            if let SymbolMatcher::Literal(text) = &t.matcher {
                let mut chars = text.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    if !c.is_ascii() {
                        probes.push(c);
                    }
                }
            }
        }

        self.outgoing.iter().all(|edges| {
            probes.iter().all(|&symbol| {
                edges
                    .iter()
                    .filter(|&&t| self.transitions[t].matcher.matches(symbol))
                    .count()
                    <= 1
            })
        })
    }
}
