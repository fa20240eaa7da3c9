use std::collections::HashSet;

use warden_ir::types::AutomatonDef;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructuralError {
    #[error("Automaton has no states")]
    NoStates,

    #[error("No state is marked initial")]
    NoInitialState,

    #[error("Multiple initial states: {}", .ids.join(", "))]
    MultipleInitialStates { ids: Vec<String> },

    #[error("Duplicate state id '{id}'")]
    DuplicateStateId { id: String },

    #[error("Dangling transition #{index}: '{endpoint}' state '{id}' doesn't exist")]
    DanglingTransition {
        index: usize,
        endpoint: &'static str,
        id: String,
    },
}

/// Check the structural invariants of a definition, collecting every
/// violation rather than stopping at the first.
pub fn validate_def(def: &AutomatonDef) -> Result<(), Vec<StructuralError>> {
    let mut errors = Vec::new();
    validate_states(def, &mut errors);
    validate_initial(def, &mut errors);
    validate_transition_refs(def, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Non-empty state set with unique ids.
fn validate_states(def: &AutomatonDef, errors: &mut Vec<StructuralError>) {
    if def.states.is_empty() {
        errors.push(StructuralError::NoStates);
        return;
    }
    let mut seen = HashSet::new();
    for state in &def.states {
        if !seen.insert(state.id.as_str()) {
            errors.push(StructuralError::DuplicateStateId {
                id: state.id.clone(),
            });
        }
    }
}

/// Exactly one initial state.
fn validate_initial(def: &AutomatonDef, errors: &mut Vec<StructuralError>) {
    if def.states.is_empty() {
        return;
    }
    let initial: Vec<String> = def
        .states
        .iter()
        .filter(|s| s.initial)
        .map(|s| s.id.clone())
        .collect();
    match initial.len() {
        0 => errors.push(StructuralError::NoInitialState),
        1 => {}
        _ => errors.push(StructuralError::MultipleInitialStates { ids: initial }),
    }
}

/// Every transition endpoint names a declared state.
fn validate_transition_refs(def: &AutomatonDef, errors: &mut Vec<StructuralError>) {
    let ids: HashSet<&str> = def.states.iter().map(|s| s.id.as_str()).collect();
    for (index, t) in def.transitions.iter().enumerate() {
        if !ids.contains(t.from.as_str()) {
            errors.push(StructuralError::DanglingTransition {
                index,
                endpoint: "from",
                id: t.from.clone(),
            });
        }
        if !ids.contains(t.to.as_str()) {
            errors.push(StructuralError::DanglingTransition {
                index,
                endpoint: "to",
                id: t.to.clone(),
            });
        }
    }
}
