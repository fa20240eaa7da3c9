use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};
use warden_ir::parse::{parse_file, ParseError};
use warden_ir::types::AutomatonDef;

use crate::graph::{AutomatonModel, State, StateIdx, Transition};
use crate::matcher::{PatternCompileError, SymbolMatcher};
use crate::validate::{validate_def, StructuralError};

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Structural errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Structure(Vec<StructuralError>),

    #[error("Transition #{index}: {source}")]
    Pattern {
        index: usize,
        #[source]
        source: PatternCompileError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Compilation error: {0}")]
    Compile(#[from] CompileError),
}

/// Read, validate and compile an automaton definition file.
pub fn load(path: impl AsRef<Path>) -> Result<AutomatonModel, LoadError> {
    let path = path.as_ref();
    let def = parse_file(path)?;
    let model = compile(&def)?;
    debug!(
        path = %path.display(),
        states = model.state_count(),
        transitions = model.transitions().len(),
        "loaded automaton"
    );
    Ok(model)
}

/// Build an [`AutomatonModel`] from a parsed definition.
///
/// States are materialized first so transitions may reference any of them.
/// Either the whole model is returned or an error; nothing partial escapes.
pub fn compile(def: &AutomatonDef) -> Result<AutomatonModel, CompileError> {
    // 1. Validate
    validate_def(def).map_err(CompileError::Structure)?;

    // 2. States
    let mut index: HashMap<&str, StateIdx> = HashMap::with_capacity(def.states.len());
    let mut states = Vec::with_capacity(def.states.len());
    let mut initial = 0;
    for (idx, s) in def.states.iter().enumerate() {
        let idx = idx as StateIdx;
        index.insert(s.id.as_str(), idx);
        if s.initial {
            initial = idx;
        }
        states.push(State {
            id: s.id.clone(),
            name: s.display_name().to_string(),
            is_initial: s.initial,
            is_final: s.is_final,
        });
    }

    // 3. Transitions, compiling each label once
    let mut transitions = Vec::with_capacity(def.transitions.len());
    for (i, t) in def.transitions.iter().enumerate() {
        let matcher = SymbolMatcher::compile(t.read.as_deref())
            .map_err(|source| CompileError::Pattern { index: i, source })?;
        if matcher.is_multi_symbol_literal() {
            warn!(
                transition = i,
                label = matcher.label(),
                "multi-symbol literal label can never match a single symbol"
            );
        }
        let from = resolve(&index, i, "from", &t.from)?;
        let to = resolve(&index, i, "to", &t.to)?;
        transitions.push(Transition { from, to, matcher });
    }

    let model = AutomatonModel::from_parts(states, transitions, initial);
    let epsilons = model.epsilon_count();
    if epsilons > 0 {
        warn!(
            count = epsilons,
            "epsilon transitions are kept in the model but not followed during simulation"
        );
    }
    Ok(model)
}

/// Map a validated endpoint id to its state index.
fn resolve(
    index: &HashMap<&str, StateIdx>,
    transition: usize,
    endpoint: &'static str,
    id: &str,
) -> Result<StateIdx, CompileError> {
    index.get(id).copied().ok_or_else(|| {
        CompileError::Structure(vec![StructuralError::DanglingTransition {
            index: transition,
            endpoint,
            id: id.to_string(),
        }])
    })
}
