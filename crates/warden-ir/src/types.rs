use serde::{Deserialize, Serialize};

/// Raw automaton definition, exactly as read from the interchange document.
///
/// Nothing here is validated: ids may repeat, transitions may point at
/// unknown states and labels may be malformed. `warden-compiler` turns this
/// into a checked model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutomatonDef {
    #[serde(default)]
    pub states: Vec<StateDef>,
    #[serde(default)]
    pub transitions: Vec<TransitionDef>,
}

// ── States ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDef {
    pub id: String,
    /// Display name. Documents without one fall back to the id.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub initial: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

impl StateDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            initial: false,
            is_final: false,
        }
    }

    pub fn initial(mut self) -> Self {
        self.initial = true;
        self
    }

    pub fn accepting(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

// ── Transitions ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDef {
    pub from: String,
    pub to: String,
    /// Read label. `None` or an empty string marks an epsilon transition.
    #[serde(default)]
    pub read: Option<String>,
}

impl TransitionDef {
    pub fn new(from: impl Into<String>, to: impl Into<String>, read: &str) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            read: Some(read.to_string()),
        }
    }

    pub fn epsilon(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            read: None,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.read.as_deref().map_or(true, str::is_empty)
    }
}

impl AutomatonDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: StateDef) -> Self {
        self.states.push(state);
        self
    }

    pub fn with_transition(mut self, transition: TransitionDef) -> Self {
        self.transitions.push(transition);
        self
    }
}
