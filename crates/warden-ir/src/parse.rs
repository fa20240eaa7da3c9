use std::path::{Path, PathBuf};

use crate::types::{AutomatonDef, StateDef, TransitionDef};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("<{element}> element is missing the '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("transition #{index} has no <{element}> element")]
    MissingElement {
        index: usize,
        element: &'static str,
    },

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse a JFLAP `.jff` document.
///
/// States and transitions are collected from anywhere in the tree, so both
/// plain `<automaton>` documents and wrapped `<structure>` documents work.
pub fn parse_jff(xml: &str) -> Result<AutomatonDef, ParseError> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut def = AutomatonDef::new();

    for node in doc.descendants().filter(|n| n.has_tag_name("state")) {
        let id = node.attribute("id").ok_or(ParseError::MissingAttribute {
            element: "state",
            attribute: "id",
        })?;
        def.states.push(StateDef {
            id: id.trim().to_string(),
            name: node.attribute("name").map(str::to_string),
            initial: has_child(node, "initial"),
            is_final: has_child(node, "final"),
        });
    }

    for (index, node) in doc
        .descendants()
        .filter(|n| n.has_tag_name("transition"))
        .enumerate()
    {
        let from = child_text(node, "from").ok_or(ParseError::MissingElement {
            index,
            element: "from",
        })?;
        let to = child_text(node, "to").ok_or(ParseError::MissingElement {
            index,
            element: "to",
        })?;
        // The read label is kept verbatim: a single space is a valid symbol.
        let read = node
            .children()
            .find(|c| c.has_tag_name("read"))
            .and_then(|c| c.text())
            .map(str::to_string);

        def.transitions.push(TransitionDef {
            from: from.trim().to_string(),
            to: to.trim().to_string(),
            read,
        });
    }

    Ok(def)
}

/// Parse the JSON mirror of the definition document.
pub fn parse_json(json: &str) -> Result<AutomatonDef, ParseError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a definition file, picking the format from its extension.
///
/// `.json` is parsed as JSON; everything else (`.jff`, `.xml`) as JFLAP XML.
pub fn parse_file(path: impl AsRef<Path>) -> Result<AutomatonDef, ParseError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        parse_json(&text)
    } else {
        parse_jff(&text)
    }
}

fn has_child(node: roxmltree::Node<'_, '_>, tag: &str) -> bool {
    node.children().any(|c| c.has_tag_name(tag))
}

fn child_text<'a>(node: roxmltree::Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .map(|c| c.text().unwrap_or(""))
}
