use warden_ir::parse::{parse_file, parse_jff, parse_json, ParseError};

#[test]
fn test_parse_lowercase_fixture() {
    let xml = include_str!("fixtures/lowercase.jff");
    let def = parse_jff(xml).unwrap();

    assert_eq!(def.states.len(), 2);
    assert_eq!(def.transitions.len(), 2);

    let s0 = &def.states[0];
    assert_eq!(s0.id, "0");
    assert_eq!(s0.display_name(), "s0");
    assert!(s0.initial);
    assert!(!s0.is_final);

    let s1 = &def.states[1];
    assert!(!s1.initial);
    assert!(s1.is_final);

    assert_eq!(def.transitions[0].from, "0");
    assert_eq!(def.transitions[0].to, "1");
    assert_eq!(def.transitions[0].read.as_deref(), Some("[a-z]"));
}

#[test]
fn test_parse_empty_read_is_epsilon() {
    let xml = include_str!("fixtures/ends_with_ab.jff");
    let def = parse_jff(xml).unwrap();

    let epsilons: Vec<_> = def.transitions.iter().filter(|t| t.is_epsilon()).collect();
    assert_eq!(epsilons.len(), 1);
    assert_eq!(epsilons[0].from, "0");
    assert_eq!(epsilons[0].to, "2");
}

#[test]
fn test_parse_missing_read_element_is_epsilon() {
    let xml = r#"<structure><automaton>
        <state id="0" name="a"><initial/></state>
        <state id="1" name="b"><final/></state>
        <transition><from>0</from><to>1</to></transition>
    </automaton></structure>"#;
    let def = parse_jff(xml).unwrap();
    assert_eq!(def.transitions[0].read, None);
    assert!(def.transitions[0].is_epsilon());
}

#[test]
fn test_parse_keeps_whitespace_label() {
    let xml = r#"<automaton>
        <state id="0"><initial/></state>
        <transition><from> 0 </from><to>0</to><read> </read></transition>
    </automaton>"#;
    let def = parse_jff(xml).unwrap();
    assert_eq!(def.transitions[0].from, "0");
    assert_eq!(def.transitions[0].read.as_deref(), Some(" "));
}

#[test]
fn test_parse_missing_name_falls_back_to_id() {
    let xml = r#"<automaton><state id="7"><initial/></state></automaton>"#;
    let def = parse_jff(xml).unwrap();
    assert_eq!(def.states[0].display_name(), "7");
}

#[test]
fn test_parse_malformed_xml() {
    let result = parse_jff("<structure><automaton><state id=\"0\">");
    assert!(matches!(result, Err(ParseError::Xml(_))));
}

#[test]
fn test_parse_state_without_id() {
    let result = parse_jff(r#"<automaton><state name="x"/></automaton>"#);
    assert!(matches!(
        result,
        Err(ParseError::MissingAttribute {
            element: "state",
            attribute: "id"
        })
    ));
}

#[test]
fn test_parse_transition_without_to() {
    let xml = r#"<automaton>
        <state id="0"><initial/></state>
        <transition><from>0</from><to>0</to><read>a</read></transition>
        <transition><from>0</from><read>b</read></transition>
    </automaton>"#;
    let result = parse_jff(xml);
    assert!(matches!(
        result,
        Err(ParseError::MissingElement {
            index: 1,
            element: "to"
        })
    ));
}

#[test]
fn test_parse_json_definition() {
    let json = r#"{
        "states": [
            { "id": "s0", "initial": true },
            { "id": "s1", "name": "done", "final": true }
        ],
        "transitions": [
            { "from": "s0", "to": "s1", "read": "[0-9]" },
            { "from": "s1", "to": "s0" }
        ]
    }"#;
    let def = parse_json(json).unwrap();
    assert_eq!(def.states.len(), 2);
    assert!(def.states[0].initial);
    assert!(def.states[1].is_final);
    assert_eq!(def.states[1].display_name(), "done");
    assert!(def.transitions[1].is_epsilon());
}

#[test]
fn test_parse_json_invalid() {
    assert!(matches!(parse_json("not json"), Err(ParseError::Json(_))));
}

#[test]
fn test_parse_file_missing() {
    let result = parse_file("/definitely/not/here.jff");
    assert!(matches!(result, Err(ParseError::Io { .. })));
}

#[test]
fn test_parse_strong_fixture_counts() {
    let def = parse_jff(include_str!("fixtures/strong.jff")).unwrap();
    assert_eq!(def.states.iter().filter(|s| s.initial).count(), 1);
    assert!(def.states.iter().any(|s| s.is_final));
    assert!(def
        .transitions
        .iter()
        .any(|t| t.read.as_deref() == Some("[!@#$%&*-_=+/?]")));
}
