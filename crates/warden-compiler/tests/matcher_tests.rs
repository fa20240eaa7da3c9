use warden_compiler::matcher::{PatternCompileError, SymbolMatcher};

fn class(label: &str) -> SymbolMatcher {
    let matcher = SymbolMatcher::compile(Some(label)).unwrap();
    assert!(matches!(matcher, SymbolMatcher::Class(_)));
    matcher
}

#[test]
fn test_empty_and_missing_labels_are_epsilon() {
    assert!(SymbolMatcher::compile(None).unwrap().is_epsilon());
    assert!(SymbolMatcher::compile(Some("")).unwrap().is_epsilon());
}

#[test]
fn test_epsilon_matches_nothing() {
    let eps = SymbolMatcher::compile(None).unwrap();
    for c in ['a', ' ', '\0', 'é'] {
        assert!(!eps.matches(c));
    }
    assert_eq!(eps.to_string(), "ε");
}

#[test]
fn test_literal_exact_equality() {
    let m = SymbolMatcher::compile(Some("a")).unwrap();
    assert!(m.matches('a'));
    assert!(!m.matches('A'));
    assert!(!m.matches('b'));
}

#[test]
fn test_literal_non_ascii() {
    let m = SymbolMatcher::compile(Some("ç")).unwrap();
    assert!(m.matches('ç'));
    assert!(!m.matches('c'));
}

#[test]
fn test_multi_symbol_literal_never_matches() {
    let m = SymbolMatcher::compile(Some("ab")).unwrap();
    assert!(m.is_multi_symbol_literal());
    assert!(!m.matches('a'));
    assert!(!m.matches('b'));
}

#[test]
fn test_single_bracket_is_literal() {
    let m = SymbolMatcher::compile(Some("[")).unwrap();
    assert!(matches!(m, SymbolMatcher::Literal(_)));
    assert!(m.matches('['));
}

#[test]
fn test_lowercase_class() {
    let m = class("[a-z]");
    assert!(m.matches('q'));
    assert!(m.matches('a'));
    assert!(m.matches('z'));
    assert!(!m.matches('Q'));
    assert!(!m.matches('0'));
    assert!(!m.matches('-'));
}

#[test]
fn test_combined_class() {
    let m = class("[a-zA-Z0-9]");
    for c in ['a', 'Z', '5'] {
        assert!(m.matches(c));
    }
    for c in ['!', ' ', '_'] {
        assert!(!m.matches(c));
    }
}

#[test]
fn test_symbol_class_hyphen_is_literal() {
    // `*-_` would be the range 0x2A..=0x5F if taken literally by a regex engine.
    let m = class("[!@#$%&*-_=+/?]");
    for c in "!@#$%&*-_=+/?".chars() {
        assert!(m.matches(c), "expected {c:?} to match");
    }
    for c in ['A', 'Z', '0', '9', ':', '^', 'a'] {
        assert!(!m.matches(c), "expected {c:?} not to match");
    }
}

#[test]
fn test_class_set_operators_are_literal() {
    let m = class("[&&~~]");
    assert!(m.matches('&'));
    assert!(m.matches('~'));
    assert!(!m.matches('a'));
}

#[test]
fn test_negated_class() {
    let m = class("[^0-9]");
    assert!(m.matches('a'));
    assert!(!m.matches('7'));
}

#[test]
fn test_shorthand_classes() {
    let m = class("[\\d]");
    assert!(m.matches('3'));
    assert!(!m.matches('x'));

    let m = class("[\\w\\-]");
    assert!(m.matches('_'));
    assert!(m.matches('-'));
    assert!(!m.matches('!'));
}

#[test]
fn test_escaped_brackets() {
    let m = class("[\\[\\]]");
    assert!(m.matches('['));
    assert!(m.matches(']'));
    assert!(!m.matches('a'));
}

#[test]
fn test_class_matches_non_ascii() {
    let m = class("[^a-z]");
    assert!(m.matches('é'));
    let m = class("[a-z]");
    assert!(!m.matches('é'));
}

#[test]
fn test_empty_class_rejected() {
    assert!(matches!(
        SymbolMatcher::compile(Some("[]")),
        Err(PatternCompileError::EmptyClass { .. })
    ));
    assert!(matches!(
        SymbolMatcher::compile(Some("[^]")),
        Err(PatternCompileError::EmptyClass { .. })
    ));
}

#[test]
fn test_descending_range_rejected() {
    let err = SymbolMatcher::compile(Some("[z-a]")).unwrap_err();
    match err {
        PatternCompileError::DescendingRange { start, end, .. } => {
            assert_eq!(start, 'z');
            assert_eq!(end, 'a');
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_dangling_escape_rejected() {
    assert!(matches!(
        SymbolMatcher::compile(Some("[a\\]")),
        Err(PatternCompileError::DanglingEscape { .. })
    ));
}

#[test]
fn test_unknown_escape_rejected() {
    assert!(matches!(
        SymbolMatcher::compile(Some("[\\q]")),
        Err(PatternCompileError::UnknownEscape { escape: 'q', .. })
    ));
}

#[test]
fn test_nested_bracket_rejected() {
    assert!(matches!(
        SymbolMatcher::compile(Some("[[a]")),
        Err(PatternCompileError::UnescapedBracket { bracket: '[', .. })
    ));
}

#[test]
fn test_matching_is_pure() {
    let m = class("[a-c]");
    let first: Vec<bool> = "abcd".chars().map(|c| m.matches(c)).collect();
    let second: Vec<bool> = "abcd".chars().map(|c| m.matches(c)).collect();
    assert_eq!(first, second);
    assert_eq!(first, vec![true, true, true, false]);
}
