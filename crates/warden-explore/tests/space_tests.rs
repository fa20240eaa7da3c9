use warden_explore::space::{SearchSpaceSpec, SpaceError};

fn abcd(min: usize, max: usize) -> SearchSpaceSpec {
    SearchSpaceSpec::new("abcd".chars(), min, max).unwrap()
}

#[test]
fn test_space_size_four_symbols_lengths_one_to_two() {
    let spec = abcd(1, 2);
    assert_eq!(spec.size_of_length(1), 4);
    assert_eq!(spec.size_of_length(2), 16);
    assert_eq!(spec.total_size(), 20);
    assert_eq!(spec.candidates().count(), 20);
}

#[test]
fn test_enumeration_order() {
    let spec = abcd(1, 2);
    let words: Vec<String> = spec.candidates().map(|(_, w)| w).collect();
    assert_eq!(&words[..5], &["a", "b", "c", "d", "aa"]);
    assert_eq!(&words[5..8], &["ab", "ac", "ad"]);
    assert_eq!(words[8], "ba");
    assert_eq!(words.last().map(String::as_str), Some("dd"));
}

#[test]
fn test_ordinals_are_contiguous() {
    let spec = abcd(2, 3);
    for (expected, (ordinal, _)) in spec.candidates().enumerate() {
        assert_eq!(ordinal, expected as u64);
    }
}

#[test]
fn test_enumeration_is_reproducible() {
    let spec = SearchSpaceSpec::new("x1Z".chars(), 1, 4).unwrap();
    let first: Vec<_> = spec.candidates().collect();
    let second: Vec<_> = spec.candidates().collect();
    assert_eq!(first, second);
}

#[test]
fn test_candidate_at_and_ordinal_of_agree() {
    let spec = abcd(1, 3);
    for (ordinal, word) in spec.candidates() {
        assert_eq!(spec.candidate_at(ordinal).as_deref(), Some(word.as_str()));
        assert_eq!(spec.ordinal_of(&word), Some(ordinal));
    }
    assert_eq!(spec.candidate_at(spec.total_size() as u64), None);
}

#[test]
fn test_ordinal_of_outside_space() {
    let spec = abcd(2, 3);
    assert_eq!(spec.ordinal_of("a"), None);
    assert_eq!(spec.ordinal_of("abcd"), None);
    assert_eq!(spec.ordinal_of("ax"), None);
    assert_eq!(spec.ordinal_of("ba"), Some(4));
}

#[test]
fn test_resume_from_ordinal() {
    let spec = abcd(1, 2);
    let resumed: Vec<_> = spec.candidates_from(3).take(3).collect();
    assert_eq!(
        resumed,
        vec![
            (3, "d".to_string()),
            (4, "aa".to_string()),
            (5, "ab".to_string()),
        ]
    );
    assert_eq!(spec.candidates_from(19).count(), 1);
    assert_eq!(spec.candidates_from(20).count(), 0);
}

#[test]
fn test_non_ascii_alphabet() {
    let spec = SearchSpaceSpec::new("çé".chars(), 2, 2).unwrap();
    let words: Vec<String> = spec.candidates().map(|(_, w)| w).collect();
    assert_eq!(words, vec!["çç", "çé", "éç", "éé"]);
    assert_eq!(spec.ordinal_of("éç"), Some(2));
}

#[test]
fn test_invalid_spaces() {
    assert_eq!(
        SearchSpaceSpec::new("".chars(), 1, 2).unwrap_err(),
        SpaceError::EmptyAlphabet
    );
    assert_eq!(
        SearchSpaceSpec::new("aba".chars(), 1, 2).unwrap_err(),
        SpaceError::DuplicateSymbol('a')
    );
    assert_eq!(
        SearchSpaceSpec::new("ab".chars(), 0, 2).unwrap_err(),
        SpaceError::ZeroLength
    );
    assert_eq!(
        SearchSpaceSpec::new("ab".chars(), 3, 2).unwrap_err(),
        SpaceError::InvertedRange { min: 3, max: 2 }
    );
}
