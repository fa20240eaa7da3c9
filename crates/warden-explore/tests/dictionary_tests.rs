use std::io::{self, BufReader, Read};

use warden_compiler::compile::compile;
use warden_compiler::graph::AutomatonModel;
use warden_explore::dictionary::{
    run_dictionary, run_dictionary_parallel, run_dictionary_with_sink, run_dictionary_words,
    DecodePolicy, DictionaryError, DictionaryOptions,
};
use warden_explore::outcome::{AttackOutcome, FnSink};
use warden_ir::parse::parse_jff;

fn fixture(xml: &str) -> AutomatonModel {
    compile(&parse_jff(xml).unwrap()).unwrap()
}

fn lowercase() -> AutomatonModel {
    fixture(include_str!("../../warden-ir/tests/fixtures/lowercase.jff"))
}

fn medium() -> AutomatonModel {
    fixture(include_str!("../../warden-ir/tests/fixtures/medium.jff"))
}

fn skip_line() -> DictionaryOptions {
    DictionaryOptions {
        decode: DecodePolicy::SkipLine,
        ..DictionaryOptions::default()
    }
}

#[test]
fn test_blank_line_is_skipped() {
    let model = lowercase();
    let report = run_dictionary(&model, &b"\nok\nOK\n"[..], &DictionaryOptions::default()).unwrap();
    assert_eq!(report.attempts, 2);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.blank_lines, 1);
    assert_eq!(report.rate(), 0.5);
}

#[test]
fn test_lines_are_trimmed_and_duplicates_retested() {
    let model = lowercase();
    let input = "  ok  \r\nok\n\tok\n";
    let report = run_dictionary(&model, input.as_bytes(), &DictionaryOptions::default()).unwrap();
    assert_eq!(report.attempts, 3);
    assert_eq!(report.accepted, 3);
}

#[test]
fn test_empty_dictionary() {
    let model = lowercase();
    let report = run_dictionary(&model, &b""[..], &DictionaryOptions::default()).unwrap();
    assert_eq!(report.attempts, 0);
    assert_eq!(report.rate(), 0.0);
}

#[test]
fn test_invalid_utf8_bytes_dropped_by_default() {
    let model = lowercase();
    let report = run_dictionary(&model, &b"caf\xe9\nok\n"[..], &DictionaryOptions::default()).unwrap();
    assert_eq!(report.attempts, 2);
    assert_eq!(report.accepted, 2);
    assert_eq!(report.decode_failures, 1);
}

#[test]
fn test_line_of_only_invalid_bytes_counts_as_blank() {
    let model = lowercase();
    let report = run_dictionary(&model, &b"\xff\xfe\nok\n"[..], &DictionaryOptions::default()).unwrap();
    assert_eq!(report.attempts, 1);
    assert_eq!(report.blank_lines, 1);
    assert_eq!(report.decode_failures, 1);
}

#[test]
fn test_invalid_utf8_line_skipped_when_strict() {
    let model = lowercase();
    let input: &[u8] = b"ok\n\xffab\nzz";
    let report = run_dictionary(&model, input, &skip_line()).unwrap();
    assert_eq!(report.attempts, 2);
    assert_eq!(report.accepted, 2);
    assert_eq!(report.decode_failures, 1);
}

#[test]
fn test_invalid_utf8_lossy_keeps_line() {
    let model = lowercase();
    let input: &[u8] = b"ok\n\xffab\nzz";
    let report = run_dictionary(&model, input, &DictionaryOptions::default()).unwrap();
    assert_eq!(report.attempts, 3);
    assert_eq!(report.accepted, 3);
    assert_eq!(report.decode_failures, 1);
}

#[test]
fn test_sink_sees_lines_in_input_order() {
    let model = lowercase();
    let mut seen: Vec<AttackOutcome> = Vec::new();
    let mut sink = FnSink(|o: &AttackOutcome| seen.push(o.clone()));
    run_dictionary_with_sink(
        &model,
        &b"b\n\nA\na"[..],
        &DictionaryOptions::default(),
        &mut sink,
    )
    .unwrap();

    let rows: Vec<(u64, &str, bool)> = seen
        .iter()
        .map(|o| (o.index, o.candidate.as_str(), o.accepted))
        .collect();
    assert_eq!(rows, vec![(0, "b", true), (1, "A", false), (2, "a", true)]);
}

#[test]
fn test_in_memory_words() {
    let model = lowercase();
    let report = run_dictionary_words(&model, ["", "ok", "OK"]);
    assert_eq!(report.attempts, 2);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.blank_lines, 1);
}

struct FailingReader {
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served {
            return Err(io::Error::other("disk went away"));
        }
        self.served = true;
        let line = b"ok\n";
        buf[..line.len()].copy_from_slice(line);
        Ok(line.len())
    }
}

#[test]
fn test_read_error_is_fatal() {
    let model = lowercase();
    let reader = BufReader::new(FailingReader { served: false });
    let err = run_dictionary(&model, reader, &DictionaryOptions::default()).unwrap_err();
    assert!(matches!(err, DictionaryError::Io(_)));

    let reader = BufReader::new(FailingReader { served: false });
    let err = run_dictionary_parallel(&model, reader, &DictionaryOptions::default()).unwrap_err();
    assert!(matches!(err, DictionaryError::Io(_)));
}

#[test]
fn test_parallel_matches_sequential() {
    let model = medium();
    let mut input = String::new();
    for i in 0..2000 {
        match i % 4 {
            0 => input.push_str(&format!("Passw0rd{i}\n")),
            1 => input.push_str(&format!("password{i}\n")),
            2 => input.push('\n'),
            _ => input.push_str(&format!("Ab{i}\n")),
        }
    }
    let options = DictionaryOptions {
        batch_size: 7,
        workers: Some(3),
        ..DictionaryOptions::default()
    };

    let sequential = run_dictionary(&model, input.as_bytes(), &options).unwrap();
    let parallel = run_dictionary_parallel(&model, input.as_bytes(), &options).unwrap();
    assert_eq!(parallel.attempts, sequential.attempts);
    assert_eq!(parallel.accepted, sequential.accepted);
    assert_eq!(parallel.blank_lines, sequential.blank_lines);
    assert_eq!(sequential.attempts, 1500);
    assert_eq!(sequential.blank_lines, 500);
    assert!(sequential.accepted >= 500);
}
