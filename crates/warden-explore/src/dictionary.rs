//! Dictionary replay.
//!
//! Each line of the input is trimmed and tested in input order. Blank lines
//! are skipped and counted; duplicates are tested again. Lines that are not
//! valid UTF-8 are handled per [`DecodePolicy`].

use std::io::{self, BufRead};
use std::time::{Duration, Instant};

use crossbeam::channel;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use warden_compiler::graph::AutomatonModel;
use warden_model::simulate::Simulator;

use crate::outcome::{AttackOutcome, NullSink, OutcomeSink};

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary: {0}")]
    Io(#[from] io::Error),

    #[error("dictionary worker panicked")]
    WorkerPanicked,
}

/// What to do with a line that is not valid UTF-8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Drop the invalid bytes, keep the rest, and count the line.
    #[default]
    Lossy,
    /// Skip the line and count it.
    SkipLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryOptions {
    pub decode: DecodePolicy,
    /// Lines per batch handed to a parallel worker.
    pub batch_size: usize,
    /// Worker threads for [`run_dictionary_parallel`]. None = available cores.
    pub workers: Option<usize>,
}

impl Default for DictionaryOptions {
    fn default() -> Self {
        Self {
            decode: DecodePolicy::Lossy,
            batch_size: 512,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryReport {
    pub attempts: u64,
    pub accepted: u64,
    pub blank_lines: u64,
    pub decode_failures: u64,
    pub elapsed: Duration,
}

impl DictionaryReport {
    /// accepted / attempts, or 0 when nothing was tested.
    pub fn rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempts as f64
        }
    }
}

/// Replay every line of `reader` against `model`.
pub fn run_dictionary<R: BufRead>(
    model: &AutomatonModel,
    reader: R,
    options: &DictionaryOptions,
) -> Result<DictionaryReport, DictionaryError> {
    run_dictionary_with_sink(model, reader, options, &mut NullSink)
}

pub fn run_dictionary_with_sink<R: BufRead>(
    model: &AutomatonModel,
    reader: R,
    options: &DictionaryOptions,
    sink: &mut dyn OutcomeSink,
) -> Result<DictionaryReport, DictionaryError> {
    let start = Instant::now();
    let mut lines = LineReader::new(reader, options.decode);
    let mut sim = Simulator::new(model);
    let mut tally = Tally::default();

    while let Some(word) = lines.next_word()? {
        let ok = sim.accepts(&word);
        sink.observe(&AttackOutcome {
            candidate: word,
            accepted: ok,
            index: tally.attempts,
        });
        tally.record(ok);
    }

    Ok(finish(tally, lines.stats, start.elapsed()))
}

/// Replay an in-memory word list with the same trimming and blank-line
/// rules as [`run_dictionary`].
pub fn run_dictionary_words<I, S>(model: &AutomatonModel, words: I) -> DictionaryReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let start = Instant::now();
    let mut sim = Simulator::new(model);
    let mut tally = Tally::default();
    let mut stats = LineStats::default();

    for word in words {
        let word = word.as_ref().trim();
        if word.is_empty() {
            stats.blank_lines += 1;
            continue;
        }
        tally.record(sim.accepts(word));
    }

    finish(tally, stats, start.elapsed())
}

/// Parallel [`run_dictionary`].
///
/// The caller thread reads and decodes lines, then hands batches to scoped
/// workers over a bounded channel. Totals are identical to the sequential
/// run.
pub fn run_dictionary_parallel<R: BufRead>(
    model: &AutomatonModel,
    reader: R,
    options: &DictionaryOptions,
) -> Result<DictionaryReport, DictionaryError> {
    let start = Instant::now();
    let workers = options
        .workers
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1)
        .max(1);
    let batch_size = options.batch_size.max(1);
    debug!(workers, batch_size, "starting parallel dictionary");

    let (tallies, stats) = crossbeam::thread::scope(
        |scope| -> Result<(Vec<Tally>, LineStats), DictionaryError> {
            let (tx, rx) = channel::bounded::<Vec<String>>(workers * 2);

            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let rx = rx.clone();
                    scope.spawn(move |_| {
                        let mut sim = Simulator::new(model);
                        let mut tally = Tally::default();
                        for batch in rx {
                            for word in &batch {
                                tally.record(sim.accepts(word));
                            }
                        }
                        tally
                    })
                })
                .collect();
            drop(rx);

            // Sender is moved in, so workers drain and exit once reading stops.
            let read = feed(LineReader::new(reader, options.decode), tx, batch_size);

            let mut tallies = Vec::with_capacity(workers);
            for handle in handles {
                tallies.push(handle.join().map_err(|_| DictionaryError::WorkerPanicked)?);
            }
            Ok((tallies, read?))
        },
    )
    .map_err(|_| DictionaryError::WorkerPanicked)??;

    let tally = tallies.into_iter().fold(Tally::default(), |acc, t| Tally {
        attempts: acc.attempts + t.attempts,
        accepted: acc.accepted + t.accepted,
    });
    Ok(finish(tally, stats, start.elapsed()))
}

fn feed<R: BufRead>(
    mut lines: LineReader<R>,
    tx: channel::Sender<Vec<String>>,
    batch_size: usize,
) -> io::Result<LineStats> {
    let mut batch = Vec::with_capacity(batch_size);
    while let Some(word) = lines.next_word()? {
        batch.push(word);
        if batch.len() >= batch_size {
            let full = std::mem::replace(&mut batch, Vec::with_capacity(batch_size));
            if tx.send(full).is_err() {
                break;
            }
        }
    }
    if !batch.is_empty() {
        let _ = tx.send(batch);
    }
    Ok(lines.stats)
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    attempts: u64,
    accepted: u64,
}

impl Tally {
    fn record(&mut self, accepted: bool) {
        self.attempts += 1;
        if accepted {
            self.accepted += 1;
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct LineStats {
    blank_lines: u64,
    decode_failures: u64,
}

/// Splits a byte stream on `\n` and yields trimmed, non-blank words.
struct LineReader<R> {
    reader: R,
    policy: DecodePolicy,
    buf: Vec<u8>,
    stats: LineStats,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R, policy: DecodePolicy) -> Self {
        Self {
            reader,
            policy,
            buf: Vec::new(),
            stats: LineStats::default(),
        }
    }

    fn next_word(&mut self) -> io::Result<Option<String>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }

            let text = match std::str::from_utf8(&self.buf) {
                Ok(text) => text.trim().to_string(),
                Err(_) => {
                    self.stats.decode_failures += 1;
                    match self.policy {
                        DecodePolicy::SkipLine => continue,
                        DecodePolicy::Lossy => lossy(&self.buf).trim().to_string(),
                    }
                }
            };

            if text.is_empty() {
                self.stats.blank_lines += 1;
                continue;
            }
            return Ok(Some(text));
        }
    }
}

/// Valid UTF-8 runs of `bytes`, with invalid sequences dropped.
fn lossy(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

fn finish(tally: Tally, stats: LineStats, elapsed: Duration) -> DictionaryReport {
    if stats.decode_failures > 0 {
        warn!(
            lines = stats.decode_failures,
            "dictionary contained lines that are not valid UTF-8"
        );
    }
    let report = DictionaryReport {
        attempts: tally.attempts,
        accepted: tally.accepted,
        blank_lines: stats.blank_lines,
        decode_failures: stats.decode_failures,
        elapsed,
    };
    info!(
        attempts = report.attempts,
        accepted = report.accepted,
        blank = report.blank_lines,
        elapsed = ?report.elapsed,
        "dictionary finished"
    );
    report
}
