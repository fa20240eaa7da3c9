//! Transition label matching.
//!
//! A transition label is either empty (epsilon), a literal symbol, or a
//! bracketed character class such as `[a-z]` or `[!@#$%&*-_=+/?]`. Class
//! labels are normalized and compiled once, when the matcher is built; the
//! per-symbol check is a bitmask lookup for ASCII and an anchored regex
//! match for everything else.

use std::fmt;

use regex::Regex;

#[derive(Debug, thiserror::Error)]
pub enum PatternCompileError {
    #[error("empty character class '{label}'")]
    EmptyClass { label: String },

    #[error("dangling backslash at the end of '{label}'")]
    DanglingEscape { label: String },

    #[error("unknown escape '\\{escape}' in '{label}'")]
    UnknownEscape { label: String, escape: char },

    #[error("descending range '{start}-{end}' in '{label}'")]
    DescendingRange {
        label: String,
        start: char,
        end: char,
    },

    #[error("unescaped '{bracket}' inside character class '{label}'")]
    UnescapedBracket { label: String, bracket: char },

    #[error("character class '{label}' does not compile: {source}")]
    Regex {
        label: String,
        #[source]
        source: regex::Error,
    },
}

/// Decides whether one input symbol satisfies a transition label.
#[derive(Debug, Clone)]
pub enum SymbolMatcher {
    /// Empty label. Consumes no input and never matches a symbol.
    Epsilon,
    /// Exact equality with the label text.
    Literal(String),
    /// A compiled bracket expression.
    Class(CharClass),
}

impl SymbolMatcher {
    /// Build a matcher from a raw read label.
    pub fn compile(label: Option<&str>) -> Result<Self, PatternCompileError> {
        match label {
            None | Some("") => Ok(SymbolMatcher::Epsilon),
            Some(l) if is_class_label(l) => Ok(SymbolMatcher::Class(CharClass::compile(l)?)),
            Some(l) => Ok(SymbolMatcher::Literal(l.to_string())),
        }
    }

    pub fn matches(&self, symbol: char) -> bool {
        match self {
            SymbolMatcher::Epsilon => false,
            SymbolMatcher::Literal(text) => {
                let mut buf = [0u8; 4];
                text.as_str() == symbol.encode_utf8(&mut buf)
            }
            SymbolMatcher::Class(class) => class.matches(symbol),
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, SymbolMatcher::Epsilon)
    }

    /// True for literal labels longer than one symbol. Such labels can
    /// never match, since every step consumes exactly one symbol.
    pub fn is_multi_symbol_literal(&self) -> bool {
        match self {
            SymbolMatcher::Literal(text) => text.chars().count() > 1,
            _ => false,
        }
    }

    /// The label this matcher was built from (empty for epsilon).
    pub fn label(&self) -> &str {
        match self {
            SymbolMatcher::Epsilon => "",
            SymbolMatcher::Literal(text) => text,
            SymbolMatcher::Class(class) => class.label(),
        }
    }
}

impl fmt::Display for SymbolMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolMatcher::Epsilon => write!(f, "ε"),
            other => write!(f, "{}", other.label()),
        }
    }
}

fn is_class_label(label: &str) -> bool {
    label.len() >= 2 && label.starts_with('[') && label.ends_with(']')
}

// ── Character classes ────────────────────────────────────────────────

/// A compiled single-symbol character class.
#[derive(Debug, Clone)]
pub struct CharClass {
    label: String,
    pattern: Regex,
    /// Membership of every ASCII code point, bit `n` for `char::from(n)`.
    ascii: u128,
}

impl CharClass {
    /// Compile a bracketed label like `[a-z0-9]` or `[^\d]`.
    pub fn compile(label: &str) -> Result<Self, PatternCompileError> {
        let body = label
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(label);
        let (negated, body) = match body.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, body),
        };

        let tokens = tokenize(label, body)?;
        let items = normalize(label, &tokens)?;
        if items.is_empty() {
            return Err(PatternCompileError::EmptyClass {
                label: label.to_string(),
            });
        }

        let mut source = String::from("^[");
        if negated {
            source.push('^');
        }
        for item in &items {
            item.write_regex(&mut source);
        }
        source.push_str("]$");

        let pattern = Regex::new(&source).map_err(|source| PatternCompileError::Regex {
            label: label.to_string(),
            source,
        })?;

        let mut ascii = 0u128;
        let mut buf = [0u8; 4];
        for code in 0u8..128 {
            if pattern.is_match(char::from(code).encode_utf8(&mut buf)) {
                ascii |= 1u128 << code;
            }
        }

        Ok(Self {
            label: label.to_string(),
            pattern,
            ascii,
        })
    }

    pub fn matches(&self, symbol: char) -> bool {
        if symbol.is_ascii() {
            return self.ascii & (1u128 << (symbol as u32)) != 0;
        }
        let mut buf = [0u8; 4];
        self.pattern.is_match(symbol.encode_utf8(&mut buf))
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Char { ch: char, escaped: bool },
    Shorthand(char),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ClassItem {
    Char(char),
    Range(char, char),
    Shorthand(char),
}

impl ClassItem {
    fn write_regex(&self, out: &mut String) {
        match *self {
            ClassItem::Char(c) => out.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
            ClassItem::Range(a, b) => {
                out.push_str(&regex::escape(a.encode_utf8(&mut [0u8; 4])));
                out.push('-');
                out.push_str(&regex::escape(b.encode_utf8(&mut [0u8; 4])));
            }
            ClassItem::Shorthand(c) => {
                out.push('\\');
                out.push(c);
            }
        }
    }
}

fn tokenize(label: &str, body: &str) -> Result<Vec<Token>, PatternCompileError> {
    let mut tokens = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                let escape = chars.next().ok_or_else(|| PatternCompileError::DanglingEscape {
                    label: label.to_string(),
                })?;
                let token = match escape {
                    '-' | ']' | '[' | '\\' | '^' => Token::Char {
                        ch: escape,
                        escaped: true,
                    },
                    'n' => Token::Char {
                        ch: '\n',
                        escaped: true,
                    },
                    't' => Token::Char {
                        ch: '\t',
                        escaped: true,
                    },
                    'd' | 'D' | 'w' | 'W' | 's' | 'S' => Token::Shorthand(escape),
                    other => {
                        return Err(PatternCompileError::UnknownEscape {
                            label: label.to_string(),
                            escape: other,
                        })
                    }
                };
                tokens.push(token);
            }
            '[' | ']' => {
                return Err(PatternCompileError::UnescapedBracket {
                    label: label.to_string(),
                    bracket: ch,
                })
            }
            _ => tokens.push(Token::Char { ch, escaped: false }),
        }
    }

    Ok(tokens)
}

/// Resolve hyphens into ranges or literals.
///
/// A hyphen only forms a range between two ASCII alphanumerics of the same
/// kind (`a-z`, `A-Z`, `0-9` and their sub-ranges). Anywhere else, such as
/// `*-_`, it is a literal hyphen.
fn normalize(label: &str, tokens: &[Token]) -> Result<Vec<ClassItem>, PatternCompileError> {
    let mut items = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            Token::Shorthand(c) => items.push(ClassItem::Shorthand(c)),
            Token::Char { ch, .. } => {
                if let (
                    Some(Token::Char {
                        ch: '-',
                        escaped: false,
                    }),
                    Some(Token::Char { ch: end, .. }),
                ) = (tokens.get(i + 1), tokens.get(i + 2))
                {
                    let end = *end;
                    if range_kind(ch).is_some() && range_kind(ch) == range_kind(end) {
                        if ch > end {
                            return Err(PatternCompileError::DescendingRange {
                                label: label.to_string(),
                                start: ch,
                                end,
                            });
                        }
                        items.push(ClassItem::Range(ch, end));
                        i += 3;
                        continue;
                    }
                }
                items.push(ClassItem::Char(ch));
            }
        }
        i += 1;
    }

    Ok(items)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeKind {
    Lower,
    Upper,
    Digit,
}

fn range_kind(c: char) -> Option<RangeKind> {
    match c {
        'a'..='z' => Some(RangeKind::Lower),
        'A'..='Z' => Some(RangeKind::Upper),
        '0'..='9' => Some(RangeKind::Digit),
        _ => None,
    }
}
