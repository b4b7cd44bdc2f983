//! Line tokenizer and flag parser.
//!
//! `tokenize` splits a raw line shell-style; `parse_args` separates the
//! remaining argv into positional arguments and named flags.

use crate::error::ShellError;
use std::collections::BTreeMap;

/// Value of a parsed flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// `--name`, `-n` (true) or `--no-name` (false)
    Switch(bool),

    /// `--name=value` or `-n=value`
    Text(String),
}

impl FlagValue {
    /// Switch state, or `None` for text flags.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Switch(on) => Some(*on),
            Self::Text(_) => None,
        }
    }

    /// Text value, or `None` for switches.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Switch(_) => None,
            Self::Text(value) => Some(value),
        }
    }
}

/// Named flags, keyed without their leading dashes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags(BTreeMap<String, FlagValue>);

impl Flags {
    /// Raw lookup.
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name)
    }

    /// True if `name` was given as an enabled switch.
    pub fn is_set(&self, name: &str) -> bool {
        matches!(self.get(name), Some(FlagValue::Switch(true)))
    }

    /// Text value of `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FlagValue::as_str)
    }

    /// Flags in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of flags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no flags were given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, name: impl Into<String>, value: FlagValue) {
        self.0.insert(name.into(), value);
    }
}

/// Arguments handed to a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    /// Non-flag arguments, in order
    pub positional: Vec<String>,

    /// Named flags
    pub flags: Flags,
}

impl Args {
    /// Positional argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }
}

/// Split a line into tokens.
///
/// - Unquoted whitespace separates tokens
/// - `'...'` is literal
/// - `"..."` honours `\"` and `\\`; other escapes are kept verbatim
/// - `\x` outside quotes yields `x`
/// - Adjacent fragments join (`a"b c"d` is one token), `""` is an empty token
pub fn tokenize(line: &str) -> Result<Vec<String>, ShellError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            Some(_) => match c {
                '"' => quote = None,
                '\\' => match chars.next() {
                    Some(next @ ('"' | '\\')) => current.push(next),
                    Some(next) => {
                        current.push('\\');
                        current.push(next);
                    }
                    None => return Err(ShellError::UnterminatedQuote),
                },
                _ => current.push(c),
            },
            None => match c {
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(core::mem::take(&mut current));
                        in_token = false;
                    }
                }
                '\'' | '"' => {
                    quote = Some(c);
                    in_token = true;
                }
                '\\' => {
                    in_token = true;
                    current.push(chars.next().unwrap_or('\\'));
                }
                _ => {
                    in_token = true;
                    current.push(c);
                }
            },
        }
    }

    if quote.is_some() {
        return Err(ShellError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Separate positional arguments from flags.
///
/// - `--name=value` is a text flag, `--name` a switch, `--no-name` a disabled switch
/// - `-abc` sets switches `a`, `b`, `c`; `-n=value` is a text flag
/// - `-`, negative numbers and anything after `--` stay positional
/// - A repeated flag keeps its last value
pub fn parse_args<S: AsRef<str>>(argv: &[S]) -> Args {
    let mut args = Args::default();
    let mut rest = argv.iter().map(AsRef::<str>::as_ref);

    while let Some(arg) = rest.next() {
        if arg == "--" {
            args.positional.extend(rest.by_ref().map(String::from));
            break;
        }

        if let Some(long) = arg.strip_prefix("--")
            && !long.is_empty()
            && !long.starts_with('=')
        {
            match long.split_once('=') {
                Some((name, value)) => args.flags.insert(name, FlagValue::Text(value.into())),
                None => match long.strip_prefix("no-") {
                    Some(name) if !name.is_empty() => {
                        args.flags.insert(name, FlagValue::Switch(false))
                    }
                    _ => args.flags.insert(long, FlagValue::Switch(true)),
                },
            }
            continue;
        }

        if let Some(short) = arg.strip_prefix('-')
            && !short.is_empty()
            && !short.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '-')
        {
            match short.split_once('=') {
                Some((name, value)) if !name.is_empty() => {
                    args.flags.insert(name, FlagValue::Text(value.into()))
                }
                _ => {
                    for c in short.chars() {
                        args.flags.insert(c, FlagValue::Switch(true));
                    }
                }
            }
            continue;
        }

        args.positional.push(arg.to_string());
    }

    args
}
