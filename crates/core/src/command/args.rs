//! Command line parsing
//!
//! A command line is split into tokens on spaces, commas and tabs. The first
//! character of the first token is the verb. The characters following it in
//! the same token are the sub-command and its modifier (`V+`, `V-`). When
//! the verb stands alone and the next token does not look like a number,
//! that token supplies the sub-command instead, so `"B S 10 -5"` and
//! `"BS 10 -5"` parse the same way.
//!
//! Up to [`MAX_ARGS`] remaining tokens are parsed twice, once as integers
//! and once as floats. Missing or unparsable values are zero.

use heapless::String;

/// Capacity of the line buffer in symbols
pub const LINE_CAPACITY: usize = 32;

/// Number of numeric argument slots
pub const MAX_ARGS: usize = 4;

/// Token separators
const DELIMITERS: [char; 3] = [' ', ',', '\t'];

/// Parsed command line, rebuilt for every dispatched line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandArgs {
    line: String<LINE_CAPACITY>,
    verb: u8,
    subcommand: Option<u8>,
    modifier: Option<u8>,
    ints: [i32; MAX_ARGS],
    floats: [f32; MAX_ARGS],
}

impl CommandArgs {
    /// Parse one complete line
    ///
    /// Lines longer than [`LINE_CAPACITY`] are truncated. An empty line
    /// yields verb `0`.
    pub fn parse(line: &str) -> Self {
        let mut args = Self::default();
        for ch in line.chars() {
            if args.line.push(ch).is_err() {
                break;
            }
        }

        let mut tokens = line.split(|c: char| DELIMITERS.contains(&c)).filter(|t| !t.is_empty());
        let Some(first) = tokens.next() else {
            return args;
        };

        let mut first_bytes = first.bytes();
        args.verb = first_bytes.next().unwrap_or(0);
        args.subcommand = first_bytes.next();
        args.modifier = first_bytes.next();

        let mut rest = tokens.peekable();
        if args.subcommand.is_none() {
            if let Some(token) = rest.peek() {
                if !looks_numeric(token) {
                    let mut bytes = token.bytes();
                    args.subcommand = bytes.next();
                    args.modifier = bytes.next();
                    rest.next();
                }
            }
        }

        for (slot, token) in rest.take(MAX_ARGS).enumerate() {
            args.ints[slot] = parse_int(token);
            args.floats[slot] = parse_float(token);
        }
        args
    }

    /// The raw line as received
    pub fn line(&self) -> &str {
        self.line.as_str()
    }

    /// Verb character (`b'?'`, `b'*'` or a letter)
    pub fn verb(&self) -> u8 {
        self.verb
    }

    /// Character following the verb, if any
    pub fn subcommand(&self) -> Option<u8> {
        self.subcommand
    }

    /// Character following the sub-command, if any
    pub fn modifier(&self) -> Option<u8> {
        self.modifier
    }

    /// Integer argument `index`, zero when absent
    pub fn int(&self, index: usize) -> i32 {
        self.ints.get(index).copied().unwrap_or(0)
    }

    /// Float argument `index`, zero when absent
    pub fn float(&self, index: usize) -> f32 {
        self.floats.get(index).copied().unwrap_or(0.0)
    }

    pub fn ints(&self) -> &[i32; MAX_ARGS] {
        &self.ints
    }

    pub fn floats(&self) -> &[f32; MAX_ARGS] {
        &self.floats
    }

    /// Arguments that ask the subscriber of `letter` for its help text
    pub fn help_request(letter: u8) -> Self {
        let mut args = Self::default();
        args.line.push(letter as char).ok();
        args.line.push('?').ok();
        args.verb = letter;
        args.subcommand = Some(b'?');
        args
    }
}

fn looks_numeric(token: &str) -> bool {
    matches!(token.bytes().next(), Some(b'0'..=b'9' | b'-' | b'+' | b'.'))
}

/// Leading-integer parse: optional sign then digits, saturating
fn parse_int(token: &str) -> i32 {
    let bytes = token.as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut value: i32 = 0;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = i32::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Leading-float parse: the longest prefix that reads as a number
fn parse_float(token: &str) -> f32 {
    (1..=token.len())
        .rev()
        .filter(|&end| token.is_char_boundary(end))
        .find_map(|end| token[..end].parse::<f32>().ok())
        .unwrap_or(0.0)
}
