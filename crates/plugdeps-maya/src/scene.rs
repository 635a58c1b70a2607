//! Scene-level decoding: header and `requires` statements.

use std::io::Read;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::HEADER_PREFIX;
use crate::error::ParseError;
use crate::lexer::{Lexer, Statement};

const REQUIRES: &str = "requires";

/// One `requires` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Plugin name, e.g. `mtoa`. Maya itself appears as `maya`.
    pub name: CompactString,
    /// Plugin version, if given.
    pub version: Option<String>,
    /// Node types listed with `-nodeType`.
    pub node_types: Vec<String>,
    /// Data types listed with `-dataType`.
    pub data_types: Vec<String>,
    /// Line the statement starts on.
    pub line: usize,
}

/// The decoded parts of a Maya ASCII file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneFile {
    /// Version from the header line, e.g. `2018` in `//Maya ASCII 2018 scene`.
    pub header_version: Option<String>,
    /// Value of the `//Codeset:` header comment, e.g. `932`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeset: Option<String>,
    /// Every `requires` statement, in file order.
    pub requires: Vec<Requirement>,
}

impl SceneFile {
    /// Names of all required plugins in file order, duplicates included.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.requires.iter().map(|r| r.name.as_str())
    }
}

/// Decode a scene from a reader.
pub fn parse<R: Read>(mut reader: R) -> Result<SceneFile, ParseError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_bytes(&bytes)
}

/// Decode a scene from a string.
pub fn parse_str(input: &str) -> Result<SceneFile, ParseError> {
    parse_bytes(input.as_bytes())
}

/// Decode a scene from raw bytes.
///
/// Strings are read byte-wise. When the header declares a Shift-JIS
/// codeset (`//Codeset: 932`), double-byte characters are kept whole, so a
/// trail byte of `0x5C` does not escape the following quote.
pub fn parse_bytes(input: &[u8]) -> Result<SceneFile, ParseError> {
    let input = input.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(input);
    let header_version = parse_header(input)?;
    let codeset = parse_codeset(input);
    let shift_jis = codeset.as_deref().is_some_and(is_shift_jis);

    let mut lexer = Lexer::new(input).shift_jis(shift_jis);
    let mut requires = Vec::new();
    while let Some(stmt) = lexer.next_statement(|cmd| cmd == REQUIRES)? {
        if stmt.command == REQUIRES {
            requires.push(parse_requires(stmt)?);
        }
    }

    Ok(SceneFile {
        header_version,
        codeset,
        requires,
    })
}

fn parse_header(input: &[u8]) -> Result<Option<String>, ParseError> {
    let first_line = input.split(|&b| b == b'\n').next().unwrap_or_default();
    let rest = first_line
        .strip_prefix(HEADER_PREFIX.as_bytes())
        .ok_or(ParseError::MissingHeader)?;

    Ok(String::from_utf8_lossy(rest)
        .split_whitespace()
        .next()
        .map(str::to_string))
}

/// Find `//Codeset:` among the leading comment lines.
fn parse_codeset(input: &[u8]) -> Option<String> {
    input
        .split(|&b| b == b'\n')
        .take_while(|line| line.starts_with(b"//"))
        .find_map(|line| line.strip_prefix(b"//Codeset:"))
        .map(|value| String::from_utf8_lossy(value).trim().to_string())
}

fn is_shift_jis(codeset: &str) -> bool {
    ["932", "cp932", "shift_jis", "shift-jis", "sjis"]
        .iter()
        .any(|name| codeset.eq_ignore_ascii_case(name))
}

fn parse_requires(stmt: Statement) -> Result<Requirement, ParseError> {
    let mut positional = Vec::with_capacity(2);
    let mut node_types = Vec::new();
    let mut data_types = Vec::new();

    let mut args = stmt.args.into_iter();
    while let Some(token) = args.next() {
        if !token.is_flag() {
            positional.push(token.text);
            continue;
        }
        let target = match token.text.as_str() {
            "-nodeType" | "-nt" => &mut node_types,
            "-dataType" | "-dt" => &mut data_types,
            // Value-less flags such as -plugin carry nothing we need.
            _ => continue,
        };
        match args.next() {
            Some(value) if !value.is_flag() => target.push(value.text),
            _ => {
                return Err(ParseError::MissingFlagValue {
                    flag: token.text,
                    line: token.line,
                });
            }
        }
    }

    let mut positional = positional.into_iter();
    let name = positional
        .next()
        .filter(|name| !name.is_empty())
        .ok_or(ParseError::MissingPluginName { line: stmt.line })?;

    Ok(Requirement {
        name: name.into(),
        version: positional.next(),
        node_types,
        data_types,
        line: stmt.line,
    })
}
