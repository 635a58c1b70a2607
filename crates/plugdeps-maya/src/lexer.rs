//! Statement tokenizer for Maya ASCII content.

use crate::error::ParseError;

/// A single token inside a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub text: String,
    pub quoted: bool,
    pub line: usize,
}

impl Token {
    /// Check if this token is an unquoted `-flag`.
    pub fn is_flag(&self) -> bool {
        !self.quoted && self.text.starts_with('-') && self.text.len() > 1
    }
}

/// One `;`-terminated statement.
#[derive(Debug, Clone)]
pub(crate) struct Statement {
    /// Line the statement starts on (1-based).
    pub line: usize,
    /// Command word, e.g. `requires` or `createNode`.
    pub command: String,
    /// Arguments. Only collected for statements the caller asked to keep.
    pub args: Vec<Token>,
}

/// Splits input into statements, skipping `//` comments.
pub(crate) struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    shift_jis: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            shift_jis: false,
        }
    }

    /// Treat string contents as Shift-JIS: a lead byte and its trail byte
    /// are copied as a pair, so a trail byte of `0x5C` is not an escape.
    pub fn shift_jis(mut self, enabled: bool) -> Self {
        self.shift_jis = enabled;
        self
    }

    /// The two-byte character starting at `pos`, if any.
    fn double_byte_at(&self, pos: usize) -> Option<[u8; 2]> {
        if !self.shift_jis {
            return None;
        }
        match self.input.get(pos..pos + 2)? {
            &[lead @ (0x81..=0x9F | 0xE0..=0xFC), trail @ (0x40..=0x7E | 0x80..=0xFC)] => {
                Some([lead, trail])
            }
            _ => None,
        }
    }

    /// Read the next statement. Arguments are materialized only when
    /// `keep(command)` returns true; other statements are scanned for
    /// their terminator and nothing else.
    pub fn next_statement(
        &mut self,
        keep: impl Fn(&str) -> bool,
    ) -> Result<Option<Statement>, ParseError> {
        loop {
            self.skip_trivia();
            if self.at_end() {
                return Ok(None);
            }

            let line = self.line;
            let mut command: Option<String> = None;
            let mut keeping = false;
            let mut args = Vec::new();

            loop {
                self.skip_trivia();
                let Some(byte) = self.peek() else {
                    return Err(ParseError::UnterminatedStatement { line });
                };

                if byte == b';' {
                    self.pos += 1;
                    break;
                }

                let collect = command.is_none() || keeping;
                let token = if byte == b'"' {
                    self.read_string(collect)?
                } else {
                    self.read_word(collect)
                };

                if command.is_none() {
                    keeping = keep(&token.text);
                    command = Some(token.text);
                } else if keeping {
                    args.push(token);
                }
            }

            // A bare `;` is an empty statement.
            if let Some(command) = command {
                return Ok(Some(Statement {
                    line,
                    command,
                    args,
                }));
            }
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_trivia(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'/' if self.input.get(self.pos + 1) == Some(&b'/') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn read_word(&mut self, collect: bool) -> Token {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_whitespace() || byte == b';' || byte == b'"' {
                break;
            }
            self.pos += 1;
        }
        let text = if collect {
            String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
        } else {
            String::new()
        };
        Token {
            text,
            quoted: false,
            line: self.line,
        }
    }

    fn read_string(&mut self, collect: bool) -> Result<Token, ParseError> {
        let line = self.line;
        let mut buf = Vec::new();
        // Opening quote.
        self.pos += 1;

        loop {
            if let Some(pair) = self.double_byte_at(self.pos) {
                self.pos += 2;
                if collect {
                    buf.extend_from_slice(&pair);
                }
                continue;
            }
            let Some(byte) = self.peek() else {
                return Err(ParseError::UnterminatedString { line });
            };
            self.pos += 1;
            match byte {
                b'"' => break,
                b'\\' => {
                    let Some(escaped) = self.peek() else {
                        return Err(ParseError::UnterminatedString { line });
                    };
                    self.pos += 1;
                    if escaped == b'\n' {
                        self.line += 1;
                    }
                    if collect {
                        buf.push(match escaped {
                            b'n' => b'\n',
                            b't' => b'\t',
                            b'r' => b'\r',
                            other => other,
                        });
                    }
                }
                b'\n' => {
                    self.line += 1;
                    if collect {
                        buf.push(byte);
                    }
                }
                _ if collect => buf.push(byte),
                _ => {}
            }
        }

        Ok(Token {
            text: String::from_utf8_lossy(&buf).into_owned(),
            quoted: true,
            line,
        })
    }
}
