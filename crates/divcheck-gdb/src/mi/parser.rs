use super::{AsyncKind, Record, Results, StreamKind, Value};

/// Parses a single line of MI output.
///
/// Lines not following the MI output syntax at all are returned as
/// [Record::Unrecognized], whereas MI records with a malformed body are
/// rejected.
pub fn parse_record(line: &str) -> crate::Result<Record> {
    let line = line.trim_end_matches(['\r', '\n']);

    if line.trim_end() == "(gdb)" {
        return Ok(Record::Prompt);
    }

    let mut cursor = Cursor { input: line, pos: 0 };

    parse_with(&mut cursor).map_err(|reason| crate::Error::Parse {
        line: line.to_owned(),
        reason,
    })
}

fn parse_with(cursor: &mut Cursor<'_>) -> Result<Record, &'static str> {
    let token = cursor.token();

    let record = match cursor.bump() {
        Some(b'^') => Record::Result {
            token,
            class: cursor.class().into(),
            results: cursor.trailing_results()?,
        },
        Some(prefix @ (b'*' | b'+' | b'=')) => Record::Async {
            token,
            kind: match prefix {
                b'*' => AsyncKind::Exec,
                b'+' => AsyncKind::Status,
                _ => AsyncKind::Notify,
            },
            class: cursor.class().to_owned(),
            results: cursor.trailing_results()?,
        },
        Some(prefix @ (b'~' | b'@' | b'&')) if token.is_none() && cursor.peek() == Some(b'"') => {
            Record::Stream {
                kind: match prefix {
                    b'~' => StreamKind::Console,
                    b'@' => StreamKind::Target,
                    _ => StreamKind::Log,
                },
                text: cursor.c_string()?,
            }
        }
        _ => Record::Unrecognized(cursor.input.to_owned()),
    };

    Ok(record)
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn eat(&mut self, expected: u8) -> bool {
        let matches = self.peek() == Some(expected);
        if matches {
            self.pos += 1;
        }
        matches
    }

    fn expect(&mut self, expected: u8, reason: &'static str) -> Result<(), &'static str> {
        if self.eat(expected) { Ok(()) } else { Err(reason) }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn token(&mut self) -> Option<u64> {
        self.take_while(|b| b.is_ascii_digit()).parse().ok()
    }

    fn class(&mut self) -> &'a str {
        self.take_while(|b| b != b',')
    }

    /// Parses the `,name=value` pairs ending the line.
    fn trailing_results(&mut self) -> Result<Results, &'static str> {
        let mut results = Vec::new();

        while self.peek().is_some() {
            self.expect(b',', "expected `,`")?;
            results.push(self.result()?);
        }

        Ok(Results(results))
    }

    fn result(&mut self) -> Result<(String, Value), &'static str> {
        let name = self.take_while(|b| !matches!(b, b'=' | b',' | b'{' | b'}' | b'[' | b']' | b'"'));

        if name.is_empty() {
            return Err("missing variable name");
        }

        self.expect(b'=', "expected `=`")?;

        Ok((name.to_owned(), self.value()?))
    }

    fn value(&mut self) -> Result<Value, &'static str> {
        match self.peek() {
            Some(b'"') => self.c_string().map(Value::Const),
            Some(b'{') => {
                self.pos += 1;
                self.tuple()
            }
            Some(b'[') => {
                self.pos += 1;
                self.list()
            }
            _ => Err("invalid value"),
        }
    }

    fn tuple(&mut self) -> Result<Value, &'static str> {
        let mut results = Vec::new();

        if self.eat(b'}') {
            return Ok(Value::Tuple(Results(results)));
        }

        loop {
            results.push(self.result()?);

            match self.bump() {
                Some(b',') => continue,
                Some(b'}') => break Ok(Value::Tuple(Results(results))),
                _ => break Err("unterminated tuple"),
            }
        }
    }

    fn list(&mut self) -> Result<Value, &'static str> {
        let mut values = Vec::new();

        if self.eat(b']') {
            return Ok(Value::List(values));
        }

        loop {
            let value = match self.peek() {
                Some(b'"' | b'{' | b'[') => self.value()?,
                _ => Value::Tuple(Results(vec![self.result()?])),
            };

            values.push(value);

            match self.bump() {
                Some(b',') => continue,
                Some(b']') => break Ok(Value::List(values)),
                _ => break Err("unterminated list"),
            }
        }
    }

    fn c_string(&mut self) -> Result<String, &'static str> {
        self.expect(b'"', "expected `\"`")?;

        let mut bytes = Vec::new();

        loop {
            match self.bump().ok_or("unterminated c-string")? {
                b'"' => break,
                b'\\' => match self.bump().ok_or("unterminated escape sequence")? {
                    b'n' => bytes.push(b'\n'),
                    b't' => bytes.push(b'\t'),
                    b'r' => bytes.push(b'\r'),
                    b'e' => bytes.push(0x1b),
                    digit @ b'0'..=b'7' => {
                        // octal escapes encode raw bytes (e.g., UTF-8 sequences)
                        let mut code = u32::from(digit - b'0');
                        for _ in 0..2 {
                            match self.peek() {
                                Some(digit @ b'0'..=b'7') => {
                                    code = code * 8 + u32::from(digit - b'0');
                                    self.pos += 1;
                                }
                                _ => break,
                            }
                        }
                        bytes.push(code as u8);
                    }
                    other => bytes.push(other),
                },
                b => bytes.push(b),
            }
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
