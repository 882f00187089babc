//! Path expression parser.

use super::error::PathError;

/// Splits `expr` into path segments.
pub fn parse_path(expr: &str) -> Result<Vec<String>, PathError> {
    Parser::parse(expr)
}

/// Parser for path expression strings.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(expr: &'a str) -> Self {
        Self {
            input: expr,
            position: 0,
        }
    }

    /// Parses the whole expression into segments.
    pub fn parse(expr: &str) -> Result<Vec<String>, PathError> {
        let mut parser = Parser::new(expr.trim());
        parser.parse_segments()
    }

    fn parse_segments(&mut self) -> Result<Vec<String>, PathError> {
        let mut segments = Vec::new();

        if self.peek() == Some('.') {
            self.next();
        }
        if self.is_eof() {
            return Ok(segments);
        }

        segments.push(self.parse_segment()?);
        while let Some(ch) = self.peek() {
            match ch {
                '.' => {
                    self.next();
                    segments.push(self.parse_segment()?);
                }
                '[' => segments.push(self.parse_bracket()?),
                other => {
                    return Err(PathError::UnexpectedToken {
                        position: self.position,
                        found: other.to_string(),
                        expected: "'.' or '['".to_string(),
                    })
                }
            }
        }

        Ok(segments)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char) -> Result<(), PathError> {
        let pos = self.position;
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(PathError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: format!("'{}'", expected),
            }),
            None => Err(PathError::UnexpectedEnd {
                expected: format!("'{}'", expected),
            }),
        }
    }

    /// Parses one segment following a `.` or at the start.
    fn parse_segment(&mut self) -> Result<String, PathError> {
        match self.peek() {
            Some('"') => self.parse_quoted(),
            Some('[') => self.parse_bracket(),
            _ => self.parse_bare(),
        }
    }

    /// Parses an unquoted key, which runs until the next `.` or `[`.
    fn parse_bare(&mut self) -> Result<String, PathError> {
        let start = self.position;
        while let Some(ch) = self.peek() {
            match ch {
                '.' | '[' => break,
                ']' | '"' => {
                    return Err(PathError::UnexpectedToken {
                        position: self.position,
                        found: ch.to_string(),
                        expected: "a key".to_string(),
                    })
                }
                _ => {
                    self.next();
                }
            }
        }
        if self.position == start {
            return Err(PathError::EmptySegment { position: start });
        }
        Ok(self.input[start..self.position].to_string())
    }

    /// Parses a double-quoted key; the quotes keep `.` and `[` literal.
    fn parse_quoted(&mut self) -> Result<String, PathError> {
        self.expect('"')?;
        let mut value = String::new();
        loop {
            let pos = self.position;
            match self.next() {
                Some('"') => break,
                Some('\\') => match self.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some(_) => return Err(PathError::InvalidEscape { position: pos }),
                    None => {
                        return Err(PathError::UnexpectedEnd {
                            expected: "closing quote '\"'".to_string(),
                        })
                    }
                },
                Some(ch) => value.push(ch),
                None => {
                    return Err(PathError::UnexpectedEnd {
                        expected: "closing quote '\"'".to_string(),
                    })
                }
            }
        }
        Ok(value)
    }

    /// Parses a bracket segment: `[0]`, `[*]`, `[+]` or `["key"]`.
    fn parse_bracket(&mut self) -> Result<String, PathError> {
        self.expect('[')?;
        let segment = match self.peek() {
            Some('"') => self.parse_quoted()?,
            Some(']') => return Err(PathError::EmptySegment { position: self.position }),
            Some(_) => {
                let start = self.position;
                while let Some(ch) = self.peek() {
                    if ch == ']' {
                        break;
                    }
                    self.next();
                }
                let inner = self.input[start..self.position].trim();
                if inner.is_empty() {
                    return Err(PathError::EmptySegment { position: start });
                }
                if inner != "*" && inner != "+" && !inner.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(PathError::UnexpectedToken {
                        position: start,
                        found: inner.to_string(),
                        expected: "an index, '*', '+' or a quoted key".to_string(),
                    });
                }
                inner.to_string()
            }
            None => {
                return Err(PathError::UnexpectedEnd {
                    expected: "']'".to_string(),
                })
            }
        };
        self.expect(']')?;
        Ok(segment)
    }
}
