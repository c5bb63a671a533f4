use thiserror::Error;

/// Errors produced while reading a benchmark instance file. Every variant
/// names the 1-based line it was detected on.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found `{token}`")]
    InvalidToken {
        line: usize,
        expected: String,
        token: String,
    },
    #[error("line {line}: unexpected end of input while reading {expected}")]
    UnexpectedEnd { line: usize, expected: String },
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
}

impl ParseError {
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        ParseError::Malformed {
            line,
            message: message.into(),
        }
    }
}

/// Whitespace tokenizer over an instance file, tracking the line each token
/// came from so loaders can point at the offending field.
pub struct TokenReader<'a> {
    tokens: Vec<(usize, &'a str)>,
    pos: usize,
    last_line: usize,
}

impl<'a> TokenReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_start_line(text, 1)
    }

    /// Tokenize `text` with line numbering starting at `start_line`. Used by
    /// loaders that consume a header line themselves before handing the rest
    /// of the file over.
    pub fn with_start_line(text: &'a str, start_line: usize) -> Self {
        let tokens = text
            .lines()
            .enumerate()
            .flat_map(|(i, line)| {
                line.split_whitespace()
                    .map(move |token| (start_line + i, token))
            })
            .collect();
        TokenReader {
            tokens,
            pos: 0,
            last_line: start_line,
        }
    }

    /// Line of the most recently consumed token.
    pub fn line(&self) -> usize {
        self.last_line
    }

    fn next(&mut self, expected: &str) -> Result<(usize, &'a str), ParseError> {
        match self.tokens.get(self.pos) {
            Some(&(line, token)) => {
                self.pos += 1;
                self.last_line = line;
                Ok((line, token))
            }
            None => Err(ParseError::UnexpectedEnd {
                line: self.last_line,
                expected: expected.to_string(),
            }),
        }
    }

    /// Next token as an arbitrary identifier.
    pub fn ident(&mut self, expected: &str) -> Result<&'a str, ParseError> {
        Ok(self.next(expected)?.1)
    }

    pub fn usize_field(&mut self, field: &str) -> Result<usize, ParseError> {
        let (line, token) = self.next(field)?;
        token.parse().map_err(|_| ParseError::InvalidToken {
            line,
            expected: format!("{} (non-negative integer)", field),
            token: token.to_string(),
        })
    }

    pub fn i64_field(&mut self, field: &str) -> Result<i64, ParseError> {
        let (line, token) = self.next(field)?;
        token.parse().map_err(|_| ParseError::InvalidToken {
            line,
            expected: format!("{} (integer)", field),
            token: token.to_string(),
        })
    }

    pub fn f64_field(&mut self, field: &str) -> Result<f64, ParseError> {
        let (line, token) = self.next(field)?;
        token.parse().map_err(|_| ParseError::InvalidToken {
            line,
            expected: format!("{} (number)", field),
            token: token.to_string(),
        })
    }

    pub fn i64_block(&mut self, count: usize, field: &str) -> Result<Vec<i64>, ParseError> {
        (0..count).map(|_| self.i64_field(field)).collect()
    }

    pub fn f64_block(&mut self, count: usize, field: &str) -> Result<Vec<f64>, ParseError> {
        (0..count).map(|_| self.f64_field(field)).collect()
    }

    /// A declared count covers the whole file; trailing tokens mean the
    /// count and the data disagree.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some(&(line, token)) => Err(ParseError::InvalidToken {
                line,
                expected: "end of input".to_string(),
                token: token.to_string(),
            }),
        }
    }
}
