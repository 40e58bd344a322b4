use std::io::{self, ErrorKind, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// A quote was seen inside a quoted field: either the first half of an
    /// escaped `""` or the closing quote.
    QuoteInQuoted,
}

/// Rejects quoting mistakes the `csv` parser would otherwise accept.
///
/// Bytes are checked as they are read. A bad byte ends the stream with an
/// `InvalidData` error once the valid bytes before it have been handed out,
/// so rows preceding the mistake still parse. Three mistakes are refused:
///
/// - a `"` inside a field that did not start with a quote
/// - anything but a delimiter or line end right after a closing quote
/// - a quoted field still open at the end of the input
pub struct StrictQuoting<R> {
    inner: R,
    delimiter: u8,
    state: QuoteState,
    line: u64,
    quote_line: u64,
    pending: Option<io::Error>,
}

impl<R: Read> StrictQuoting<R> {
    pub fn new(inner: R, delimiter: u8) -> Self {
        Self {
            inner,
            delimiter,
            state: QuoteState::FieldStart,
            line: 1,
            quote_line: 1,
            pending: None,
        }
    }

    fn advance(&mut self, byte: u8) -> Result<(), String> {
        let boundary = byte == self.delimiter || byte == b'\n' || byte == b'\r';

        self.state = match self.state {
            QuoteState::FieldStart if byte == b'"' => {
                self.quote_line = self.line;
                QuoteState::Quoted
            }
            QuoteState::FieldStart | QuoteState::Unquoted if boundary => QuoteState::FieldStart,
            QuoteState::FieldStart | QuoteState::Unquoted if byte == b'"' => {
                return Err(format!("bare quote in unquoted field on line {}", self.line));
            }
            QuoteState::FieldStart | QuoteState::Unquoted => QuoteState::Unquoted,
            QuoteState::Quoted if byte == b'"' => QuoteState::QuoteInQuoted,
            QuoteState::Quoted => QuoteState::Quoted,
            QuoteState::QuoteInQuoted if byte == b'"' => QuoteState::Quoted,
            QuoteState::QuoteInQuoted if boundary => QuoteState::FieldStart,
            QuoteState::QuoteInQuoted => {
                return Err(format!(
                    "unexpected {:?} after closing quote on line {}",
                    char::from(byte),
                    self.line
                ));
            }
        };

        if byte == b'\n' {
            self.line += 1;
        }
        Ok(())
    }
}

impl<R: Read> Read for StrictQuoting<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(error) = self.pending.take() {
            return Err(error);
        }

        let n = self.inner.read(buf)?;

        if n == 0 && self.state == QuoteState::Quoted {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!(
                    "unterminated quoted field starting on line {}",
                    self.quote_line
                ),
            ));
        }

        for (offset, byte) in buf[..n].iter().enumerate() {
            if let Err(message) = self.advance(*byte) {
                let error = io::Error::new(ErrorKind::InvalidData, message);
                if offset == 0 {
                    return Err(error);
                }
                self.pending = Some(error);
                return Ok(offset);
            }
        }

        Ok(n)
    }
}
