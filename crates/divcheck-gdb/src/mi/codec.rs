use tokio_util::bytes::BytesMut;
use tokio_util::codec::Decoder;

use super::{Record, parse_record};

/// Splits the output of `gdb` into MI records, one per line.
#[derive(Debug, Default)]
pub struct MiDecoder {
    /// Length of the buffered prefix already known to hold no newline.
    scanned: usize,
}

/// Decodes a single line of output.
///
/// The target shares the output of `gdb`, so a line looking like an MI
/// record may still be printed by the target: such a line is kept as
/// [Record::Unrecognized] rather than failing the whole stream.
fn decode_line(line: &[u8]) -> Option<Record> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches('\r');

    if line.trim().is_empty() {
        return None;
    }

    match parse_record(line) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::debug!(error = %e, "unparsable output line");
            Some(Record::Unrecognized(line.to_owned()))
        }
    }
}

impl Decoder for MiDecoder {
    type Item = Record;
    type Error = crate::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(newline) = src[self.scanned..].iter().position(|b| *b == b'\n') else {
                self.scanned = src.len();
                return Ok(None);
            };

            let line = src.split_to(self.scanned + newline + 1);
            self.scanned = 0;

            if let Some(record) = decode_line(&line[..line.len() - 1]) {
                return Ok(Some(record));
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(record) = self.decode(src)? {
            return Ok(Some(record));
        }

        // trailing line without newline
        let line = src.split_to(src.len());
        self.scanned = 0;

        Ok(decode_line(&line))
    }
}
