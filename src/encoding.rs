//! Encoding selection and strict line decoding
//!
//! Input files are decoded incrementally under a caller-chosen encoding and
//! split into lines. Unlike a lossy transcoder, malformed input is reported
//! as an error instead of being replaced.

use crate::error::{Error, Result};
use chardetng::EncodingDetector;
use encoding_rs::{Decoder, DecoderResult};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Bytes pulled from the reader per decode step
const CHUNK_SIZE: usize = 64 * 1024;

/// Bytes sampled when sniffing a file's encoding
const SNIFF_SAMPLE: usize = 64 * 1024;

/// Encodings the filter can read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// Every byte is the code point of the same value; never fails to decode
    #[default]
    Latin1,
    /// 8-bit Western code page
    Windows1252,
    /// Strict UTF-8, leading BOM dropped
    Utf8,
    /// UTF-16 with BOM sniffing, little-endian when no BOM is present
    Utf16,
}

impl TextEncoding {
    pub const ALL: [TextEncoding; 4] = [
        TextEncoding::Latin1,
        TextEncoding::Windows1252,
        TextEncoding::Utf8,
        TextEncoding::Utf16,
    ];

    /// Canonical display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Latin1 => "ISO-8859-1",
            Self::Windows1252 => "WINDOWS-1252",
            Self::Utf8 => "UTF-8",
            Self::Utf16 => "UTF-16",
        }
    }

    /// Comma-separated list of canonical names, for help and prompts
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether text in `other` reads the same way under `self` for hint purposes
    pub fn agrees_with(self, other: TextEncoding) -> bool {
        use TextEncoding::*;
        matches!(
            (self, other),
            (Latin1 | Windows1252, Latin1 | Windows1252) | (Utf8, Utf8) | (Utf16, Utf16)
        )
    }

    fn new_decoder(self) -> LineDecoder {
        match self {
            Self::Latin1 => LineDecoder::Latin1,
            Self::Windows1252 => {
                LineDecoder::Whatwg(encoding_rs::WINDOWS_1252.new_decoder_without_bom_handling())
            }
            Self::Utf8 => LineDecoder::Whatwg(encoding_rs::UTF_8.new_decoder_with_bom_removal()),
            Self::Utf16 => LineDecoder::Whatwg(encoding_rs::UTF_16LE.new_decoder()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace('_', "-");

        match normalized.as_str() {
            "ISO-8859-1" | "ISO8859-1" | "LATIN-1" | "LATIN1" => Ok(Self::Latin1),
            "WINDOWS-1252" | "CP1252" => Ok(Self::Windows1252),
            "UTF-8" | "UTF8" => Ok(Self::Utf8),
            "UTF-16" | "UTF16" => Ok(Self::Utf16),
            _ => Err(Error::config(format!(
                "unsupported encoding '{}' (supported: {})",
                s,
                Self::supported_names()
            ))),
        }
    }
}

/// Streaming decoder state for one input
enum LineDecoder {
    Latin1,
    Whatwg(Decoder),
}

impl LineDecoder {
    /// Append the decoded form of `src` to `dst`. Returns `false` on malformed input.
    fn decode(&mut self, src: &[u8], last: bool, dst: &mut String) -> bool {
        match self {
            Self::Latin1 => {
                dst.push_str(&encoding_rs::mem::decode_latin1(src));
                true
            }
            Self::Whatwg(decoder) => {
                let mut src = src;
                loop {
                    let needed = decoder
                        .max_utf8_buffer_length_without_replacement(src.len())
                        .unwrap_or(src.len() * 3 + 4);
                    dst.reserve(needed);

                    let (result, read) = decoder.decode_to_string_without_replacement(src, dst, last);
                    src = &src[read..];

                    match result {
                        DecoderResult::InputEmpty => return true,
                        DecoderResult::OutputFull => continue,
                        DecoderResult::Malformed(_, _) => return false,
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Reading,
    Malformed,
    Eof,
    Done,
}

/// Iterator over the lines of a byte stream decoded under a [`TextEncoding`].
///
/// Lines are split on `\n` and lose one trailing `\r`. A final line without a
/// terminator is still yielded; an empty stream yields nothing. Lines decoded
/// before a malformed sequence are yielded first, then a single
/// [`Error::Decode`] ends the iteration.
pub struct DecodedLines<R: Read> {
    reader: R,
    encoding: TextEncoding,
    decoder: LineDecoder,
    chunk: Vec<u8>,
    text: String,
    consumed: usize,
    line_no: u64,
    bytes_read: u64,
    state: ReadState,
}

impl<R: Read> DecodedLines<R> {
    pub fn new(reader: R, encoding: TextEncoding) -> Self {
        Self {
            reader,
            encoding,
            decoder: encoding.new_decoder(),
            chunk: vec![0u8; CHUNK_SIZE],
            text: String::new(),
            consumed: 0,
            line_no: 0,
            bytes_read: 0,
            state: ReadState::Reading,
        }
    }

    /// Raw bytes pulled from the reader so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Lines yielded so far
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }

    fn take_line(&mut self, end: usize, next: usize) -> String {
        let raw = &self.text[self.consumed..end];
        let line = raw.strip_suffix('\r').unwrap_or(raw).to_string();
        self.consumed = next;
        self.line_no += 1;
        line
    }

    fn fill(&mut self) -> Option<Error> {
        self.text.drain(..self.consumed);
        self.consumed = 0;

        let n = loop {
            match self.reader.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Some(Error::Unexpected(e)),
            }
        };
        self.bytes_read += n as u64;

        let last = n == 0;
        if !self.decoder.decode(&self.chunk[..n], last, &mut self.text) {
            self.state = ReadState::Malformed;
        } else if last {
            self.state = ReadState::Eof;
        }
        None
    }
}

impl<R: Read> Iterator for DecodedLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pending = &self.text.as_bytes()[self.consumed..];
            if let Some(pos) = memchr::memchr(b'\n', pending) {
                let end = self.consumed + pos;
                return Some(Ok(self.take_line(end, end + 1)));
            }

            match self.state {
                ReadState::Reading => {
                    if let Some(err) = self.fill() {
                        self.state = ReadState::Done;
                        return Some(Err(err));
                    }
                }
                ReadState::Eof => {
                    self.state = ReadState::Done;
                    if self.consumed < self.text.len() {
                        let end = self.text.len();
                        return Some(Ok(self.take_line(end, end)));
                    }
                    return None;
                }
                ReadState::Malformed => {
                    self.state = ReadState::Done;
                    log::debug!(
                        "Malformed {} input after {} complete lines",
                        self.encoding,
                        self.line_no
                    );
                    return Some(Err(Error::Decode {
                        encoding: self.encoding.name(),
                        line: self.line_no + 1,
                    }));
                }
                ReadState::Done => return None,
            }
        }
    }
}

/// Guess a file's encoding from its first bytes.
///
/// Returns `None` when the sample is empty or pure ASCII, since every
/// supported single-byte encoding and UTF-8 read it identically. Advisory
/// only; the filter always uses the encoding it was configured with.
pub fn sniff_encoding(path: &Path) -> Result<Option<TextEncoding>> {
    let mut file = File::open(path)
        .map_err(|e| Error::resource("cannot open input file", path, e))?;

    let mut sample = Vec::with_capacity(SNIFF_SAMPLE);
    file.by_ref()
        .take(SNIFF_SAMPLE as u64)
        .read_to_end(&mut sample)?;

    Ok(sniff_bytes(&sample))
}

fn sniff_bytes(sample: &[u8]) -> Option<TextEncoding> {
    if let Some(encoding) = detect_bom(sample) {
        return Some(encoding);
    }

    if sample.is_ascii() {
        return None;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, true);
    let guess = detector.guess(None, true);

    if guess == encoding_rs::UTF_8 {
        Some(TextEncoding::Utf8)
    } else if guess == encoding_rs::WINDOWS_1252 {
        Some(TextEncoding::Windows1252)
    } else {
        log::debug!("Sniffed unsupported encoding {}", guess.name());
        None
    }
}

/// Detect BOM (Byte Order Mark) at the start of content
fn detect_bom(content: &[u8]) -> Option<TextEncoding> {
    if content.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some(TextEncoding::Utf8);
    }
    if content.starts_with(&[0xFE, 0xFF]) || content.starts_with(&[0xFF, 0xFE]) {
        return Some(TextEncoding::Utf16);
    }
    None
}
