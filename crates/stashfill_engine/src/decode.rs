use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};
use stashfill_logging::fill_warn;

/// Incremental bytes-to-text decoder for a chunked response body.
///
/// Keeps state between chunks so a multi-byte character split across a chunk
/// boundary is emitted whole once its remaining bytes arrive.
pub struct StreamDecoder {
    decoder: Decoder,
    encoding: &'static Encoding,
}

impl StreamDecoder {
    pub fn utf8() -> Self {
        Self::for_encoding(UTF_8)
    }

    /// Decoder for the charset named in a Content-Type header, defaulting to UTF-8.
    /// A BOM in the body still takes precedence.
    pub fn for_content_type(content_type: Option<&str>) -> Self {
        let encoding = content_type
            .and_then(extract_charset)
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        Self::for_encoding(encoding)
    }

    fn for_encoding(encoding: &'static Encoding) -> Self {
        Self {
            decoder: encoding.new_decoder(),
            encoding,
        }
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decodes one chunk. Trailing bytes of an incomplete character are held back.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.decode_inner(bytes, false)
    }

    /// Flushes held-back bytes at end of stream; incomplete sequences become U+FFFD.
    pub fn finish(&mut self) -> String {
        self.decode_inner(&[], true)
    }

    fn decode_inner(&mut self, mut input: &[u8], last: bool) -> String {
        let mut out = String::new();
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(input.len())
                .unwrap_or(input.len().saturating_mul(3).saturating_add(4));
            out.reserve(needed);
            let (result, read, had_errors) = self.decoder.decode_to_string(input, &mut out, last);
            if had_errors {
                fill_warn!(
                    "Replaced malformed {} sequence in response body",
                    self.encoding.name()
                );
            }
            input = &input[read..];
            match result {
                CoderResult::InputEmpty => return out,
                CoderResult::OutputFull => continue,
            }
        }
    }
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let part = part.trim();
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()))
        })
        .next()
        .map(|s| s.to_string())
}
