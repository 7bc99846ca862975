use group_chat_types::RawEvent;

const DELIMITER: &[u8] = b"\n\n";
const EVENT_PREFIX: &str = "event:";
const DATA_PREFIX: &str = "data:";
const DEFAULT_EVENT: &str = "message";

/// Incremental decoder for the turn-stream framing: records separated by a
/// blank line, lines inside a record tagged `event:` / `data:`.
///
/// The buffer carries unconsumed bytes across `feed` calls, so chunk
/// boundaries may fall anywhere, including inside the delimiter or inside a
/// multi-byte character. A record is only decoded to text once its closing
/// delimiter has arrived, which keeps split multi-byte characters intact.
/// Whatever is left in the buffer when the byte source ends is dropped with
/// the decoder; there is no partial-record flush.
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append a chunk and iterate the complete frames it unlocked. The
    /// remainder after the last delimiter stays buffered for the next call.
    pub fn feed<'a>(&'a mut self, chunk: &[u8]) -> Frames<'a> {
        self.buf.extend_from_slice(chunk);
        Frames { decoder: self }
    }

    fn next_frame(&mut self) -> Option<RawEvent> {
        loop {
            let at = self
                .buf
                .windows(DELIMITER.len())
                .position(|window| window == DELIMITER)?;
            let record = String::from_utf8_lossy(&self.buf[..at]).into_owned();
            self.buf.drain(..at + DELIMITER.len());
            let record = record.trim();
            if record.is_empty() {
                continue;
            }
            return Some(parse_record(record));
        }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the frames completed by one `feed` call.
pub struct Frames<'a> {
    decoder: &'a mut FrameDecoder,
}

impl Iterator for Frames<'_> {
    type Item = RawEvent;

    fn next(&mut self) -> Option<RawEvent> {
        self.decoder.next_frame()
    }
}

fn parse_record(record: &str) -> RawEvent {
    let mut name = DEFAULT_EVENT;
    let mut data = "";
    for line in record.split('\n') {
        if let Some(rest) = line.strip_prefix(EVENT_PREFIX) {
            name = rest.trim();
        } else if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
            // Last data line wins.
            data = rest.trim();
        }
    }
    RawEvent::new(name, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(decoder: &mut FrameDecoder, chunk: &[u8]) -> Vec<RawEvent> {
        decoder.feed(chunk).collect()
    }

    #[test]
    fn parses_name_and_payload() {
        let mut decoder = FrameDecoder::new();
        let events = collect(
            &mut decoder,
            b"event: agent.message.delta\ndata: {\"delta\":\"hi\"}\n\n",
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "agent.message.delta");
        assert_eq!(events[0].data(), "{\"delta\":\"hi\"}");
    }

    #[test]
    fn arbitrary_chunk_boundaries_yield_the_same_events() {
        // Multi-byte characters make byte-at-a-time feeding the worst case.
        let wire = "event: agent.message.delta\ndata: {\"delta\":\"你好 world\"}\n\nevent: done\n\n"
            .as_bytes();

        let mut whole = FrameDecoder::new();
        let expected = collect(&mut whole, wire);

        let mut split = FrameDecoder::new();
        let mut seen = Vec::new();
        for byte in wire {
            seen.extend(split.feed(std::slice::from_ref(byte)));
        }

        assert_eq!(expected.len(), 2);
        assert_eq!(seen, expected);
    }

    #[test]
    fn last_data_line_wins() {
        let mut decoder = FrameDecoder::new();
        let events = collect(&mut decoder, b"data: first\ndata: second\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data(), "second");
    }

    #[test]
    fn missing_event_line_defaults_to_message() {
        let mut decoder = FrameDecoder::new();
        let events = collect(&mut decoder, b"data: {}\n\n");
        assert_eq!(events[0].name(), "message");
    }

    #[test]
    fn remainder_stays_buffered_until_the_delimiter_arrives() {
        let mut decoder = FrameDecoder::new();
        assert!(collect(&mut decoder, b"event: done").is_empty());
        assert!(collect(&mut decoder, b"\n").is_empty());
        let events = collect(&mut decoder, b"\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "done");
    }

    #[test]
    fn blank_records_are_skipped() {
        let mut decoder = FrameDecoder::new();
        let events = collect(&mut decoder, b"\n\n\n\nevent: done\n\n\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "done");
    }

    #[test]
    fn untagged_lines_are_ignored() {
        let mut decoder = FrameDecoder::new();
        let events = collect(&mut decoder, b": comment\nevent: done\nnoise\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "done");
        assert_eq!(events[0].data(), "");
    }
}
