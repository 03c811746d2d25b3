// Frame demultiplexer: extracts self-delimited JPEG frames from a
// continuous byte stream

use std::io::Read;

/// Two-byte frame delimiters (JPEG SOI / EOI)
const FRAME_START: [u8; 2] = [0xFF, 0xD8];
const FRAME_END: [u8; 2] = [0xFF, 0xD9];

const READ_CHUNK: usize = 8192;

/// Error types for frame demultiplexing
#[derive(Debug, thiserror::Error)]
pub enum DemuxError {
    #[error("stream read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame exceeded {limit} bytes without a terminator")]
    FrameTooLarge { limit: usize },
}

pub type DemuxResult<T> = Result<T, DemuxError>;

/// Scans a byte stream for frames bounded by the fixed start/end markers.
///
/// Holds only a read cursor and the frame being assembled; leftover bytes
/// from one read are carried into the next call, so frames packed
/// back-to-back are all recovered. End-of-stream before a start marker,
/// or inside an unterminated frame, is "no more frames" rather than an
/// error; a frame growing past `max_frame_bytes` is fatal.
pub struct FrameDemuxer<R: Read> {
    reader: R,
    buf: [u8; READ_CHUNK],
    buf_len: usize,
    buf_pos: usize,
    max_frame_bytes: usize,
}

impl<R: Read> FrameDemuxer<R> {
    pub fn new(reader: R, max_frame_bytes: usize) -> Self {
        Self {
            reader,
            buf: [0u8; READ_CHUNK],
            buf_len: 0,
            buf_pos: 0,
            max_frame_bytes,
        }
    }

    /// Next complete frame, inclusive of both markers, or None at
    /// end-of-stream.
    pub fn next_frame(&mut self) -> DemuxResult<Option<Vec<u8>>> {
        if !self.seek_frame_start()? {
            return Ok(None);
        }

        let mut frame = Vec::with_capacity(32 * 1024);
        frame.extend_from_slice(&FRAME_START);

        let mut prev = 0u8;
        loop {
            let byte = match self.next_byte()? {
                Some(b) => b,
                None => return Ok(None), // truncated frame: stream over
            };
            if frame.len() >= self.max_frame_bytes {
                return Err(DemuxError::FrameTooLarge {
                    limit: self.max_frame_bytes,
                });
            }
            frame.push(byte);
            if prev == FRAME_END[0] && byte == FRAME_END[1] {
                return Ok(Some(frame));
            }
            prev = byte;
        }
    }

    /// Consume bytes until the start marker has been read; false at EOF
    fn seek_frame_start(&mut self) -> DemuxResult<bool> {
        let mut prev = 0u8;
        loop {
            let byte = match self.next_byte()? {
                Some(b) => b,
                None => return Ok(false),
            };
            if prev == FRAME_START[0] && byte == FRAME_START[1] {
                return Ok(true);
            }
            prev = byte;
        }
    }

    fn next_byte(&mut self) -> DemuxResult<Option<u8>> {
        if self.buf_pos >= self.buf_len {
            let n = self.reader.read(&mut self.buf)?;
            if n == 0 {
                return Ok(None);
            }
            self.buf_len = n;
            self.buf_pos = 0;
        }
        let byte = self.buf[self.buf_pos];
        self.buf_pos += 1;
        Ok(Some(byte))
    }
}
