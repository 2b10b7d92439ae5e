use bytes::Bytes;

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{ListFrame, MAX_FRAME_SIZE};

/// Codec for the list stream: one JSON object per line.
pub struct FrameCodec;

impl FrameCodec {
    /// Encode a frame with its trailing newline.
    pub fn encode(frame: &ListFrame) -> ProtocolResult<Bytes> {
        let mut buf =
            serde_json::to_vec(frame).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
        if buf.len() > MAX_FRAME_SIZE {
            return Err(ProtocolError::FrameTooLarge {
                size: buf.len(),
                max: MAX_FRAME_SIZE,
            });
        }
        buf.push(b'\n');
        Ok(Bytes::from(buf))
    }

    /// Decode the first frame in `data`. Returns (frame, bytes_consumed).
    pub fn decode(data: &[u8]) -> ProtocolResult<(ListFrame, usize)> {
        let Some(end) = data.iter().position(|b| *b == b'\n') else {
            if data.len() > MAX_FRAME_SIZE {
                return Err(ProtocolError::FrameTooLarge { size: data.len(), max: MAX_FRAME_SIZE });
            }
            return Err(ProtocolError::FramingError(format!(
                "incomplete: {} bytes without terminator",
                data.len()
            )));
        };
        if end > MAX_FRAME_SIZE {
            return Err(ProtocolError::FrameTooLarge { size: end, max: MAX_FRAME_SIZE });
        }
        if end == 0 {
            return Err(ProtocolError::FramingError("empty frame".into()));
        }
        let frame: ListFrame = serde_json::from_slice(&data[..end])
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
        Ok((frame, end + 1))
    }

    /// Decode every frame in a complete stream body.
    ///
    /// Frames after an `Error` frame are a protocol violation.
    pub fn decode_all(mut data: &[u8]) -> ProtocolResult<Vec<ListFrame>> {
        let mut frames = Vec::new();
        while !data.is_empty() {
            if frames.last().is_some_and(ListFrame::is_error) {
                return Err(ProtocolError::FramingError("frame after error frame".into()));
            }
            let (frame, consumed) = Self::decode(data)?;
            frames.push(frame);
            data = &data[consumed..];
        }
        Ok(frames)
    }
}
