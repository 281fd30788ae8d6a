//! Frame I/O over byte streams.

use bytes::Bytes;
use lectern_proto::{Frame, FrameHeader};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ServerError;

/// Read one frame.
///
/// Returns `Ok(None)` when the peer closes the stream. A stream cut inside a
/// frame is also treated as a close.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Frame>, ServerError>
where
    R: AsyncRead + Unpin,
{
    let mut header_buf = [0u8; FrameHeader::SIZE];
    match reader.read_exact(&mut header_buf).await {
        Ok(_) => {},
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let header = FrameHeader::from_bytes(&header_buf)?;
    let mut payload = vec![0u8; header.payload_size()];
    match reader.read_exact(&mut payload).await {
        Ok(_) => {},
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    Ok(Some(Frame::from_parts(header, Bytes::from(payload))?))
}

/// Write pre-encoded frame bytes.
pub async fn write_frame<W>(writer: &mut W, bytes: &[u8]) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(bytes).await?;
    writer.flush().await?;
    Ok(())
}
