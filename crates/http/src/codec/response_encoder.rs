use crate::codec::header::HeaderEncoder;
use crate::protocol::{Response, SendError};
use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

/// Serializes a whole [`Response`]: head first, then the body bytes.
#[derive(Debug, Default)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Encoder<&Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.header_encoder.encode(response, dst)?;
        dst.reserve(response.body().len());
        dst.put_slice(response.body());
        Ok(())
    }
}
