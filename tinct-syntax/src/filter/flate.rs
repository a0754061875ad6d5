use crate::log::ldebug;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use std::io::Read;

pub(crate) fn decode(data: &[u8]) -> Option<Vec<u8>> {
    zlib(data).or_else(|| {
        ldebug!("stream is not valid zlib data, trying raw deflate");

        deflate(data)
    })
}

fn zlib(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = vec![];
    ZlibDecoder::new(data).read_to_end(&mut out).ok()?;

    Some(out)
}

fn deflate(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = vec![];
    DeflateDecoder::new(data).read_to_end(&mut out).ok()?;

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::{DeflateEncoder, ZlibEncoder};
    use std::io::Write;

    #[test]
    fn zlib_data() {
        let mut encoder = ZlibEncoder::new(vec![], Compression::default());
        encoder.write_all(b"sampled function data").unwrap();

        assert_eq!(
            decode(&encoder.finish().unwrap()).unwrap(),
            b"sampled function data"
        );
    }

    #[test]
    fn raw_deflate_data() {
        let mut encoder = DeflateEncoder::new(vec![], Compression::default());
        encoder.write_all(b"no zlib header").unwrap();

        assert_eq!(decode(&encoder.finish().unwrap()).unwrap(), b"no zlib header");
    }
}
