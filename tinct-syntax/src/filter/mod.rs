mod ascii_hex;
mod flate;

use crate::error::{DecodeError, Result, bail};
use crate::log::lwarn;
use crate::object::dict::keys::*;
use crate::object::{Dict, Name, Object};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Filter {
    AsciiHexDecode,
    FlateDecode,
}

impl Filter {
    pub(crate) fn from_name(name: &Name) -> Result<Self> {
        match &**name {
            ASCII_HEX_DECODE | ASCII_HEX_DECODE_ABBREVIATION => Ok(Self::AsciiHexDecode),
            FLATE_DECODE | FLATE_DECODE_ABBREVIATION => Ok(Self::FlateDecode),
            _ => {
                lwarn!("unsupported filter: {}", name.as_str());

                bail!(DecodeError::UnsupportedFilter(name.clone()))
            }
        }
    }

    pub(crate) fn apply(&self, data: &[u8], params: Option<&Dict>) -> Result<Vec<u8>> {
        match self {
            Self::AsciiHexDecode => ascii_hex::decode(data).ok_or(DecodeError::InvalidHexData),
            Self::FlateDecode => {
                if let Some(Object::Number(predictor)) = params.and_then(|p| p.get_raw(PREDICTOR))
                    && predictor.as_i32() > 1
                {
                    bail!(DecodeError::UnsupportedPredictor(predictor.as_i32()));
                }

                flate::decode(data).ok_or(DecodeError::InvalidFlateData)
            }
        }
    }
}
