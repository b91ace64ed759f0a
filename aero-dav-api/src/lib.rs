//! Typed view of the XML bodies a WebDAV server answers with:
//! `207 Multi-Status` documents, error documents and the dates they carry.
//!
//! Sending the requests is left to the HTTP client using this crate.

// utils
pub mod config;
pub mod error;
pub mod xml;

// webdav
pub mod types;
pub mod encoder;
pub mod decoder;

// fields
pub mod status;
pub mod time;

use quick_xml::reader::NsReader;

use config::EncoderConfig;
use error::DecodeError;
use types::{Error, Multistatus};

/// Decode the first `T` found in the document
pub fn decode<T: xml::Node<T>>(src: &[u8]) -> Result<T, DecodeError> {
    let mut rdr = xml::Reader::new(NsReader::from_reader(src))?;
    rdr.find::<T>()
}

pub fn decode_multistatus(src: &[u8]) -> Result<Multistatus, DecodeError> {
    match decode::<Multistatus>(src) {
        Ok(ms) => {
            tracing::trace!(responses = ms.responses.len(), "decoded multistatus");
            Ok(ms)
        }
        Err(e) => {
            tracing::debug!(err=?e, "unable to decode multistatus");
            Err(e)
        }
    }
}

pub fn decode_error(src: &[u8]) -> Result<Error, DecodeError> {
    decode::<Error>(src).map_err(|e| {
        tracing::debug!(err=?e, "unable to decode error document");
        e
    })
}

pub fn encode(elem: &impl xml::QWrite, config: &EncoderConfig) -> Result<Vec<u8>, quick_xml::Error> {
    let mut writer = xml::Writer::new(Vec::new(), config);
    if config.xml_declaration {
        writer.write_declaration()?;
    }
    elem.qwrite(&mut writer)?;
    Ok(writer.into_inner())
}

pub fn encode_multistatus(ms: &Multistatus) -> Result<Vec<u8>, quick_xml::Error> {
    encode(ms, &EncoderConfig::default())
}

pub fn encode_error(err: &Error) -> Result<Vec<u8>, quick_xml::Error> {
    encode(err, &EncoderConfig::default())
}
