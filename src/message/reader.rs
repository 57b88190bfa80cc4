// Copyright 2024 the dnswire developers.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implementation of the [`Reader`] type to read on-the-wire DNS
//! messages.

use std::fmt;

use super::header::{Header, HEADER_WIRE_LEN};
use super::Question;
use crate::name::{self, Name};
use crate::rr::rdata::RdataError;
use crate::rr::{Rdata, Record};

////////////////////////////////////////////////////////////////////////
// READER                                                             //
////////////////////////////////////////////////////////////////////////

/// A "frame" around a buffer containing a DNS message that enables
/// reading the message data.
///
/// A `Reader` is constructed using its [`TryFrom`] implementation. Any
/// underlying buffer for a reader must contain at least a full DNS
/// message header of 12 octets; otherwise the construction will fail.
///
/// The header is decoded up front and can be inspected at any time
/// with [`Reader::header`]. Questions and records are read with
/// [`Reader::read_question`] and [`Reader::read_record`], which use a
/// cursor initially set to the first octet after the header. They must
/// be called sequentially to read any questions, and then any records,
/// in the order they appear in the message.
#[derive(Eq, PartialEq)]
pub struct Reader<'a> {
    octets: &'a [u8],
    header: Header,
    cursor: usize,
}

impl<'a> Reader<'a> {
    /// Returns the decoded message header.
    pub fn header(&self) -> Header {
        self.header
    }

    /// Reads a [`Question`] starting at the current cursor.
    ///
    /// This method is atomic, in that the cursor is not changed on
    /// failure.
    pub fn read_question(&mut self) -> Result<Question> {
        let (qname, qname_len) =
            Name::try_from_compressed(self.octets, self.cursor).map_err(Error::from)?;
        let qname_end = self.cursor + qname_len;
        let qtype = read_u16(self.octets, qname_end)?.into();
        let qclass = read_u16(self.octets, qname_end + 2)?.into();
        self.cursor = qname_end + 4;
        Ok(Question {
            qname,
            qtype,
            qclass,
        })
    }

    /// Reads a resource record starting at the current cursor. RDATA
    /// with embedded compressed names is decompressed, so the returned
    /// [`Record`] is always in canonical uncompressed form.
    ///
    /// This method is atomic, in that the cursor is not changed on
    /// failure.
    pub fn read_record(&mut self) -> Result<Record> {
        let (owner, owner_len) =
            Name::try_from_compressed(self.octets, self.cursor).map_err(Error::from)?;
        let owner_end = self.cursor + owner_len;
        let rr_type = read_u16(self.octets, owner_end)?.into();
        let class = read_u16(self.octets, owner_end + 2)?.into();
        let ttl = read_u32(self.octets, owner_end + 4)?.into();
        let rdlength = read_u16(self.octets, owner_end + 8)?;
        let rdata_start = owner_end + 10;
        if rdata_start + rdlength as usize > self.octets.len() {
            return Err(Error::TruncatedMessage);
        }
        let rdata = Rdata::read(class, rr_type, self.octets, rdata_start, rdlength)
            .map_err(Error::InvalidRdata)?;
        self.cursor = rdata_start + rdlength as usize;
        Ok(Record {
            owner,
            rr_type,
            class,
            ttl,
            rdata,
        })
    }

    /// Returns whether the `Reader`'s cursor has reached the end of
    /// the message.
    pub fn at_eom(&self) -> bool {
        self.cursor >= self.octets.len()
    }
}

impl<'a> TryFrom<&'a [u8]> for Reader<'a> {
    type Error = Error;

    fn try_from(octets: &'a [u8]) -> Result<Self> {
        let header = Header::from_wire(octets).or(Err(Error::MalformedHeader))?;
        Ok(Self {
            octets,
            header,
            cursor: HEADER_WIRE_LEN,
        })
    }
}

impl fmt::Debug for Reader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Reader")
            .field("header", &self.header)
            .field("cursor", &self.cursor)
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////
// HELPERS FOR READING MULTI-BYTE INTEGERS                            //
////////////////////////////////////////////////////////////////////////

/// Reads a network-byte-order `u16` at index `at` of `octets`.
fn read_u16(octets: &[u8], at: usize) -> Result<u16> {
    octets
        .get(at..at + 2)
        .ok_or(Error::TruncatedMessage)
        .map(|field| u16::from_be_bytes(field.try_into().unwrap()))
}

/// Reads a network-byte-order `u32` at index `at` of `octets`.
fn read_u32(octets: &[u8], at: usize) -> Result<u32> {
    octets
        .get(at..at + 4)
        .ok_or(Error::TruncatedMessage)
        .map(|field| u32::from_be_bytes(field.try_into().unwrap()))
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that a message, a [`Question`], or a [`Record`]
/// could not be read.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// The buffer is too short to contain a message header.
    MalformedHeader,

    /// The message ended in the middle of a question or record.
    TruncatedMessage,

    /// A domain name in the message was invalid.
    InvalidName(name::Error),

    /// A record's RDATA was invalid.
    InvalidRdata(RdataError),
}

/// Name errors that indicate the message simply stopped short are
/// reported as truncation; all others are reported as invalid names.
impl From<name::Error> for Error {
    fn from(err: name::Error) -> Self {
        match err {
            name::Error::UnexpectedEom => Self::TruncatedMessage,
            _ => Self::InvalidName(err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::MalformedHeader => f.write_str("message is too short to contain a header"),
            Self::TruncatedMessage => f.write_str("unexpected end of message"),
            Self::InvalidName(err) => write!(f, "invalid domain name: {}", err),
            Self::InvalidRdata(err) => write!(f, "invalid RDATA: {}", err),
        }
    }
}

impl std::error::Error for Error {}

/// The type returned by fallible [`Reader`] methods.
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
