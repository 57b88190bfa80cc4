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

//! Provides the [`Rdata`] type for DNS record data.

use std::fmt::{self, Write};
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::class::Class;
use crate::name::{self, Name};
use crate::rr::Type;
use crate::util::nibble_to_ascii_hex_digit;

////////////////////////////////////////////////////////////////////////
// THE RDATA TYPE                                                     //
////////////////////////////////////////////////////////////////////////

/// The data of a DNS record.
///
/// `Rdata` owns an octet buffer that can only be constructed if it is
/// short enough for its length to be expressed in the 16-bit RDLENGTH
/// field. The RDLENGTH written to the wire is always computed from the
/// buffer with [`Rdata::rdlength`]; it is never stored separately, so
/// the two can never disagree.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct Rdata {
    octets: Vec<u8>,
}

impl Rdata {
    /// Returns an empty `Rdata`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns whether the `Rdata` is empty.
    pub fn is_empty(&self) -> bool {
        self.octets.is_empty()
    }

    /// Returns the length of the `Rdata`.
    pub fn len(&self) -> usize {
        self.octets.len()
    }

    /// Returns the value of the RDLENGTH field for this `Rdata`. This
    /// cannot overflow, since construction caps the length at 65,535
    /// octets.
    pub fn rdlength(&self) -> u16 {
        self.octets.len() as u16
    }

    /// Returns the underlying octet slice.
    pub fn octets(&self) -> &[u8] {
        &self.octets
    }

    /// Constructs an `Rdata` of type `rr_type` from its textual
    /// representation.
    ///
    /// Currently only type [`A`](Type::A) is supported; its text form
    /// is a dotted-decimal IPv4 address such as `8.8.8.8`, and other
    /// text forms fail with [`RdataError::InvalidAddress`]. All other
    /// types fail with [`RdataError::UnsupportedType`].
    pub fn from_text(rr_type: Type, text: &str) -> Result<Self, RdataError> {
        match rr_type {
            Type::A => Ipv4Addr::from_str(text)
                .map(Self::from)
                .or(Err(RdataError::InvalidAddress)),
            _ => Err(RdataError::UnsupportedType),
        }
    }

    /// Validates an `Rdata` for correctness, assuming that it is of
    /// type `rr_type` in class `class`. If the class/type combination
    /// is not recognized, then this is a successful no-op.
    pub fn validate(&self, class: Class, rr_type: Type) -> Result<(), RdataError> {
        match rr_type {
            Type::NS
            | Type::MD
            | Type::MF
            | Type::CNAME
            | Type::MB
            | Type::MG
            | Type::MR
            | Type::PTR => validate_name_rdata(&self.octets),
            Type::A if class == Class::IN => {
                if self.octets.len() == 4 {
                    Ok(())
                } else {
                    Err(RdataError::InvalidAddress)
                }
            }
            Type::MX => self
                .octets
                .get(2..)
                .ok_or(RdataError::Other)
                .and_then(validate_name_rdata),
            _ => Ok(()),
        }
    }

    /// Reads RDATA from a message, validating it while also
    /// decompressing any embedded domain names, if compressed domain
    /// names are allowed for the RR type.
    ///
    /// RDATA of type `rr_type` in class `class` and of length
    /// `rdlength` is read starting from `&message[cursor]`. For the
    /// RFC 1035 types embedding a single domain name (NS, MD, MF,
    /// CNAME, MB, MG, MR, PTR) and for MX, embedded names are
    /// decompressed, so the result is always in canonical uncompressed
    /// form; for IN A the length is checked; all other types are
    /// passed through verbatim, per the RFC 3597 § 3 treatment of
    /// unknown types.
    ///
    /// If the message is not long enough to hold `rdlength` octets at
    /// `cursor`, this fails with a wrapped
    /// [`UnexpectedEom`](name::Error::UnexpectedEom) rather than
    /// panicking, so it is okay to call this without validating
    /// `rdlength` first.
    pub fn read(
        class: Class,
        rr_type: Type,
        message: &[u8],
        cursor: usize,
        rdlength: u16,
    ) -> Result<Self, RdataError> {
        let end = cursor + rdlength as usize;
        if end > message.len() {
            return Err(name::Error::UnexpectedEom.into());
        }

        match rr_type {
            Type::NS
            | Type::MD
            | Type::MF
            | Type::CNAME
            | Type::MB
            | Type::MG
            | Type::MR
            | Type::PTR => {
                let (name, len) = Name::try_from_compressed(&message[..end], cursor)?;
                if len != rdlength as usize {
                    Err(RdataError::Other)
                } else {
                    Ok(Self::from(&name))
                }
            }
            Type::A if class == Class::IN => {
                if rdlength == 4 {
                    Ok(Self {
                        octets: message[cursor..end].to_vec(),
                    })
                } else {
                    Err(RdataError::InvalidAddress)
                }
            }
            Type::MX => {
                if rdlength < 2 {
                    return Err(RdataError::Other);
                }
                let (name, len) = Name::try_from_compressed(&message[..end], cursor + 2)?;
                if len != rdlength as usize - 2 {
                    Err(RdataError::Other)
                } else {
                    let mut octets = message[cursor..cursor + 2].to_vec();
                    octets.extend_from_slice(name.wire_repr());
                    Ok(Self { octets })
                }
            }
            _ => Ok(Self {
                octets: message[cursor..end].to_vec(),
            }),
        }
    }
}

/// Checks that `octets` is exactly one valid uncompressed domain name.
fn validate_name_rdata(octets: &[u8]) -> Result<(), RdataError> {
    let (_, len) = Name::try_from_uncompressed(octets)?;
    if len == octets.len() {
        Ok(())
    } else {
        Err(RdataError::Other)
    }
}

////////////////////////////////////////////////////////////////////////
// CONVERSIONS                                                        //
////////////////////////////////////////////////////////////////////////

impl TryFrom<Vec<u8>> for Rdata {
    type Error = RdataError;

    fn try_from(octets: Vec<u8>) -> Result<Self, Self::Error> {
        if octets.len() > u16::MAX as usize {
            Err(RdataError::TooLong)
        } else {
            Ok(Self { octets })
        }
    }
}

impl TryFrom<&[u8]> for Rdata {
    type Error = RdataError;

    fn try_from(octets: &[u8]) -> Result<Self, Self::Error> {
        octets.to_vec().try_into()
    }
}

/// Constructs A-record RDATA from an IPv4 address.
impl From<Ipv4Addr> for Rdata {
    fn from(addr: Ipv4Addr) -> Self {
        Self {
            octets: addr.octets().to_vec(),
        }
    }
}

/// Constructs single-name RDATA (e.g. for CNAME or NS records) from a
/// domain name. A name's wire form is never longer than 255 octets, so
/// this cannot fail.
impl From<&Name> for Rdata {
    fn from(name: &Name) -> Self {
        Self {
            octets: name.wire_repr().to_vec(),
        }
    }
}

impl AsRef<[u8]> for Rdata {
    fn as_ref(&self) -> &[u8] {
        &self.octets
    }
}

impl fmt::Display for Rdata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // We output using the RFC 3597 format for RDATA of unknown
        // type.
        write!(f, "\\# {}", self.len())?;
        if !self.is_empty() {
            f.write_char(' ')?;
            for octet in self.octets.iter() {
                f.write_char(char::from(nibble_to_ascii_hex_digit((octet & 0xf0) >> 4)))?;
                f.write_char(char::from(nibble_to_ascii_hex_digit(octet & 0xf)))?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Rdata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error type used to report problems constructing, validating, and
/// reading [`Rdata`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RdataError {
    /// A-record data was not a valid IPv4 address (bad text form, or a
    /// wire payload whose length is not four octets).
    InvalidAddress,

    /// An embedded domain name was invalid.
    Name(name::Error),

    /// The RDATA was structurally invalid for its type in some other
    /// way, such as extra octets after an embedded domain name.
    Other,

    /// The octet buffer was longer than 65,535 octets and so cannot be
    /// described by the RDLENGTH field.
    TooLong,

    /// Textual RDATA of this type cannot be parsed.
    UnsupportedType,
}

impl fmt::Display for RdataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidAddress => f.write_str("not a valid IPv4 address"),
            Self::Name(err) => write!(f, "invalid embedded domain name: {}", err),
            Self::Other => f.write_str("RDATA is invalid"),
            Self::TooLong => f.write_str("RDATA is longer than 65,535 octets"),
            Self::UnsupportedType => f.write_str("no textual RDATA format for this type"),
        }
    }
}

impl std::error::Error for RdataError {}

impl From<name::Error> for RdataError {
    fn from(err: name::Error) -> Self {
        Self::Name(err)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
