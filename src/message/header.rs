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

//! Implementation of the [`Header`] type and the 12-octet header
//! codec.

use std::fmt;

use super::{Opcode, Rcode};

/// The length of a DNS message header on the wire.
pub const HEADER_WIRE_LEN: usize = 12;

/// The header of a DNS message, defined in [RFC 1035 § 4.1.1].
///
/// On the wire, the header is 12 octets: the 16-bit ID, two octets of
/// flag and code fields, and the four 16-bit section counts, all
/// big-endian. [`Header::to_wire`] masks each field to its wire width,
/// so out-of-range `z` values cannot corrupt neighboring fields.
///
/// [RFC 1035 § 4.1.1]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Header {
    /// The ID, used to match responses to queries.
    pub id: u16,

    /// Whether this message is a response.
    pub qr: bool,

    /// The kind of query being made.
    pub opcode: Opcode,

    /// Whether the responding server is an authority for the QNAME.
    pub aa: bool,

    /// Whether the message was truncated in transit.
    pub tc: bool,

    /// Whether the server should pursue the query recursively.
    pub rd: bool,

    /// Whether the server supports recursive queries.
    pub ra: bool,

    /// The reserved bits, which are zero in well-formed messages.
    /// Only the low three bits are encoded.
    pub z: u8,

    /// The response code.
    pub rcode: Rcode,

    /// The number of entries in the question section.
    pub qdcount: u16,

    /// The number of records in the answer section.
    pub ancount: u16,

    /// The number of records in the authority section.
    pub nscount: u16,

    /// The number of records in the additional section.
    pub arcount: u16,
}

impl Header {
    /// Creates a new query `Header` with the given ID. All flags are
    /// clear, the opcode is QUERY, the RCODE is NOERROR, and the
    /// counts are zero.
    pub fn new(id: u16) -> Self {
        Self {
            id,
            qr: false,
            opcode: Opcode::Query,
            aa: false,
            tc: false,
            rd: false,
            ra: false,
            z: 0,
            rcode: Rcode::NoError,
            qdcount: 0,
            ancount: 0,
            nscount: 0,
            arcount: 0,
        }
    }

    /// Serializes this `Header` into its 12-octet wire form.
    pub fn to_wire(self) -> [u8; HEADER_WIRE_LEN] {
        let mut wire = [0; HEADER_WIRE_LEN];
        wire[0..2].copy_from_slice(&self.id.to_be_bytes());
        wire[2] = (u8::from(self.qr) << 7)
            | (u8::from(self.opcode) << 3)
            | (u8::from(self.aa) << 2)
            | (u8::from(self.tc) << 1)
            | u8::from(self.rd);
        wire[3] = (u8::from(self.ra) << 7) | ((self.z & 0x7) << 4) | u8::from(self.rcode);
        wire[4..6].copy_from_slice(&self.qdcount.to_be_bytes());
        wire[6..8].copy_from_slice(&self.ancount.to_be_bytes());
        wire[8..10].copy_from_slice(&self.nscount.to_be_bytes());
        wire[10..12].copy_from_slice(&self.arcount.to_be_bytes());
        wire
    }

    /// Deserializes the `Header` at the beginning of `octets`. Octets
    /// past the header are ignored. This fails only when `octets` is
    /// shorter than 12 octets; every bit pattern of a full header is
    /// meaningful.
    pub fn from_wire(octets: &[u8]) -> Result<Self, MalformedHeaderError> {
        if octets.len() < HEADER_WIRE_LEN {
            return Err(MalformedHeaderError);
        }
        let read_u16 = |at: usize| u16::from_be_bytes([octets[at], octets[at + 1]]);
        Ok(Self {
            id: read_u16(0),
            qr: octets[2] & 0x80 != 0,
            opcode: Opcode::from(octets[2] >> 3),
            aa: octets[2] & 0x04 != 0,
            tc: octets[2] & 0x02 != 0,
            rd: octets[2] & 0x01 != 0,
            ra: octets[3] & 0x80 != 0,
            z: (octets[3] >> 4) & 0x7,
            rcode: Rcode::from(octets[3]),
            qdcount: read_u16(4),
            ancount: read_u16(6),
            nscount: read_u16(8),
            arcount: read_u16(10),
        })
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that a buffer is too short to contain a DNS
/// message header.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MalformedHeaderError;

impl fmt::Display for MalformedHeaderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("message is too short to contain a header")
    }
}

impl std::error::Error for MalformedHeaderError {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_wire_packs_the_reference_response_header() {
        let mut header = Header::new(1234);
        header.qr = true;
        header.rd = true;
        header.qdcount = 1;
        header.ancount = 1;
        assert_eq!(
            header.to_wire(),
            [0x04, 0xd2, 0x81, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn to_wire_packs_every_flag() {
        let mut header = Header::new(0xffff);
        header.qr = true;
        header.opcode = Opcode::Status;
        header.aa = true;
        header.tc = true;
        header.rd = true;
        header.ra = true;
        header.z = 0x7;
        header.rcode = Rcode::Refused;
        assert_eq!(header.to_wire()[2], 0x97);
        assert_eq!(header.to_wire()[3], 0xf5);
    }

    #[test]
    fn to_wire_masks_oversized_z() {
        let mut header = Header::new(0);
        header.z = 0xff;
        assert_eq!(header.to_wire()[3], 0x70);
    }

    #[test]
    fn from_wire_round_trips() {
        let mut header = Header::new(0x1a2b);
        header.qr = true;
        header.opcode = Opcode::IQuery;
        header.aa = true;
        header.ra = true;
        header.rcode = Rcode::NxDomain;
        header.qdcount = 2;
        header.arcount = 7;
        assert_eq!(Header::from_wire(&header.to_wire()), Ok(header));
    }

    #[test]
    fn from_wire_ignores_trailing_octets() {
        let mut wire = Header::new(0x0102).to_wire().to_vec();
        wire.extend_from_slice(b"junk");
        assert_eq!(Header::from_wire(&wire), Ok(Header::new(0x0102)));
    }

    #[test]
    fn from_wire_rejects_short_buffers() {
        for len in 0..HEADER_WIRE_LEN {
            assert_eq!(
                Header::from_wire(&vec![0; len]),
                Err(MalformedHeaderError)
            );
        }
    }
}
