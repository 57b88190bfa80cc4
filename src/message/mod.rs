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

//! DNS message handling.
//!
//! The central type of this module is [`Message`], an owned
//! representation of a full DNS message, with [`Message::from_wire`]
//! and [`Message::to_wire`] as the top-level codec entry points.
//! Underneath, the [`Reader`] and [`Writer`] types provide
//! cursor-based access to a message in a caller-provided buffer; they
//! can be used directly when an owned `Message` is not needed (for
//! example, to answer from a question without materializing the whole
//! query).

use log::trace;

pub mod header;
mod opcode;
mod question;
mod rcode;
pub mod reader;
pub mod writer;

pub use header::{Header, MalformedHeaderError, HEADER_WIRE_LEN};
pub use opcode::Opcode;
pub use question::Question;
pub use rcode::Rcode;
pub use reader::Reader;
pub use writer::Writer;

use crate::rr::Record;

////////////////////////////////////////////////////////////////////////
// THE MESSAGE STRUCTURE                                              //
////////////////////////////////////////////////////////////////////////

/// An owned DNS message: a header and the four sections of
/// [RFC 1035 § 4.1].
///
/// The counts stored in [`Message::header`] are advisory only. On
/// encode they are ignored and recomputed from the actual section
/// lengths; on decode they are the counts that drove the section
/// loops, so they always match the section lengths.
///
/// [RFC 1035 § 4.1]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<Record>,
    pub authorities: Vec<Record>,
    pub additionals: Vec<Record>,
}

impl Message {
    /// Creates a new `Message` with the given header and empty
    /// sections.
    pub fn new(header: Header) -> Self {
        Self {
            header,
            questions: Vec::new(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    /// Decodes the message serialized in `octets`.
    ///
    /// Exactly QDCOUNT questions and ANCOUNT/NSCOUNT/ARCOUNT records
    /// are read; the first failure in section order is returned.
    /// Octets after the last counted entry are ignored, since UDP
    /// datagrams may carry padding. Compressed names are decompressed,
    /// so the resulting `Message` is in canonical uncompressed form.
    pub fn from_wire(octets: &[u8]) -> reader::Result<Self> {
        trace!("decoding a message from {} octets", octets.len());
        let mut reader = Reader::try_from(octets)?;
        let header = reader.header();
        let mut message = Self::new(header);
        for _ in 0..header.qdcount {
            message.questions.push(reader.read_question()?);
        }
        for _ in 0..header.ancount {
            message.answers.push(reader.read_record()?);
        }
        for _ in 0..header.nscount {
            message.authorities.push(reader.read_record()?);
        }
        for _ in 0..header.arcount {
            message.additionals.push(reader.read_record()?);
        }
        Ok(message)
    }

    /// Encodes this message into `octets`, returning the number of
    /// octets written. The section counts are computed from the
    /// section lengths; names are written without compression.
    pub fn to_wire(&self, octets: &mut [u8]) -> writer::Result<usize> {
        trace!(
            "encoding message with ID {} ({} octets)",
            self.header.id,
            self.wire_len()
        );
        let mut writer = Writer::new(octets, self.header)?;
        for question in &self.questions {
            writer.add_question(question)?;
        }
        for record in &self.answers {
            writer.add_answer(record)?;
        }
        for record in &self.authorities {
            writer.add_authority(record)?;
        }
        for record in &self.additionals {
            writer.add_additional(record)?;
        }
        Ok(writer.finish())
    }

    /// Encodes this message into a freshly allocated buffer of exactly
    /// the right size. This fails only when a section holds more than
    /// 65,535 entries.
    pub fn to_vec(&self) -> writer::Result<Vec<u8>> {
        let mut octets = vec![0; self.wire_len()];
        let len = self.to_wire(&mut octets)?;
        octets.truncate(len);
        Ok(octets)
    }

    /// Returns the exact length of this message on the wire. Since
    /// encoding never compresses names, this is a simple sum over the
    /// sections.
    pub fn wire_len(&self) -> usize {
        let records = self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals);
        HEADER_WIRE_LEN
            + self.questions.iter().map(Question::wire_len).sum::<usize>()
            + records.map(Record::wire_len).sum::<usize>()
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;

    use super::*;
    use crate::class::Class;
    use crate::name::{self, Name};
    use crate::rr::{Rdata, Ttl, Type};

    /// A response to a query for codecrafters.io. IN A with a single
    /// answer, TTL 60, address 8.8.8.8.
    const CODECRAFTERS_A_MESSAGE: &[u8] =
        b"\x04\xd2\x81\x00\x00\x01\x00\x01\x00\x00\x00\x00\
          \x0ccodecrafters\x02io\x00\x00\x01\x00\x01\
          \x0ccodecrafters\x02io\x00\x00\x01\x00\x01\x00\x00\x00\x3c\x00\x04\x08\x08\x08\x08";

    lazy_static! {
        static ref NAME: Name = "codecrafters.io.".parse().unwrap();
        static ref REFERENCE: Message = {
            let mut header = Header::new(1234);
            header.qr = true;
            header.rd = true;
            header.qdcount = 1;
            header.ancount = 1;
            let mut message = Message::new(header);
            message
                .questions
                .push(Question::new(NAME.clone(), Type::A, Class::IN));
            message.answers.push(Record::new(
                NAME.clone(),
                Type::A,
                Class::IN,
                Ttl::from(60),
                Rdata::from_text(Type::A, "8.8.8.8").unwrap(),
            ));
            message
        };
    }

    #[test]
    fn encode_produces_the_reference_octets() {
        assert_eq!(REFERENCE.to_vec().unwrap(), CODECRAFTERS_A_MESSAGE);
        assert_eq!(REFERENCE.wire_len(), CODECRAFTERS_A_MESSAGE.len());
    }

    #[test]
    fn decode_produces_the_reference_message() {
        assert_eq!(
            Message::from_wire(CODECRAFTERS_A_MESSAGE).unwrap(),
            *REFERENCE
        );
    }

    #[test]
    fn decode_canonicalizes_compressed_messages() {
        // The same response, with the answer owner compressed into a
        // pointer to the QNAME. Decoding and re-encoding yields the
        // uncompressed reference octets.
        let compressed: &[u8] =
            b"\x04\xd2\x81\x00\x00\x01\x00\x01\x00\x00\x00\x00\
              \x0ccodecrafters\x02io\x00\x00\x01\x00\x01\
              \xc0\x0c\x00\x01\x00\x01\x00\x00\x00\x3c\x00\x04\x08\x08\x08\x08";
        let message = Message::from_wire(compressed).unwrap();
        assert_eq!(message, *REFERENCE);
        assert_eq!(message.to_vec().unwrap(), CODECRAFTERS_A_MESSAGE);
    }

    #[test]
    fn decode_ignores_trailing_padding() {
        let mut padded = CODECRAFTERS_A_MESSAGE.to_vec();
        padded.extend_from_slice(&[0; 16]);
        assert_eq!(Message::from_wire(&padded).unwrap(), *REFERENCE);
    }

    #[test]
    fn decode_rejects_missing_counted_question() {
        // A bare header claiming one question.
        let mut header = Header::new(9);
        header.qdcount = 1;
        assert_eq!(
            Message::from_wire(&header.to_wire()).unwrap_err(),
            reader::Error::TruncatedMessage
        );
    }

    #[test]
    fn decode_reads_exactly_the_counted_entries() {
        // ANCOUNT says two answers, but only one is present.
        let mut short = CODECRAFTERS_A_MESSAGE.to_vec();
        short[7] = 2;
        assert_eq!(
            Message::from_wire(&short).unwrap_err(),
            reader::Error::TruncatedMessage
        );
    }

    #[test]
    fn decode_surfaces_name_errors() {
        // Make the answer owner point forward at itself.
        let mut looped = CODECRAFTERS_A_MESSAGE.to_vec();
        looped[33] = 0xc0;
        looped[34] = 33;
        assert_eq!(
            Message::from_wire(&looped).unwrap_err(),
            reader::Error::InvalidName(name::Error::CompressionLoop)
        );
    }

    #[test]
    fn round_trip_preserves_all_sections() {
        let mut message = Message::new(Header::new(77));
        message
            .questions
            .push(Question::new(NAME.clone(), Type::MX, Class::IN));
        message.answers.push(Record::new(
            NAME.clone(),
            Type::MX,
            Class::IN,
            Ttl::from(300),
            Rdata::try_from(&b"\x00\x0a\x04mail\x0ccodecrafters\x02io\x00"[..]).unwrap(),
        ));
        message.authorities.push(Record::new(
            NAME.clone(),
            Type::NS,
            Class::IN,
            Ttl::from(86400),
            Rdata::try_from(&b"\x02ns\x0ccodecrafters\x02io\x00"[..]).unwrap(),
        ));
        message.additionals.push(Record::new(
            "ns.codecrafters.io.".parse().unwrap(),
            Type::A,
            Class::IN,
            Ttl::from(86400),
            Rdata::from_text(Type::A, "192.0.2.1").unwrap(),
        ));

        let octets = message.to_vec().unwrap();
        let decoded = Message::from_wire(&octets).unwrap();
        assert_eq!(decoded.questions, message.questions);
        assert_eq!(decoded.answers, message.answers);
        assert_eq!(decoded.authorities, message.authorities);
        assert_eq!(decoded.additionals, message.additionals);
        assert_eq!(decoded.header.qdcount, 1);
        assert_eq!(decoded.header.arcount, 1);
    }
}
