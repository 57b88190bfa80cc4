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

//! Implementation of the [`Writer`] type to serialize DNS messages.

use std::fmt;

use super::header::{Header, HEADER_WIRE_LEN};
use super::Question;
use crate::rr::Record;

////////////////////////////////////////////////////////////////////////
// WRITER                                                             //
////////////////////////////////////////////////////////////////////////

/// A "frame" around a buffer in which a DNS message is to be
/// serialized.
///
/// A `Writer` is constructed with [`Writer::new`], which writes the
/// 12-octet header immediately. Questions and records are then added
/// with [`Writer::add_question`], [`Writer::add_answer`],
/// [`Writer::add_authority`], and [`Writer::add_additional`], which
/// must be called in section order; calling them out of order fails
/// with [`Error::OutOfOrder`]. Each method is atomic, leaving the
/// `Writer` unchanged on failure, so a caller hitting
/// [`Error::Truncation`] can set the TC bit and send what it has.
///
/// Owner and question names are always written in full; the encoder
/// does not emit compression pointers. Likewise, the RDLENGTH of each
/// record is computed from its RDATA when the record is written.
///
/// [`Writer::finish`] patches the four section counts, which tally the
/// entries actually added, and returns the message length. The counts
/// carried by the `Header` passed to [`Writer::new`] are ignored.
pub struct Writer<'a> {
    octets: &'a mut [u8],
    cursor: usize,
    section: Section,
    qdcount: u16,
    ancount: u16,
    nscount: u16,
    arcount: u16,
}

/// The current section of a [`Writer`]. Sections must be written in
/// the order in which they appear on the wire.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
enum Section {
    Question,
    Answer,
    Authority,
    Additional,
}

impl<'a> Writer<'a> {
    /// Creates a new `Writer` over `octets` and serializes `header`
    /// into its first 12 octets. This fails with [`Error::Truncation`]
    /// if the buffer cannot hold a header. The header's counts are
    /// ignored; [`Writer::finish`] writes the real tallies.
    pub fn new(octets: &'a mut [u8], header: Header) -> Result<Self> {
        if octets.len() < HEADER_WIRE_LEN {
            Err(Error::Truncation)
        } else {
            octets[0..HEADER_WIRE_LEN].copy_from_slice(&header.to_wire());
            Ok(Self {
                octets,
                cursor: HEADER_WIRE_LEN,
                section: Section::Question,
                qdcount: 0,
                ancount: 0,
                nscount: 0,
                arcount: 0,
            })
        }
    }

    /// Adds a question to the question section of the message. This
    /// must be used before any resource records are added.
    ///
    /// This method is atomic: on failure, the `Writer` is unchanged.
    pub fn add_question(&mut self, question: &Question) -> Result<()> {
        if self.section != Section::Question {
            return Err(Error::OutOfOrder);
        }
        let new_qdcount = self.qdcount.checked_add(1).ok_or(Error::CountOverflow)?;
        self.with_rollback(|this| {
            this.try_push(question.qname.wire_repr())?;
            this.try_push_u16(question.qtype.into())?;
            this.try_push_u16(question.qclass.into())
        })?;
        self.qdcount = new_qdcount;
        Ok(())
    }

    /// Adds a resource record to the answer section of the message.
    /// This must be used after any questions are added and before
    /// records are added to any later section.
    ///
    /// This method is atomic: on failure, the `Writer` is unchanged.
    pub fn add_answer(&mut self, record: &Record) -> Result<()> {
        let new_ancount = self.ancount.checked_add(1).ok_or(Error::CountOverflow)?;
        self.with_rollback(|this| {
            this.change_section(Section::Answer)?;
            this.push_record(record)
        })?;
        self.ancount = new_ancount;
        Ok(())
    }

    /// Adds a resource record to the authority section of the message.
    /// This must be used after any questions and answer records are
    /// added and before any additional records are added.
    ///
    /// This method is atomic: on failure, the `Writer` is unchanged.
    pub fn add_authority(&mut self, record: &Record) -> Result<()> {
        let new_nscount = self.nscount.checked_add(1).ok_or(Error::CountOverflow)?;
        self.with_rollback(|this| {
            this.change_section(Section::Authority)?;
            this.push_record(record)
        })?;
        self.nscount = new_nscount;
        Ok(())
    }

    /// Adds a resource record to the additional section of the
    /// message. This must be used after all other sections are
    /// complete.
    ///
    /// This method is atomic: on failure, the `Writer` is unchanged.
    pub fn add_additional(&mut self, record: &Record) -> Result<()> {
        let new_arcount = self.arcount.checked_add(1).ok_or(Error::CountOverflow)?;
        self.with_rollback(|this| {
            this.change_section(Section::Additional)?;
            this.push_record(record)
        })?;
        self.arcount = new_arcount;
        Ok(())
    }

    /// Finishes writing the message, patching the section counts in
    /// the header and returning the final message length.
    pub fn finish(mut self) -> usize {
        self.write_u16(4, self.qdcount);
        self.write_u16(6, self.ancount);
        self.write_u16(8, self.nscount);
        self.write_u16(10, self.arcount);
        self.cursor
    }

    /// Moves to `target`, failing with [`Error::OutOfOrder`] if the
    /// `Writer` has already advanced past it.
    fn change_section(&mut self, target: Section) -> Result<()> {
        if self.section > target {
            Err(Error::OutOfOrder)
        } else {
            self.section = target;
            Ok(())
        }
    }

    /// Writes a resource record at the current cursor. The RDLENGTH
    /// field is computed from the record's RDATA.
    fn push_record(&mut self, record: &Record) -> Result<()> {
        self.try_push(record.owner.wire_repr())?;
        self.try_push_u16(record.rr_type.into())?;
        self.try_push_u16(record.class.into())?;
        self.try_push_u32(record.ttl.into())?;
        self.try_push_u16(record.rdata.rdlength())?;
        self.try_push(record.rdata.octets())
    }

    /// Executes `f(self)`, returning the result and rolling the
    /// section and cursor back to their current values first if the
    /// result is an error.
    fn with_rollback<F, T>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let saved_section = self.section;
        let saved_cursor = self.cursor;
        let result = f(self);
        if result.is_err() {
            self.section = saved_section;
            self.cursor = saved_cursor;
        }
        result
    }

    /// Tries to write `data` to the underlying buffer at the current
    /// cursor, failing if there is not sufficient space.
    fn try_push(&mut self, data: &[u8]) -> Result<()> {
        if self.octets.len() - self.cursor >= data.len() {
            self.octets[self.cursor..self.cursor + data.len()].copy_from_slice(data);
            self.cursor += data.len();
            Ok(())
        } else {
            Err(Error::Truncation)
        }
    }

    /// Like [`Writer::try_push`], for a network-byte-order `u16`.
    fn try_push_u16(&mut self, data: u16) -> Result<()> {
        self.try_push(&data.to_be_bytes())
    }

    /// Like [`Writer::try_push`], for a network-byte-order `u32`.
    fn try_push_u32(&mut self, data: u32) -> Result<()> {
        self.try_push(&data.to_be_bytes())
    }

    /// Writes a network-byte-order `u16` at `position`, which must
    /// already be within the written part of the buffer.
    fn write_u16(&mut self, position: usize, data: u16) {
        self.octets[position..position + 2].copy_from_slice(&data.to_be_bytes());
    }
}

impl fmt::Debug for Writer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Writer")
            .field("cursor", &self.cursor)
            .field("section", &self.section)
            .field("qdcount", &self.qdcount)
            .field("ancount", &self.ancount)
            .field("nscount", &self.nscount)
            .field("arcount", &self.arcount)
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that a message could not be serialized.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// A section count would exceed the 16-bit count field.
    CountOverflow,

    /// A question or record was added to a section that has already
    /// been completed.
    OutOfOrder,

    /// The buffer is too small to hold the question or record.
    Truncation,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::CountOverflow => f.write_str("section count overflow"),
            Self::OutOfOrder => f.write_str("sections must be written in order"),
            Self::Truncation => f.write_str("message does not fit in the buffer"),
        }
    }
}

impl std::error::Error for Error {}

/// The type returned by fallible [`Writer`] methods.
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;

    use super::*;
    use crate::class::Class;
    use crate::name::Name;
    use crate::rr::{Rdata, Ttl, Type};

    lazy_static! {
        static ref NAME: Name = "codecrafters.io.".parse().unwrap();
        static ref QUESTION: Question = Question::new(NAME.clone(), Type::A, Class::IN);
        static ref ANSWER: Record = Record::new(
            NAME.clone(),
            Type::A,
            Class::IN,
            Ttl::from(60),
            Rdata::from_text(Type::A, "8.8.8.8").unwrap(),
        );
    }

    fn response_header() -> Header {
        let mut header = Header::new(1234);
        header.qr = true;
        header.rd = true;
        header
    }

    #[test]
    fn writer_produces_the_reference_message() {
        let mut buf = [0; 512];
        let mut writer = Writer::new(&mut buf, response_header()).unwrap();
        writer.add_question(&QUESTION).unwrap();
        writer.add_answer(&ANSWER).unwrap();
        let len = writer.finish();
        assert_eq!(
            &buf[0..len],
            &b"\x04\xd2\x81\x00\x00\x01\x00\x01\x00\x00\x00\x00\
               \x0ccodecrafters\x02io\x00\x00\x01\x00\x01\
               \x0ccodecrafters\x02io\x00\x00\x01\x00\x01\
               \x00\x00\x00\x3c\x00\x04\x08\x08\x08\x08"[..]
        );
    }

    #[test]
    fn writer_enforces_section_order() {
        let mut buf = [0; 512];
        let mut writer = Writer::new(&mut buf, response_header()).unwrap();
        writer.add_authority(&ANSWER).unwrap();
        assert_eq!(writer.add_question(&QUESTION), Err(Error::OutOfOrder));
        assert_eq!(writer.add_answer(&ANSWER), Err(Error::OutOfOrder));
        writer.add_additional(&ANSWER).unwrap();
        assert_eq!(writer.add_authority(&ANSWER), Err(Error::OutOfOrder));
    }

    #[test]
    fn writer_detects_truncation_and_rolls_back() {
        // Room for the header and the question, but not the answer.
        let mut buf = [0; 40];
        let mut writer = Writer::new(&mut buf, response_header()).unwrap();
        writer.add_question(&QUESTION).unwrap();
        assert_eq!(writer.add_answer(&ANSWER), Err(Error::Truncation));

        // The rolled-back writer can still finish cleanly, and the
        // failed answer must not be counted.
        let len = writer.finish();
        assert_eq!(len, 33);
        assert_eq!(buf[6..8], [0, 0]);
    }

    #[test]
    fn writer_rejects_tiny_buffers() {
        let mut buf = [0; HEADER_WIRE_LEN - 1];
        assert!(matches!(
            Writer::new(&mut buf, response_header()),
            Err(Error::Truncation)
        ));
    }

    #[test]
    fn writer_detects_count_overflow() {
        let root_question = Question::new(Name::root(), Type::A, Class::IN);
        let mut buf = vec![0; HEADER_WIRE_LEN + 5 * (u16::MAX as usize + 1)];
        let mut writer = Writer::new(&mut buf, Header::new(0)).unwrap();
        for _ in 0..u16::MAX {
            writer.add_question(&root_question).unwrap();
        }
        assert_eq!(writer.add_question(&root_question), Err(Error::CountOverflow));
    }
}
