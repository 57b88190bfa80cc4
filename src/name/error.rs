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

//! Implementation of the [`Error`] type for name-related failures.

use std::fmt;

/// An error type used to report problems constructing labels and
/// names, whether from text or from the wire.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// While following compression pointers, a pointer referred to an
    /// offset at or past the chunk it appears in, but the offset had
    /// not been visited before. Such a pointer can never be the
    /// required back-reference to a prior occurrence of the name
    /// ([RFC 1035 § 4.1.4]).
    ///
    /// [RFC 1035 § 4.1.4]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.4
    CompressionForward,

    /// While following compression pointers, a pointer referred to an
    /// already-visited offset (possibly its own chunk) or to an offset
    /// outside the message. Following it would never terminate.
    CompressionLoop,

    /// When parsing a [`Name`](super::Name) from a [`str`], a label
    /// between two dots was empty.
    EmptyLabel,

    /// A label was longer than 63 octets.
    LabelTooLong,

    /// The name's uncompressed wire form (including the terminating
    /// null label) was longer than 255 octets.
    NameTooLong,

    /// A [`NameBuilder`](super::NameBuilder) was finished while the
    /// last label was still open and non-null.
    NotFullyQualified,

    /// When parsing a [`Name`](super::Name) from a [`str`], the string
    /// was empty.
    StrEmpty,

    /// When parsing a [`Name`](super::Name) from a [`str`], the string
    /// was not strictly ASCII.
    StrNotAscii,

    /// The buffer ended in the middle of the name.
    UnexpectedEom,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::CompressionForward => f.write_str("compression pointer does not point backward"),
            Self::CompressionLoop => f.write_str("compression pointers form a loop"),
            Self::EmptyLabel => f.write_str("empty label"),
            Self::LabelTooLong => f.write_str("label is longer than 63 octets"),
            Self::NameTooLong => f.write_str("name is longer than 255 octets on the wire"),
            Self::NotFullyQualified => f.write_str("name does not end with the null label"),
            Self::StrEmpty => f.write_str("string was empty"),
            Self::StrNotAscii => f.write_str("string was not ASCII"),
            Self::UnexpectedEom => f.write_str("unexpected end of message"),
        }
    }
}

impl std::error::Error for Error {}
