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

//! Domain names and their labels.
//!
//! This module provides the [`Name`] structure for working with domain
//! names, the [`Label`] type for working with their constituent
//! labels, and the [`NameBuilder`] structure for incremental
//! construction of [`Name`]s.
//!
//! A [`Name`] can be created in three ways:
//!
//! 1. by parsing its textual representation with [`str::parse`];
//! 2. by parsing its wire representation with
//!    [`Name::try_from_uncompressed`] or [`Name::try_from_compressed`];
//!    or
//! 3. by assembling labels with a [`NameBuilder`].
//!
//! However constructed, a `Name` is always absolute (fully qualified)
//! and is stored in uncompressed wire form, so that [`Name::wire_repr`]
//! can be written out directly.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

mod builder;
mod error;
mod label;
mod wire;

pub use builder::NameBuilder;
pub use error::Error;
pub use label::Label;

////////////////////////////////////////////////////////////////////////
// CONSTANTS                                                          //
////////////////////////////////////////////////////////////////////////

/// The maximum length of a label, 63 octets (RFC 1035 § 2.3.4).
pub const MAX_LABEL_LEN: usize = 63;

/// The maximum length of a name on the wire, 255 octets including the
/// terminating null label (RFC 1035 § 2.3.4).
pub const MAX_WIRE_LEN: usize = 255;

////////////////////////////////////////////////////////////////////////
// THE NAME STRUCTURE                                                 //
////////////////////////////////////////////////////////////////////////

/// An absolute domain name.
///
/// A `Name` stores the uncompressed wire representation of the name it
/// describes, which always ends with the null label. In accordance
/// with [RFC 1034 § 3.1], comparison and hashing of `Name`s are
/// ASCII-case-insensitive, while case is preserved in the stored
/// representation.
///
/// [RFC 1034 § 3.1]: https://datatracker.ietf.org/doc/html/rfc1034#section-3.1
#[derive(Clone)]
pub struct Name {
    n_labels: u8,
    wire_repr: Box<[u8]>,
}

impl Name {
    /// Wraps up a wire representation as a `Name` without validating
    /// it. To be used only within this module, and only on buffers
    /// already known to hold a well-formed uncompressed name.
    fn from_wire_unchecked(n_labels: u8, wire_repr: &[u8]) -> Self {
        Self {
            n_labels,
            wire_repr: wire_repr.into(),
        }
    }

    /// Returns the name of the DNS root zone.
    pub fn root() -> Self {
        Self::from_wire_unchecked(1, &[0])
    }

    /// Returns whether this is the name of the DNS root zone.
    pub fn is_root(&self) -> bool {
        self.n_labels == 1
    }

    /// Returns the number of labels in this `Name`, including the
    /// terminating null label.
    pub fn len(&self) -> usize {
        self.n_labels as usize
    }

    /// Returns the uncompressed wire representation of this `Name`.
    pub fn wire_repr(&self) -> &[u8] {
        &self.wire_repr
    }

    /// Returns the length of this `Name` on the wire.
    pub fn wire_len(&self) -> usize {
        self.wire_repr.len()
    }

    /// Returns an iterator over the labels of this `Name`, starting
    /// with the most specific label and ending with the null label.
    pub fn labels(&self) -> Labels {
        Labels {
            name: self,
            offset: 0,
            remaining: self.n_labels as usize,
        }
    }

    /// Parses an uncompressed name present at the beginning of
    /// `octets`. The name need not occupy the entire buffer; extra
    /// data is ignored. On success, the parsed `Name` and its length
    /// on the wire are returned.
    pub fn try_from_uncompressed(octets: &[u8]) -> Result<(Self, usize), Error> {
        wire::parse_uncompressed(octets)
    }

    /// Parses a (possibly) compressed name starting at index `start`
    /// of `octets`. Since compression pointers hold indices into the
    /// enclosing DNS message, `octets` should be the entire message.
    /// On success, the parsed `Name` is returned along with the number
    /// of contiguous octets the name occupied at `start`.
    pub fn try_from_compressed(octets: &[u8], start: usize) -> Result<(Self, usize), Error> {
        wire::parse_compressed(octets, start)
    }
}

////////////////////////////////////////////////////////////////////////
// ITERATION OVER LABELS                                              //
////////////////////////////////////////////////////////////////////////

/// An iterator over the labels of a [`Name`]. See [`Name::labels`].
#[derive(Clone, Debug)]
pub struct Labels<'a> {
    name: &'a Name,
    offset: usize,
    remaining: usize,
}

impl<'a> Iterator for Labels<'a> {
    type Item = &'a Label;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            None
        } else {
            let label_len = self.name.wire_repr[self.offset] as usize;
            let start = self.offset + 1;
            let octets = &self.name.wire_repr[start..start + label_len];
            self.offset = start + label_len;
            self.remaining -= 1;
            Some(Label::from_unchecked(octets))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Labels<'_> {}
impl std::iter::FusedIterator for Labels<'_> {}

////////////////////////////////////////////////////////////////////////
// CONVERSION FROM A STRING                                           //
////////////////////////////////////////////////////////////////////////

/// Parses a `Name` from its textual representation. The name must be
/// ASCII, and a single trailing dot is accepted but not required, so
/// that `example.test` and `example.test.` parse to the same (absolute)
/// name. The string `.` parses to the root name. Note that escapes are
/// not processed, so this will not round-trip the output of
/// [`Name::fmt`](fmt::Display) for names with labels that require
/// escaping.
impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::StrEmpty);
        } else if !s.is_ascii() {
            return Err(Error::StrNotAscii);
        } else if s == "." {
            return Ok(Self::root());
        }

        let without_dot = s.strip_suffix('.').unwrap_or(s);
        let mut builder = NameBuilder::new();
        let mut first = true;
        for label in without_dot.split('.') {
            if !first {
                builder.next_label()?;
            }
            if label.is_empty() {
                return Err(Error::EmptyLabel);
            }
            builder.try_push_slice(label.as_bytes())?;
            first = false;
        }
        builder.next_label()?;
        builder.finish()
    }
}

////////////////////////////////////////////////////////////////////////
// DISPLAY, COMPARISON, AND HASHING                                   //
////////////////////////////////////////////////////////////////////////

/// A `Name` is displayed in the common dotted format, always with a
/// trailing dot, with the escaping rules of [`Label::fmt`] applied to
/// each label.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_root() {
            f.write_str(".")
        } else {
            for label in self.labels() {
                if !label.is_null() {
                    write!(f, "{}.", label)?;
                }
            }
            Ok(())
        }
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

/// In accordance with RFC 1034 § 3.1 (clarified by RFC 4343),
/// comparison of `Name`s is ASCII-case-insensitive.
impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.wire_repr.eq_ignore_ascii_case(&other.wire_repr)
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // We hash in a case-insensitive manner to match our
        // implementations of [`PartialEq`] and [`Eq`].
        for octet in self.wire_repr.iter().map(|octet| octet.to_ascii_lowercase()) {
            state.write_u8(octet);
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;

    #[test]
    fn from_str_works_with_and_without_trailing_dot() {
        let with: Name = "example.test.".parse().unwrap();
        let without: Name = "example.test".parse().unwrap();
        assert_eq!(with, without);
        assert_eq!(with.wire_repr(), b"\x07example\x04test\x00");
    }

    #[test]
    fn from_str_parses_the_root() {
        assert_eq!(".".parse::<Name>().unwrap(), Name::root());
    }

    #[test]
    fn from_str_rejects_invalid_strings() {
        assert_eq!("".parse::<Name>(), Err(Error::StrEmpty));
        assert_eq!("exämple.test.".parse::<Name>(), Err(Error::StrNotAscii));
        assert_eq!("example..test.".parse::<Name>(), Err(Error::EmptyLabel));
        assert_eq!(".example.test.".parse::<Name>(), Err(Error::EmptyLabel));
        let long_label = format!("{}.test.", "x".repeat(64));
        assert_eq!(long_label.parse::<Name>(), Err(Error::LabelTooLong));
    }

    #[test]
    fn display_round_trips_simple_names() {
        for text in ["example.test.", "www.example.test.", "."] {
            assert_eq!(text.parse::<Name>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn labels_iterates_most_specific_first() {
        let name: Name = "www.example.test.".parse().unwrap();
        let labels: Vec<_> = name.labels().map(|label| label.octets().to_vec()).collect();
        assert_eq!(labels, [&b"www"[..], b"example", b"test", b""]);
        assert_eq!(name.labels().len(), 4);
    }

    #[test]
    fn comparison_and_hashing_ignore_ascii_case() {
        let lower: Name = "example.test.".parse().unwrap();
        let upper: Name = "EXAMPLE.TEST.".parse().unwrap();
        assert_eq!(lower, upper);

        let hash = |name: &Name| {
            let mut hasher = DefaultHasher::new();
            name.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&lower), hash(&upper));
    }

    #[test]
    fn root_properties() {
        assert!(Name::root().is_root());
        assert_eq!(Name::root().len(), 1);
        assert_eq!(Name::root().wire_repr(), b"\x00");
        assert_eq!(Name::root().wire_len(), 1);
    }
}
