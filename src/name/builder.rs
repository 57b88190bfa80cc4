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

//! Implementation of the [`NameBuilder`] structure.

use arrayvec::ArrayVec;

use super::{Error, Name, MAX_LABEL_LEN, MAX_WIRE_LEN};

/// A facility to build [`Name`]s incrementally.
///
/// The `NameBuilder` assembles the on-the-wire representation of a
/// domain name in a fixed-size buffer long enough to hold any valid
/// name, enforcing the label and name length limits as octets are
/// added. A new `NameBuilder` starts with a single open label; if the
/// build is finished at this point, the name of the DNS root is
/// constructed:
///
/// ```
/// use dnswire::name::{Name, NameBuilder};
/// assert_eq!(NameBuilder::new().finish().unwrap(), Name::root());
/// ```
///
/// Octets are added to the current label with
/// [`NameBuilder::try_push_slice`], and [`NameBuilder::next_label`]
/// closes the current label and opens a new one. Any call that would
/// produce an invalid domain name returns an error and leaves the
/// builder unchanged.
///
/// Example usage:
///
/// ```
/// use dnswire::name::{Name, NameBuilder};
/// let mut builder = NameBuilder::new();
/// builder.try_push_slice(b"example").unwrap();
/// builder.next_label().unwrap();
/// builder.try_push_slice(b"test").unwrap();
/// builder.next_label().unwrap(); // start the null label
/// assert_eq!(builder.finish().unwrap(), "example.test.".parse().unwrap());
/// ```
pub struct NameBuilder {
    wire_repr: ArrayVec<u8, MAX_WIRE_LEN>,
    n_labels: u8,
    label_start: usize,
    label_len: u8,
}

impl NameBuilder {
    /// Constructs a new `NameBuilder`, which initially contains a
    /// single open label.
    pub fn new() -> Self {
        let mut wire_repr = ArrayVec::new();
        wire_repr.push(0);
        Self {
            wire_repr,
            n_labels: 1,
            label_start: 0,
            label_len: 0,
        }
    }

    /// Determines whether the name currently stored in the
    /// `NameBuilder` is fully qualified, that is, whether the current
    /// label is the null label.
    pub fn is_fully_qualified(&self) -> bool {
        self.label_len == 0
    }

    /// Tries to append the given octets to the current label. This
    /// will fail if doing so would make the label or the name too
    /// long. In the error case, the builder's state is unchanged.
    pub fn try_push_slice(&mut self, octets: &[u8]) -> Result<(), Error> {
        if (self.label_len as usize) + octets.len() > MAX_LABEL_LEN {
            Err(Error::LabelTooLong)
        } else if self.wire_repr.try_extend_from_slice(octets).is_ok() {
            self.label_len += octets.len() as u8;
            self.wire_repr[self.label_start] = self.label_len;
            Ok(())
        } else {
            Err(Error::NameTooLong)
        }
    }

    /// Closes the current label and opens a new one. Since only the
    /// last label of a name may be null, this fails if the current
    /// label is empty. It also fails if the name becomes too long. In
    /// the error case, the builder's state is unchanged.
    pub fn next_label(&mut self) -> Result<(), Error> {
        if self.is_fully_qualified() {
            Err(Error::EmptyLabel)
        } else if self.wire_repr.is_full() {
            Err(Error::NameTooLong)
        } else {
            self.label_start = self.wire_repr.len();
            self.label_len = 0;
            self.wire_repr.push(0);
            self.n_labels += 1;
            Ok(())
        }
    }

    /// Finishes the construction of the domain name, consuming the
    /// `NameBuilder`. Since the last label of a domain name must be
    /// null, this fails if the current label is still open.
    pub fn finish(self) -> Result<Name, Error> {
        if !self.is_fully_qualified() {
            Err(Error::NotFullyQualified)
        } else {
            Ok(Name::from_wire_unchecked(self.n_labels, &self.wire_repr))
        }
    }
}

impl Default for NameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
