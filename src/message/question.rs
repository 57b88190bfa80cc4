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

//! Implementation of the [`Question`] type.

use crate::class::Class;
use crate::name::Name;
use crate::rr::Type;

/// A question from the question section of a DNS message
/// ([RFC 1035 § 4.1.2]).
///
/// [RFC 1035 § 4.1.2]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.2
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Question {
    pub qname: Name,
    pub qtype: Type,
    pub qclass: Class,
}

impl Question {
    /// Creates a new `Question`.
    pub fn new(qname: Name, qtype: Type, qclass: Class) -> Self {
        Self {
            qname,
            qtype,
            qclass,
        }
    }

    /// Returns the length of this `Question` on the wire: the QNAME
    /// followed by the 16-bit QTYPE and QCLASS fields.
    pub fn wire_len(&self) -> usize {
        self.qname.wire_len() + 4
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_len_counts_every_field() {
        let question = Question::new("example.test.".parse().unwrap(), Type::A, Class::IN);
        assert_eq!(question.wire_len(), 18);
    }
}
