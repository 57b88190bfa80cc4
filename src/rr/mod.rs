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

//! Data structures and routines for handling DNS resource record data.

use crate::class::Class;
use crate::name::Name;

pub mod rdata;
mod rr_type;
mod ttl;
pub use rdata::Rdata;
pub use rr_type::Type;
pub use ttl::Ttl;

/// A DNS resource record.
///
/// Note that there is no RDLENGTH field. The encoded RDLENGTH is
/// always [`Rdata::rdlength`], computed from the data itself, so a
/// `Record` cannot carry a length that disagrees with its RDATA.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Record {
    pub owner: Name,
    pub rr_type: Type,
    pub class: Class,
    pub ttl: Ttl,
    pub rdata: Rdata,
}

impl Record {
    /// Creates a new `Record`.
    pub fn new(owner: Name, rr_type: Type, class: Class, ttl: Ttl, rdata: Rdata) -> Self {
        Self {
            owner,
            rr_type,
            class,
            ttl,
            rdata,
        }
    }

    /// Returns the length of this `Record` on the wire: the owner
    /// name, the fixed type/class/TTL/RDLENGTH fields, and the RDATA.
    pub fn wire_len(&self) -> usize {
        self.owner.wire_len() + 10 + self.rdata.len()
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[test]
    fn wire_len_counts_every_field() {
        let record = Record::new(
            "example.test.".parse().unwrap(),
            Type::A,
            Class::IN,
            Ttl::from(3600),
            Rdata::from(Ipv4Addr::new(127, 0, 0, 1)),
        );
        // 14 octets of owner name, 10 octets of fixed fields, and 4
        // octets of RDATA.
        assert_eq!(record.wire_len(), 28);
    }
}
