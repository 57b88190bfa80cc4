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

//! An encoder/decoder for the DNS message wire format of [RFC 1035].
//!
//! The crate is organized around the four layers of the format:
//!
//! * [`message::Header`] packs and unpacks the fixed 12-octet message
//!   header;
//! * [`name::Name`] handles domain names, including pointer-based
//!   message compression on the decode side;
//! * [`message::Question`] and [`rr::Record`] are the entries of the
//!   question and resource-record sections; and
//! * [`message::Message`] composes everything into a whole message,
//!   with [`message::Reader`] and [`message::Writer`] providing
//!   cursor-based access for callers that want to avoid building the
//!   owned structures.
//!
//! The codec is purely functional: no call touches shared state, so
//! concurrent use from separate tasks handling separate datagrams is
//! safe. All failures are reported as typed errors to the immediate
//! caller; nothing here panics on malformed input, performs I/O, or
//! blocks.
//!
//! [RFC 1035]: https://datatracker.ietf.org/doc/html/rfc1035

pub mod class;
pub mod message;
pub mod name;
pub mod rr;

mod util;
