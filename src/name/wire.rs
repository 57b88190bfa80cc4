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

//! Parsing of on-the-wire domain names.

use arrayvec::ArrayVec;

use super::{Error, Name, MAX_LABEL_LEN, MAX_WIRE_LEN};

/// Parses an uncompressed name present at the beginning of `octets`.
/// The name need not occupy the entire buffer; extra data is ignored.
/// This is the implementation of [`Name::try_from_uncompressed`].
pub fn parse_uncompressed(octets: &[u8]) -> Result<(Name, usize), Error> {
    let mut offset = 0;
    let mut n_labels = 0;
    loop {
        let label_len = *octets.get(offset).ok_or(Error::UnexpectedEom)? as usize;
        if label_len > MAX_LABEL_LEN {
            return Err(Error::LabelTooLong);
        }
        let end_of_label = offset + label_len + 1;
        if end_of_label > MAX_WIRE_LEN {
            return Err(Error::NameTooLong);
        } else if end_of_label > octets.len() {
            return Err(Error::UnexpectedEom);
        }
        n_labels += 1;
        offset = end_of_label;
        if label_len == 0 {
            break;
        }
    }
    Ok((Name::from_wire_unchecked(n_labels, &octets[..offset]), offset))
}

/// Parses a (possibly) compressed name starting at index `start` of
/// `octets`. Pointers are followed; indices given in pointers are
/// treated as indices into `octets`, so the intention is for an entire
/// DNS message to be passed in `octets`. This is the implementation of
/// [`Name::try_from_compressed`].
///
/// The returned octet count covers only the contiguous octets at
/// `start`: a chunk that ends in a pointer consumes the labels before
/// the pointer plus two octets for the pointer itself, no matter how
/// much the pointer dereferences.
pub fn parse_compressed(octets: &[u8], start: usize) -> Result<(Name, usize), Error> {
    let mut wire_repr = ArrayVec::<u8, MAX_WIRE_LEN>::new();
    let mut n_labels = 0;
    let mut visited = vec![start];
    let mut chunk_start = start;
    let mut index = start;
    let mut consumed_at_start = None;

    loop {
        let label_len = *octets.get(index).ok_or(Error::UnexpectedEom)? as usize;
        if label_len & 0xc0 == 0xc0 {
            let lower = *octets.get(index + 1).ok_or(Error::UnexpectedEom)? as usize;
            let target = ((label_len & 0x3f) << 8) | lower;
            // Only the first pointer is at the original location; once
            // one has been followed, index is in an earlier chunk and
            // must not enter the consumed-octet count.
            consumed_at_start.get_or_insert_with(|| index + 2 - start);

            // RFC 1035 § 4.1.4 requires pointers to refer to a prior
            // occurrence of the name. We enforce that each pointer
            // lands strictly before the chunk it appears in, which
            // rules out loops. Violations are classified: a target
            // that was already visited (or lies outside the message)
            // would loop forever; any other target at or past the
            // current chunk points the wrong way.
            if target >= octets.len() || visited.contains(&target) {
                return Err(Error::CompressionLoop);
            } else if target >= chunk_start {
                return Err(Error::CompressionForward);
            }
            visited.push(target);
            chunk_start = target;
            index = target;
        } else if label_len > MAX_LABEL_LEN {
            return Err(Error::LabelTooLong);
        } else {
            let end_of_label = index + label_len + 1;
            if end_of_label > octets.len() {
                return Err(Error::UnexpectedEom);
            }
            wire_repr
                .try_extend_from_slice(&octets[index..end_of_label])
                .or(Err(Error::NameTooLong))?;
            n_labels += 1;
            index = end_of_label;
            if label_len == 0 {
                consumed_at_start.get_or_insert_with(|| index - start);
                break;
            }
        }
    }

    let name = Name::from_wire_unchecked(n_labels, &wire_repr);
    // consumed_at_start is filled in before the loop can terminate.
    Ok((name, consumed_at_start.unwrap()))
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uncompressed_accepts_valid_names() {
        let wire_repr_and_junk = b"\x07example\x04test\x00junk";
        let target: Name = "example.test.".parse().unwrap();
        assert_eq!(
            parse_uncompressed(wire_repr_and_junk),
            Ok((target.clone(), 14))
        );
        assert_eq!(parse_uncompressed(&wire_repr_and_junk[..14]), Ok((target, 14)));
    }

    #[test]
    fn parse_uncompressed_rejects_long_label() {
        let mut octets = vec![64];
        octets.extend_from_slice(&[b'x'; 64]);
        octets.push(0);
        assert_eq!(parse_uncompressed(&octets), Err(Error::LabelTooLong));
    }

    #[test]
    fn parse_uncompressed_rejects_long_name() {
        // 128 one-octet labels plus the terminator: 257 octets.
        let mut octets = Vec::new();
        for _ in 0..128 {
            octets.extend_from_slice(b"\x01x");
        }
        octets.push(0);
        assert_eq!(parse_uncompressed(&octets), Err(Error::NameTooLong));
    }

    #[test]
    fn parse_uncompressed_rejects_unexpected_eom() {
        assert_eq!(
            parse_uncompressed(b"\x07example\x04tes"),
            Err(Error::UnexpectedEom)
        );
        assert_eq!(parse_uncompressed(b""), Err(Error::UnexpectedEom));
    }

    #[test]
    fn parse_compressed_accepts_uncompressed_names() {
        let octets = b"junk\x07example\x04test\x00junk";
        let target: Name = "example.test.".parse().unwrap();
        assert_eq!(parse_compressed(octets, 4), Ok((target, 14)));
    }

    #[test]
    fn parse_compressed_accepts_compressed_names() {
        let octets = b"junk\x04test\x00junk\x07example\xc0\x04junk";
        let target: Name = "example.test.".parse().unwrap();
        assert_eq!(parse_compressed(octets, 14), Ok((target, 10)));
    }

    #[test]
    fn parse_compressed_consumes_two_octets_for_a_bare_pointer() {
        // An answer owner compressed into a pointer at the QNAME of a
        // real response message. The owner consumes exactly two
        // octets at its own location, however much the pointer
        // dereferences.
        let message: &[u8] =
            b"\x04\xd2\x81\x00\x00\x01\x00\x01\x00\x00\x00\x00\
              \x0ccodecrafters\x02io\x00\x00\x01\x00\x01\
              \xc0\x0c\x00\x01\x00\x01\x00\x00\x00\x3c\x00\x04\x08\x08\x08\x08";
        let target: Name = "codecrafters.io.".parse().unwrap();
        assert_eq!(parse_compressed(message, 33), Ok((target, 2)));
    }

    #[test]
    fn parse_compressed_accepts_pointer_chains() {
        let octets = b"\x04test\x00\x07example\xc0\x00\x03www\xc0\x06";
        let target: Name = "www.example.test.".parse().unwrap();
        assert_eq!(parse_compressed(octets, 16), Ok((target, 6)));
    }

    #[test]
    fn parse_compressed_rejects_long_label_behind_pointer() {
        let mut octets = vec![1, b'x', 64];
        octets.extend_from_slice(&[b'x'; 64]);
        octets.push(0);
        let pointer_at = octets.len();
        octets.extend_from_slice(b"\x01y\xc0\x00");
        assert_eq!(
            parse_compressed(&octets, pointer_at),
            Err(Error::LabelTooLong)
        );
    }

    #[test]
    fn parse_compressed_rejects_long_reconstructed_name() {
        // The first chunk is itself a valid 225-octet name; the second
        // chunk adds 32 more octets of labels before pointing back, so
        // the reconstructed name is 257 octets.
        let mut octets = Vec::new();
        for _ in 0..112 {
            octets.extend_from_slice(b"\x01x");
        }
        octets.push(0);
        let second_chunk = octets.len();
        for _ in 0..16 {
            octets.extend_from_slice(b"\x01x");
        }
        octets.extend_from_slice(b"\xc0\x00");
        assert_eq!(
            parse_compressed(&octets, second_chunk),
            Err(Error::NameTooLong)
        );
    }

    #[test]
    fn parse_compressed_rejects_self_pointer() {
        assert_eq!(
            parse_compressed(b"\xc0\x00", 0),
            Err(Error::CompressionLoop)
        );
    }

    #[test]
    fn parse_compressed_rejects_pointer_into_own_chunk() {
        assert_eq!(
            parse_compressed(b"\x01a\x01b\xc0\x03", 2),
            Err(Error::CompressionForward)
        );
    }

    #[test]
    fn parse_compressed_rejects_forward_pointer() {
        assert_eq!(
            parse_compressed(b"\x01x\xc0\x05jk\x00", 0),
            Err(Error::CompressionForward)
        );
    }

    #[test]
    fn parse_compressed_rejects_pointer_past_message() {
        assert_eq!(
            parse_compressed(b"\x01x\xc0\x7f", 0),
            Err(Error::CompressionLoop)
        );
    }

    #[test]
    fn parse_compressed_rejects_truncated_pointer() {
        assert_eq!(parse_compressed(b"\x01x\xc0", 0), Err(Error::UnexpectedEom));
    }
}
