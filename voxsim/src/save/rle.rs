//! Run-length encoding of chunk arrays, as a flat sequence of `count, value` pairs where
//! count is between 1 and 255.

use thiserror::Error;


/// Encode the given bytes, runs longer than 255 are split.
pub fn encode(data: &[u8]) -> Vec<u8> {

    let mut ret = Vec::new();
    let mut iter = data.iter().copied();

    let Some(mut value) = iter.next() else { return ret };
    let mut count = 1u8;

    for next in iter {
        if next == value && count < u8::MAX {
            count += 1;
        } else {
            ret.push(count);
            ret.push(value);
            value = next;
            count = 1;
        }
    }

    ret.push(count);
    ret.push(value);
    ret

}

/// Decode the given pairs, the decoded length must be exactly the expected one.
pub fn decode(data: &[u8], expected_len: usize) -> Result<Vec<u8>, RleError> {

    if data.len() % 2 != 0 {
        return Err(RleError::OddLength);
    }

    let mut ret = Vec::with_capacity(expected_len);
    for pair in data.chunks_exact(2) {
        let (count, value) = (pair[0], pair[1]);
        if count == 0 {
            return Err(RleError::ZeroCount);
        }
        if ret.len() + count as usize > expected_len {
            return Err(RleError::Overflow(expected_len));
        }
        ret.resize(ret.len() + count as usize, value);
    }

    if ret.len() != expected_len {
        return Err(RleError::Underflow(ret.len(), expected_len));
    }

    Ok(ret)

}


/// Errors when decoding run-length encoded data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RleError {
    #[error("Encoded data has an odd length, it must be made of pairs.")]
    OddLength,
    #[error("Encoded data has a run with a count of zero.")]
    ZeroCount,
    #[error("Encoded data decodes to more than {0} bytes.")]
    Overflow(usize),
    #[error("Encoded data decodes to {0} bytes, expected {1}.")]
    Underflow(usize, usize),
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn long_runs_split() {
        let data = vec![7u8; 600];
        let encoded = encode(&data);
        assert_eq!(encoded, [255, 7, 255, 7, 90, 7]);
        assert_eq!(decode(&encoded, 600).unwrap(), data);
    }

    #[test]
    fn mixed() {
        let data = [1, 1, 2, 3, 3, 3];
        assert_eq!(encode(&data), [2, 1, 1, 2, 3, 3]);
        assert!(encode(&[]).is_empty());
    }

    #[test]
    fn invalid() {
        assert_eq!(decode(&[1], 1), Err(RleError::OddLength));
        assert_eq!(decode(&[0, 4], 0), Err(RleError::ZeroCount));
        assert_eq!(decode(&[3, 4], 2), Err(RleError::Overflow(2)));
        assert_eq!(decode(&[1, 4], 2), Err(RleError::Underflow(1, 2)));
    }

}
