//! Room codes: six characters of `a-z0-9` from the OS random source.

use rand::{TryCryptoRng, rngs::OsRng};
use thiserror::Error;

pub const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const LENGTH: usize = 6;

// smallest 2^n - 1 covering the alphabet; bytes masked past the end are rejected
const MASK: u8 = 63;

#[derive(Debug, Error)]
#[error("randomness source unavailable: {0}")]
pub struct GenerationError(String);

pub fn generate() -> Result<String, GenerationError> {
    generate_with(&mut OsRng)
}

pub fn generate_with<R>(rng: &mut R) -> Result<String, GenerationError>
where
    R: TryCryptoRng + ?Sized,
{
    let mut id = String::with_capacity(LENGTH);
    let mut bytes = [0u8; 2 * LENGTH];

    while id.len() < LENGTH {
        rng.try_fill_bytes(&mut bytes)
            .map_err(|err| GenerationError(err.to_string()))?;

        for byte in bytes {
            if let Some(&symbol) = ALPHABET.get(usize::from(byte & MASK)) {
                id.push(char::from(symbol));
                if id.len() == LENGTH {
                    break;
                }
            }
        }
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io};

    use rand::{CryptoRng, RngCore, TryRngCore};

    use super::*;

    struct Exhausted;

    impl TryRngCore for Exhausted {
        type Error = io::Error;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Err(io::Error::other("entropy pool closed"))
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Err(io::Error::other("entropy pool closed"))
        }

        fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
            Err(io::Error::other("entropy pool closed"))
        }
    }

    impl TryCryptoRng for Exhausted {}

    /// Replays a fixed byte sequence.
    struct Replay {
        bytes: Vec<u8>,
        at: usize,
    }

    impl RngCore for Replay {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_le_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0u8; 8];
            self.fill_bytes(&mut buf);
            u64::from_le_bytes(buf)
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for byte in dst {
                *byte = self.bytes[self.at % self.bytes.len()];
                self.at += 1;
            }
        }
    }

    impl CryptoRng for Replay {}

    #[test]
    fn ids_are_six_symbols_from_the_alphabet() {
        for _ in 0..1000 {
            let id = generate().unwrap();
            assert_eq!(id.len(), LENGTH);
            assert!(id.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()), "{id}");
        }
    }

    #[test]
    fn out_of_range_bytes_are_skipped() {
        // 36..=63 fall outside the alphabet after masking
        let mut rng = Replay {
            bytes: vec![36, 63, 0, 40, 25, 26, 35, 64 + 1, 128 + 2],
            at: 0,
        };

        assert_eq!(generate_with(&mut rng).unwrap(), "az09bc");
    }

    #[test]
    fn refills_when_a_batch_is_mostly_rejected() {
        let mut bytes = vec![63u8; 2 * LENGTH - 1];
        bytes.push(7);
        let mut rng = Replay { bytes, at: 0 };

        assert_eq!(generate_with(&mut rng).unwrap(), "hhhhhh");
    }

    #[test]
    fn failing_source_is_a_generation_error() {
        let err = generate_with(&mut Exhausted).unwrap_err();
        assert!(err.to_string().contains("entropy pool closed"));
    }

    #[test]
    fn symbols_are_roughly_uniform() {
        let mut counts: HashMap<char, usize> = HashMap::new();
        for _ in 0..20_000 {
            for symbol in generate().unwrap().chars() {
                *counts.entry(symbol).or_default() += 1;
            }
        }

        assert_eq!(counts.len(), ALPHABET.len());
        // expected 120_000 / 36 ≈ 3333 per symbol
        for (symbol, count) in counts {
            assert!((2800..3900).contains(&count), "{symbol}: {count}");
        }
    }
}
