//! Auto-reseeding byte stream over any DRBG.

use log::debug;
use rbg_types::RbgError;
use zeroize::Zeroizing;

use super::RandomBitGenerator;
use crate::entropy::{EntropySource, SystemEntropy};

/// Wraps one generator, splitting large requests into legal chunks and
/// reseeding from `E` whenever the generator reports
/// [`RbgError::ReseedRequired`].
///
/// Also yields single bytes, as [`next_byte`](Self::next_byte) or through
/// `Iterator`. The iterator never ends; each item consumes generator state.
///
/// ```
/// use rbg_crypto::drbg::{self, RandomByteStream};
///
/// let mut stream = RandomByteStream::new(drbg::new("aes256", None).unwrap());
/// let key = stream.generate(Some(20_000)).unwrap();
/// assert_eq!(key.len(), 20_000);
/// let byte = stream.next().unwrap().unwrap();
/// # let _ = byte;
/// ```
pub struct RandomByteStream<G, E = SystemEntropy> {
    drbg: G,
    entropy: E,
    buffer: Zeroizing<Vec<u8>>,
}

impl<G: RandomBitGenerator> RandomByteStream<G, SystemEntropy> {
    /// Wrap `drbg`, reseeding it from the system entropy source.
    pub fn new(drbg: G) -> Self {
        Self::with_entropy(drbg, SystemEntropy)
    }
}

impl<G: RandomBitGenerator, E: EntropySource> RandomByteStream<G, E> {
    /// Wrap `drbg`, reseeding it from `entropy`.
    pub fn with_entropy(drbg: G, entropy: E) -> Self {
        Self {
            drbg,
            entropy,
            buffer: Zeroizing::new(Vec::new()),
        }
    }

    /// Return `count` bytes, or one output block when `count` is `None`.
    ///
    /// `Some(0)` yields an empty vector.
    pub fn generate(&mut self, count: Option<usize>) -> Result<Vec<u8>, RbgError> {
        let count = count.unwrap_or_else(|| self.drbg.outlen());
        let max_chunk = self.drbg.max_request_size() - 1;

        let mut out = Vec::with_capacity(count);
        while out.len() < count {
            let chunk = (count - out.len()).min(max_chunk);
            loop {
                match self.drbg.generate(chunk, None) {
                    Ok(bytes) => {
                        out.extend_from_slice(&bytes);
                        break;
                    }
                    Err(RbgError::ReseedRequired) => self.reseed()?,
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(out)
    }

    /// Return the next byte, refilling the internal buffer with one output
    /// block when it runs dry. Bytes are taken from the end of the buffer.
    pub fn next_byte(&mut self) -> Result<u8, RbgError> {
        loop {
            if let Some(byte) = self.buffer.pop() {
                return Ok(byte);
            }
            let block = Zeroizing::new(self.generate(None)?);
            self.buffer.extend_from_slice(&block);
        }
    }

    fn reseed(&mut self) -> Result<(), RbgError> {
        let mut seed = Zeroizing::new(vec![0u8; self.drbg.reseed_entropy_len()]);
        self.entropy.get_entropy(&mut seed)?;
        self.drbg.reseed(&seed, None)?;
        debug!(
            "auto-reseeded {} drbg from {} entropy",
            self.drbg.algorithm(),
            self.entropy.name()
        );
        Ok(())
    }

    pub fn drbg(&self) -> &G {
        &self.drbg
    }

    pub fn into_inner(self) -> G {
        self.drbg
    }
}

impl<G: RandomBitGenerator, E: EntropySource> Iterator for RandomByteStream<G, E> {
    type Item = Result<u8, RbgError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_byte())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drbg::{CtrDrbg, HashDrbg, HmacDrbg};
    use rbg_types::{CipherAlgId, HashAlgId};

    /// Entropy source that counts requests and returns a fixed byte.
    struct CountingSource {
        calls: usize,
        last_len: usize,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                calls: 0,
                last_len: 0,
            }
        }
    }

    impl EntropySource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn get_entropy(&mut self, buf: &mut [u8]) -> Result<(), RbgError> {
            self.calls += 1;
            self.last_len = buf.len();
            buf.fill(self.calls as u8);
            Ok(())
        }
    }

    struct FailingSource;

    impl EntropySource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        fn get_entropy(&mut self, _buf: &mut [u8]) -> Result<(), RbgError> {
            Err(RbgError::EntropyFail)
        }
    }

    fn hash_drbg() -> HashDrbg {
        HashDrbg::new(HashAlgId::Sha256, &[1u8; 32], &[2u8; 16], None).unwrap()
    }

    #[test]
    fn test_default_count_is_outlen() {
        let mut stream = RandomByteStream::with_entropy(hash_drbg(), CountingSource::new());
        assert_eq!(stream.generate(None).unwrap().len(), 32);

        let drbg = HmacDrbg::new(HashAlgId::Sha1, &[1u8; 16], &[2u8; 8], None).unwrap();
        let mut stream = RandomByteStream::with_entropy(drbg, CountingSource::new());
        assert_eq!(stream.generate(None).unwrap().len(), 20);
    }

    #[test]
    fn test_reseeds_transparently() {
        let mut stream = RandomByteStream::with_entropy(hash_drbg(), CountingSource::new());
        for _ in 0..5 {
            assert_eq!(stream.generate(Some(16)).unwrap().len(), 16);
        }
        // Interval 2: calls 3 and 5 each needed a reseed.
        assert_eq!(stream.entropy.calls, 2);
        assert_eq!(stream.entropy.last_len, 32);
        assert_eq!(stream.drbg().reseed_counter(), 2);
    }

    #[test]
    fn test_matches_manual_reseed_sequence() {
        let mut stream = RandomByteStream::with_entropy(hash_drbg(), CountingSource::new());
        let streamed: Vec<Vec<u8>> = (0..3).map(|_| stream.generate(Some(24)).unwrap()).collect();

        let mut manual = hash_drbg();
        let first = manual.generate(24, None).unwrap();
        let second = manual.generate(24, None).unwrap();
        assert_eq!(manual.generate(24, None), Err(RbgError::ReseedRequired));
        manual.reseed(&[1u8; 32], None).unwrap();
        let third = manual.generate(24, None).unwrap();

        assert_eq!(streamed, vec![first, second, third]);
    }

    #[test]
    fn test_large_request_is_chunked() {
        let drbg = CtrDrbg::new(CipherAlgId::Aes128, &[7u8; 32], None).unwrap();
        let mut stream = RandomByteStream::with_entropy(drbg, CountingSource::new());
        // Exactly max_request_size bytes: two chunks (8191 + 1).
        assert_eq!(stream.generate(Some(8192)).unwrap().len(), 8192);
        // 3 * 8191 + 10 bytes: four chunks, two reseeds.
        assert_eq!(stream.generate(Some(3 * 8191 + 10)).unwrap().len(), 3 * 8191 + 10);
        assert_eq!(stream.entropy.calls, 2);
        // CTR_DRBG reseeds with exactly seedlen bytes.
        assert_eq!(stream.entropy.last_len, 32);
    }

    #[test]
    fn test_ctr_reseed_uses_cipher_seedlen() {
        for (cipher, seed_len) in [(CipherAlgId::Aes192, 40), (CipherAlgId::Aes256, 48)] {
            let drbg = CtrDrbg::new(cipher, &vec![7u8; seed_len], None).unwrap();
            let mut stream = RandomByteStream::with_entropy(drbg, CountingSource::new());
            for _ in 0..3 {
                assert_eq!(stream.generate(Some(64)).unwrap().len(), 64);
            }
            assert_eq!(stream.entropy.calls, 1);
            assert_eq!(stream.entropy.last_len, seed_len);
            assert_eq!(stream.drbg().reseed_counter(), 2);
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut stream = RandomByteStream::with_entropy(hash_drbg(), CountingSource::new());
        assert!(stream.generate(Some(0)).unwrap().is_empty());
        assert_eq!(stream.drbg().reseed_counter(), 1);
    }

    #[test]
    fn test_next_byte_consumes_block_from_end() {
        let mut reference = hash_drbg();
        let block = reference.generate(32, None).unwrap();

        let mut stream = RandomByteStream::with_entropy(hash_drbg(), CountingSource::new());
        let bytes: Vec<u8> = (0..32).map(|_| stream.next_byte().unwrap()).collect();
        let reversed: Vec<u8> = block.iter().rev().copied().collect();
        assert_eq!(bytes, reversed);
    }

    #[test]
    fn test_iterator_never_ends() {
        let stream = RandomByteStream::with_entropy(hash_drbg(), CountingSource::new());
        let bytes: Vec<u8> = stream.take(200).map(Result::unwrap).collect();
        assert_eq!(bytes.len(), 200);
    }

    #[test]
    fn test_entropy_failure_propagates() {
        let mut stream = RandomByteStream::with_entropy(hash_drbg(), FailingSource);
        stream.generate(None).unwrap();
        stream.generate(None).unwrap();
        assert_eq!(stream.generate(None), Err(RbgError::EntropyFail));
    }

    #[test]
    fn test_system_entropy_stream() {
        let mut stream = RandomByteStream::new(hash_drbg());
        for _ in 0..4 {
            assert_eq!(stream.generate(Some(100)).unwrap().len(), 100);
        }
        // One reseed after the second call, then two more generates.
        assert_eq!(stream.into_inner().reseed_counter(), 3);
    }
}
