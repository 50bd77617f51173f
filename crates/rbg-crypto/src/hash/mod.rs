//! SHA-1 and SHA-2 digests behind the [`HashAlgorithm`] interface.

use digest::DynDigest;
use rbg_types::HashAlgId;

use crate::provider::HashAlgorithm;

impl HashAlgorithm for HashAlgId {
    fn new_digest(&self) -> Box<dyn DynDigest> {
        match self {
            HashAlgId::Sha1 => Box::new(sha1::Sha1::default()),
            HashAlgId::Sha224 => Box::new(sha2::Sha224::default()),
            HashAlgId::Sha256 => Box::new(sha2::Sha256::default()),
            HashAlgId::Sha384 => Box::new(sha2::Sha384::default()),
            HashAlgId::Sha512 => Box::new(sha2::Sha512::default()),
        }
    }
}
