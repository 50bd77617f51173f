//! HMAC (RFC 2104) over the SHA-1 and SHA-2 digests.

use ::hmac::{Mac, SimpleHmac};
use digest::core_api::BlockSizeUser;
use digest::Digest;
use rbg_types::{HashAlgId, RbgError};

use crate::provider::MacAlgorithm;

fn mac_with<D>(key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, RbgError>
where
    D: Digest + BlockSizeUser,
{
    let mut ctx = <SimpleHmac<D> as Mac>::new_from_slice(key).map_err(|_| {
        RbgError::InvalidKeyLength {
            got: key.len(),
            accepted: &[],
        }
    })?;
    for part in parts {
        ctx.update(part);
    }
    Ok(ctx.finalize().into_bytes().to_vec())
}

impl MacAlgorithm for HashAlgId {
    fn mac(&self, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, RbgError> {
        match self {
            HashAlgId::Sha1 => mac_with::<sha1::Sha1>(key, parts),
            HashAlgId::Sha224 => mac_with::<sha2::Sha224>(key, parts),
            HashAlgId::Sha256 => mac_with::<sha2::Sha256>(key, parts),
            HashAlgId::Sha384 => mac_with::<sha2::Sha384>(key, parts),
            HashAlgId::Sha512 => mac_with::<sha2::Sha512>(key, parts),
        }
    }
}
