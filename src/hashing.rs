//! Streaming integrity hashing of the acquired image.
//!
//! Memory images may be tens of gigabytes, so the file is read once in
//! fixed-size chunks with every requested digest updated per chunk; the
//! whole file is never held in memory and no redundant passes are made.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::constants::HASH_CHUNK_SIZE;
use crate::errors::AcquisitionError;
use crate::models::{HashAlgorithm, HashDigestSet};

enum StreamingHasher {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
}

impl StreamingHasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => StreamingHasher::Md5(Md5::new()),
            HashAlgorithm::Sha1 => StreamingHasher::Sha1(Sha1::new()),
            HashAlgorithm::Sha256 => StreamingHasher::Sha256(Sha256::new()),
        }
    }

    fn algorithm(&self) -> HashAlgorithm {
        match self {
            StreamingHasher::Md5(_) => HashAlgorithm::Md5,
            StreamingHasher::Sha1(_) => HashAlgorithm::Sha1,
            StreamingHasher::Sha256(_) => HashAlgorithm::Sha256,
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            StreamingHasher::Md5(hasher) => hasher.update(data),
            StreamingHasher::Sha1(hasher) => hasher.update(data),
            StreamingHasher::Sha256(hasher) => hasher.update(data),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            StreamingHasher::Md5(hasher) => format!("{:x}", hasher.finalize()),
            StreamingHasher::Sha1(hasher) => format!("{:x}", hasher.finalize()),
            StreamingHasher::Sha256(hasher) => format!("{:x}", hasher.finalize()),
        }
    }
}

/// Compute the requested digests of `path` in a single streaming pass.
///
/// Fails with [`AcquisitionError::FileAccess`] if the file cannot be opened
/// or a read fails mid-stream; no partial digest set is ever returned.
pub fn hash_file(
    path: &Path,
    algorithms: &[HashAlgorithm],
) -> Result<HashDigestSet, AcquisitionError> {
    let file = File::open(path).map_err(|e| AcquisitionError::file_access(path, e))?;
    let mut reader = BufReader::new(file);

    let mut hashers: Vec<StreamingHasher> = algorithms
        .iter()
        .map(|&algorithm| StreamingHasher::new(algorithm))
        .collect();

    let mut buffer = [0u8; HASH_CHUNK_SIZE];
    let mut total_bytes: u64 = 0;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| AcquisitionError::file_access(path, e))?;
        if bytes_read == 0 {
            break;
        }
        for hasher in &mut hashers {
            hasher.update(&buffer[..bytes_read]);
        }
        total_bytes += bytes_read as u64;
    }

    let mut digests = HashDigestSet::new();
    for hasher in hashers {
        let algorithm = hasher.algorithm();
        let digest = hasher.finalize_hex();
        debug!("{} digest: {}", algorithm, digest);
        digests.insert(algorithm, digest);
    }

    info!(
        "Hashed {} bytes from {} ({} algorithms)",
        total_bytes,
        path.display(),
        digests.len()
    );
    Ok(digests)
}
