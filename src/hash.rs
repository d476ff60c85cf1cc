use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::constants::manifest::HASH_CHUNK_SIZE;

/// Compute the SHA-256 digest of a file by streaming it in fixed-size
/// chunks, so memory use is independent of file size.
pub fn sha256_file(path: &Path) -> io::Result<crate::types::HexDigest> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut chunk = [0u8; HASH_CHUNK_SIZE];
    loop {
        let read = file.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
    }
    Ok(hex_encode(&hasher.finalize()))
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sha256_of_hello_world_matches_known_digest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hello.bin");
        let mut file = File::create(&path).expect("create");
        file.write_all(b"hello world").expect("write");
        drop(file);

        let digest = sha256_file(&path).expect("hash");
        assert_eq!(
            digest,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn files_larger_than_one_chunk_hash_consistently() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("big.bin");
        let payload = vec![0xabu8; HASH_CHUNK_SIZE * 3 + 17];
        std::fs::write(&path, &payload).expect("write");

        let streamed = sha256_file(&path).expect("hash");
        let mut hasher = Sha256::new();
        hasher.update(&payload);
        assert_eq!(streamed, hex_encode(&hasher.finalize()));
    }
}
