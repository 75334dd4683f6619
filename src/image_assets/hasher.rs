use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Hex-encoded SHA-256 of an in-memory buffer
pub fn digest_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hex-encoded SHA-256 of everything `reader` yields.
///
/// The reader is consumed to EOF; callers that need the bytes again must
/// keep their own copy or rewind the source.
pub async fn digest_reader<R>(mut reader: R) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];

    loop {
        let read = reader.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_DIGEST: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_DIGEST: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn known_vectors() {
        assert_eq!(digest_bytes(b""), EMPTY_DIGEST);
        assert_eq!(digest_bytes(b"abc"), ABC_DIGEST);
    }

    #[tokio::test]
    async fn reader_matches_buffer_digest() {
        let data = vec![0xABu8; READ_CHUNK_SIZE * 3 + 17];
        let streamed = digest_reader(&data[..]).await.unwrap();
        assert_eq!(streamed, digest_bytes(&data));
        assert_eq!(streamed.len(), 64);
    }

    #[tokio::test]
    async fn empty_reader() {
        let streamed = digest_reader(tokio::io::empty()).await.unwrap();
        assert_eq!(streamed, EMPTY_DIGEST);
    }
}
