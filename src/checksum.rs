// ─── Checksum Helpers ───
// Streaming SHA-1 digests over local files, used by the diagnoser.

use std::path::Path;

use sha1::{Digest, Sha1};
use tokio::io::AsyncReadExt;

use crate::error::{LauncherError, LauncherResult};

/// Compute the lowercase hex SHA-1 of a file, streaming in 64 KiB chunks.
pub async fn sha1_file(path: &Path) -> LauncherResult<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| LauncherError::io(path, e))?;

    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = file
            .read(&mut buf)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// True when the file exists and its SHA-1 matches `expected`
/// (case-insensitive hex comparison).
pub async fn validate_sha1(path: &Path, expected: &str) -> LauncherResult<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let actual = sha1_file(path).await?;
    Ok(actual.eq_ignore_ascii_case(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn digests_known_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"hello world").unwrap();

        let digest = sha1_file(&path).await.unwrap();
        assert_eq!(digest, "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
        assert!(validate_sha1(&path, "2AAE6C35C94FCFB415DBE95F408B9CE91EE846ED")
            .await
            .unwrap());
        assert!(!validate_sha1(&path, "0000000000000000000000000000000000000000")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn missing_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        assert!(!validate_sha1(&path, "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed")
            .await
            .unwrap());
        assert!(sha1_file(&path).await.is_err());
    }
}
