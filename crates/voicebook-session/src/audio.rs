use std::path::PathBuf;

/// A reference to a finished recording.
///
/// The recording widget hands over either the captured bytes directly or
/// the path of a file it wrote; both resolve to the raw bytes that get
/// uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioClip {
    Bytes(Vec<u8>),
    File(PathBuf),
}

impl AudioClip {
    pub async fn into_bytes(self) -> Result<Vec<u8>, std::io::Error> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::File(path) => tokio::fs::read(&path).await,
        }
    }
}

impl From<Vec<u8>> for AudioClip {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<PathBuf> for AudioClip {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bytes_resolve_to_themselves() {
        let clip = AudioClip::from(vec![1, 2, 3]);
        assert_eq!(clip.into_bytes().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn file_resolves_to_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take1.wav");
        std::fs::write(&path, b"RIFF....WAVE").unwrap();

        let clip = AudioClip::from(path);
        assert_eq!(clip.into_bytes().await.unwrap(), b"RIFF....WAVE".to_vec());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let clip = AudioClip::File(dir.path().join("nope.wav"));
        let err = clip.into_bytes().await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
