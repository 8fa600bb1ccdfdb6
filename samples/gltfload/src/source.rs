//! Raw bytes of glTF buffers, from the binary chunk or from files next to the document.

use std::{
    fs::File,
    io,
    ops::Deref,
    path::{Path, PathBuf},
};

use gltf::Gltf;
use memmap2::Mmap;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("expected file, found directory: {0:?}")]
    IsADirectory(PathBuf),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error("expected local file path; instead, found: {0:?}")]
    UnsupportedUriScheme(String),
    #[error("attempted to access binary blob in document without one")]
    DocumentDoesNotIncludeBinaryBlob,
}

/// A memory-mapped buffer file.
#[derive(Debug)]
pub struct BufferFile {
    /// Declared first so the mapping is dropped before its file.
    data: Mmap,
    _file: File,
}

impl BufferFile {
    #[allow(unsafe_code)]
    pub fn new(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        tracing::trace!(
            path = path.as_ref().as_os_str().to_str(),
            "memory-mapping glTF buffer"
        );
        let file = File::options().read(true).write(false).open(path)?;
        let data = unsafe { Mmap::map(&file)? };
        Ok(Self { data, _file: file })
    }
}

impl Deref for BufferFile {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[derive(Debug)]
pub enum BufferData<'doc> {
    Blob(&'doc [u8]),
    File(BufferFile),
}

impl<'doc> Deref for BufferData<'doc> {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Blob(data) => data,
            Self::File(file) => file,
        }
    }
}

/// Resolves glTF buffer sources relative to their document.
#[derive(Debug)]
pub struct BufferSources<'doc> {
    blob: Option<&'doc [u8]>,
    /// Location of the glTF document; relative URIs resolve against it.
    src_url: Url,
}

impl<'doc> BufferSources<'doc> {
    pub fn new(doc: &'doc Gltf, src_path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let src_path: PathBuf = src_path.as_ref().canonicalize()?;
        if src_path.is_dir() {
            return Err(SourceError::IsADirectory(src_path));
        }
        // canonical paths are absolute, which is all from_file_path requires
        let src_url = Url::from_file_path(&src_path)
            .map_err(|_| SourceError::UnsupportedUriScheme(src_path.display().to_string()))?;
        Ok(Self {
            blob: doc.blob.as_deref(),
            src_url,
        })
    }

    #[tracing::instrument(skip(self), fields(src_url = self.src_url.as_str()))]
    pub fn load_uri(&self, uri: &str) -> Result<BufferData<'doc>, SourceError> {
        let url = Url::options().base_url(Some(&self.src_url)).parse(uri)?;
        if url.scheme() != "file" {
            return Err(SourceError::UnsupportedUriScheme(url.scheme().to_owned()));
        }
        let path = url
            .to_file_path()
            .map_err(|_| SourceError::UnsupportedUriScheme(url.to_string()))?;
        tracing::debug!(path = ?path, "loading glTF buffer");
        Ok(BufferData::File(BufferFile::new(path)?))
    }

    pub fn load(&self, buffer: &gltf::Buffer<'_>) -> Result<BufferData<'doc>, SourceError> {
        match buffer.source() {
            gltf::buffer::Source::Bin => self
                .blob
                .map(BufferData::Blob)
                .ok_or(SourceError::DocumentDoesNotIncludeBinaryBlob),
            gltf::buffer::Source::Uri(uri) => self.load_uri(uri),
        }
    }
}
