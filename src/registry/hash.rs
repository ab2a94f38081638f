//! MD5 content digests for change detection.

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

/// Bytes fed to the digest per read.
pub const CHUNK_SIZE: usize = 4096;

/// Hex MD5 digest of everything `reader` yields.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut context = md5::Context::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        context.consume(&buffer[..read]);
    }
    Ok(format!("{:x}", context.compute()))
}

/// Hex MD5 digest of a file on disk, streamed in `CHUNK_SIZE` reads.
pub fn hash_file(path: &Path) -> io::Result<String> {
    hash_reader(File::open(path)?)
}
