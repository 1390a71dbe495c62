use crate::error::Result;
use crate::read::archive::ArchiveReader;
use std::path::Path;

pub fn list(archive: &Path) -> Result<()> {
    let mut reader = ArchiveReader::open(archive)?;
    for e in reader.entries()? {
        println!(
            "{:08x}  {:>10} bytes  {:>10} packed  {}",
            e.crc, e.length, e.compressed_length, e.name
        );
    }
    Ok(())
}
