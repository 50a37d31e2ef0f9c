// Save state stream, every integer is in little-endian byte order
//
// "APU " block: size u32, version (major u16, minor u16), then every component
// in a fixed order. The stream is terminated by an empty "END " block.

mod read;
mod write;

pub use read::Reader;
pub use write::Writer;

use crate::Error;

const APU_BLOCK: [u8; 4] = *b"APU ";
const END_BLOCK: [u8; 4] = *b"END ";
const MAJOR_VERSION: u16 = 1;
const MINOR_VERSION: u16 = 0;

/// A piece of hardware state that can be written to and restored from a save
/// state stream. `load` must read exactly the fields `save` wrote, in the same
/// order.
pub trait Snapshot {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error>;
    fn save(&self, writer: &mut Writer<'_>);
}

impl<const N: usize> Snapshot for [u8; N] {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        reader.read_exact(self)
    }

    fn save(&self, writer: &mut Writer<'_>) {
        writer.write_all(self);
    }
}
