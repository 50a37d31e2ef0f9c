use super::{APU_BLOCK, END_BLOCK, MAJOR_VERSION, Snapshot};
use crate::Error;

pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Validates the stream layout, then loads the block body into a fresh
    /// `S`. The state is only returned once the body matched its block size.
    pub fn load_state<S: Snapshot + Default>(&mut self) -> Result<S, Error> {
        let (name, size) = self.read_block_header()?;
        if name != APU_BLOCK {
            return Err(Error::InvalidSaveStateBlock { name });
        }

        let block_start = self.position;
        let block_end = block_start
            .checked_add(size as usize)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::SaveStateTooShort)?;

        let major = self.read_u16()?;
        let minor = self.read_u16()?;
        if major != MAJOR_VERSION {
            return Err(Error::UnsupportedSaveStateVersion { major, minor });
        }

        // check the terminator before parsing the body
        let mut trailer = Reader {
            data: self.data,
            position: block_end,
        };
        let (end_name, _) = trailer.read_block_header()?;
        if end_name != END_BLOCK {
            return Err(Error::InvalidSaveStateBlock { name: end_name });
        }
        if trailer.position != self.data.len() {
            return Err(Error::TrailingSaveStateData {
                remaining: self.data.len() - trailer.position,
            });
        }

        let mut body = Reader {
            data: &self.data[..block_end],
            position: self.position,
        };
        let mut state = S::default();
        state.load(&mut body)?;

        if body.position != block_end {
            return Err(Error::TrailingSaveStateData {
                remaining: block_end - body.position,
            });
        }

        self.position = trailer.position;
        Ok(state)
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.read_u8().map(|val| val != 0)
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let end = self.position + buf.len();
        let src = self
            .data
            .get(self.position..end)
            .ok_or(Error::SaveStateTooShort)?;
        buf.copy_from_slice(src);
        self.position = end;
        Ok(())
    }

    pub fn read_i64(&mut self) -> Result<i64, Error> {
        let mut buf = [0; 8];
        self.read_exact(&mut buf)?;
        Ok(i64::from_le_bytes(buf))
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        let mut buf = [0; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let mut buf = [0; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_block_header(&mut self) -> Result<([u8; 4], u32), Error> {
        let mut name = [0; 4];
        self.read_exact(&mut name)?;
        let size = self.read_u32()?;
        Ok((name, size))
    }
}
