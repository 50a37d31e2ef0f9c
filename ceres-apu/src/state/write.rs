use super::{APU_BLOCK, END_BLOCK, MAJOR_VERSION, MINOR_VERSION, Snapshot};
use alloc::vec::Vec;

pub struct Writer<'a> {
    buf: &'a mut Vec<u8>,
}

impl<'a> Writer<'a> {
    pub const fn new(buf: &'a mut Vec<u8>) -> Self {
        Self { buf }
    }

    pub fn save_state<S: Snapshot>(&mut self, state: &S) {
        self.write_all(&APU_BLOCK);
        // patched once the block is complete
        let size_at = self.buf.len();
        self.write_u32(0);

        let block_start = self.buf.len();
        self.write_u16(MAJOR_VERSION);
        self.write_u16(MINOR_VERSION);
        state.save(self);

        #[expect(clippy::cast_possible_truncation)]
        let size = (self.buf.len() - block_start) as u32;
        self.buf[size_at..size_at + 4].copy_from_slice(&size.to_le_bytes());

        self.write_all(&END_BLOCK);
        self.write_u32(0);
    }

    pub fn write_all(&mut self, buf: &[u8]) {
        self.buf.extend_from_slice(buf);
    }

    pub fn write_bool(&mut self, val: bool) {
        self.write_u8(u8::from(val));
    }

    pub fn write_i64(&mut self, val: i64) {
        self.write_all(&val.to_le_bytes());
    }

    pub fn write_u16(&mut self, val: u16) {
        self.write_all(&val.to_le_bytes());
    }

    pub fn write_u32(&mut self, val: u32) {
        self.write_all(&val.to_le_bytes());
    }

    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }
}
