// Sound registers, named after Pan Docs

pub const REGISTERS_START: u16 = 0xFF10;
pub const REGISTERS_END: u16 = 0xFF3F;

// Channel 1, square with sweep
pub const NR10: u16 = 0xFF10;
pub const NR11: u16 = 0xFF11;
pub const NR12: u16 = 0xFF12;
pub const NR13: u16 = 0xFF13;
pub const NR14: u16 = 0xFF14;

// Channel 2, square. 0xFF15 is unmapped but belongs to the block
pub(crate) const SQUARE2_START: u16 = 0xFF15;
pub const NR21: u16 = 0xFF16;
pub const NR22: u16 = 0xFF17;
pub const NR23: u16 = 0xFF18;
pub const NR24: u16 = 0xFF19;

// Channel 3, wave
pub const NR30: u16 = 0xFF1A;
pub const NR31: u16 = 0xFF1B;
pub const NR32: u16 = 0xFF1C;
pub const NR33: u16 = 0xFF1D;
pub const NR34: u16 = 0xFF1E;

// Channel 4, noise. 0xFF1F is unmapped but belongs to the block
pub(crate) const NOISE_START: u16 = 0xFF1F;
pub const NR41: u16 = 0xFF20;
pub const NR42: u16 = 0xFF21;
pub const NR43: u16 = 0xFF22;
pub const NR44: u16 = 0xFF23;

// Master control
pub const NR50: u16 = 0xFF24;
pub const NR51: u16 = 0xFF25;
pub const NR52: u16 = 0xFF26;

pub const WAVE_RAM_START: u16 = 0xFF30;
pub const WAVE_RAM_END: u16 = 0xFF3F;

/// Bus facing side of a memory mapped device.
///
/// The bus owns address decoding between devices, a device only sees the
/// addresses it was registered for, anything else reads as open bus.
pub trait Mmio {
    fn read(&self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, val: u8);
}
