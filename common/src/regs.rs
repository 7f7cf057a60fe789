use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

// Offset from the adapter's base address. Only the low two address lines are
// decoded, so the four registers mirror through the rest of the window.
#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq)]
pub enum Register {
    Status = 0,
    Row,
    Data,
    Clear,
}

impl Register {
    pub const NUM_BITS: usize = 2;
    pub const MASK: u16 = (1u16 << Self::NUM_BITS) - 1;

    pub const ALL: [Register; 4] = [Register::Status, Register::Row, Register::Data, Register::Clear];

    pub fn decode(addr: u16) -> Register {
        match Register::from_u16(addr & Self::MASK) {
            Some(reg) => reg,
            None => unreachable!("two bit register offset"),
        }
    }

    pub fn addr(self, base: u16) -> u16 {
        base.wrapping_add(self as u16)
    }
}

////////////////////////////////////////////////////////////////////////////////

// Status register, read side.
pub mod status {
    pub const LINKS_MASK: u8 = 0x0f;
    pub const FSYN_SHIFT: u8 = 4;
    pub const DEW_SHIFT: u8 = 5;
    pub const DOR_SHIFT: u8 = 6;
    pub const INT_SHIFT: u8 = 7;

    pub const FSYN: u8 = 0x1 << FSYN_SHIFT;
    pub const DEW: u8 = 0x1 << DEW_SHIFT;
    pub const DOR: u8 = 0x1 << DOR_SHIFT;
    pub const INT: u8 = 0x1 << INT_SHIFT;
}

// Status register, write side.
pub mod control {
    pub const CHANNEL_MASK: u8 = 0x03;
    pub const ENABLE_SHIFT: u8 = 2;
    pub const INT_ENB_SHIFT: u8 = 3;
    pub const AFC_SHIFT: u8 = 4;
    pub const LINKS_B_SHIFT: u8 = 5;

    pub const ENABLE: u8 = 0x1 << ENABLE_SHIFT;
    pub const INT_ENB: u8 = 0x1 << INT_ENB_SHIFT;
    pub const AFC: u8 = 0x1 << AFC_SHIFT;
    pub const LINKS_B: u8 = 0x1 << LINKS_B_SHIFT;
}
