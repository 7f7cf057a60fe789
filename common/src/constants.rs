
pub const NUM_CHANNELS: usize = 4;

// Row buffer geometry, as seen by the host through the data register.
pub const NUM_ROWS: usize = 16;
pub const ROW_LEN: usize = 64;

// Feed frame layout: one 42 byte record per row.
pub const ROW_PAYLOAD: usize = 42;
pub const FRAME_LEN: usize = NUM_ROWS * ROW_PAYLOAD;

// Written to column 0 of every row refreshed from a feed.
pub const ROW_MARKER: u8 = 0x27;

// What the host sees when nothing drives the data bus.
pub const OPEN_BUS: u8 = 0xff;

// FRED page, &FC10 - &FC13.
pub const ADAPTER_BASE: u16 = 0xfc10;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORTS: [u16; NUM_CHANNELS] = [19761, 19762, 19763, 19764];
