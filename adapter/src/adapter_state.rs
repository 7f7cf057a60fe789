use common::constants::{NUM_ROWS, ROW_LEN, ROW_MARKER, ROW_PAYLOAD};
use common::frame::{Frame, frame_rows, has_data};
use common::regs::{control, status};

use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLatch(u8);

impl StatusLatch {
    // Low nibble comes from LK4-7 and the mystery links, which are left floating.
    pub const RESET: u8 = status::LINKS_MASK;

    // Latched together when a frame arrives and cleared together by the clear
    // register. DEW is deliberately not part of either.
    const DATA_READY: u8 = status::FSYN | status::DOR | status::INT;

    pub fn new() -> StatusLatch {
        Default::default()
    }

    pub fn to_raw(&self) -> u8 {
        self.0
    }

    pub fn get_links(&self) -> u8 {
        self.0 & status::LINKS_MASK
    }

    pub fn get_fsyn(&self) -> bool {
        (self.0 & status::FSYN) != 0
    }

    pub fn get_dew(&self) -> bool {
        (self.0 & status::DEW) != 0
    }

    // Nothing models the data entry window yet; this is for a video timing
    // model to drive.
    pub fn set_dew(&mut self, val: bool) {
        self.0 &= !status::DEW;
        self.0 |= (val as u8) << status::DEW_SHIFT;
    }

    pub fn get_dor(&self) -> bool {
        (self.0 & status::DOR) != 0
    }

    pub fn get_int(&self) -> bool {
        (self.0 & status::INT) != 0
    }

    pub fn latch_data_ready(&mut self) {
        self.0 |= Self::DATA_READY;
    }

    pub fn clear_latches(&mut self) {
        self.0 &= !Self::DATA_READY;
    }
}

impl Default for StatusLatch {
    fn default() -> Self {
        StatusLatch(Self::RESET)
    }
}

////////////////////////////////////////////////////////////////////////////////

// Whatever was last written to the status register.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    channel: u8,
    output_enabled: bool,
    interrupts_enabled: bool,
    afc: bool,     // Not used.
    links_b: bool, // Not used.
}

impl Control {
    pub fn new() -> Control {
        Default::default()
    }

    // Returns true if the channel selection changed.
    pub fn write(&mut self, val: u8) -> bool {
        self.interrupts_enabled = (val & control::INT_ENB) != 0;
        self.output_enabled = (val & control::ENABLE) != 0;
        self.afc = (val & control::AFC) != 0;
        self.links_b = (val & control::LINKS_B) != 0;

        let channel = val & control::CHANNEL_MASK;
        if channel != self.channel {
            self.channel = channel;
            return true;
        }
        false
    }

    pub fn channel(&self) -> usize {
        self.channel as usize
    }

    pub fn output_enabled(&self) -> bool {
        self.output_enabled
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    pub fn afc(&self) -> bool {
        self.afc
    }

    pub fn links_b(&self) -> bool {
        self.links_b
    }
}

////////////////////////////////////////////////////////////////////////////////

// The hardware doesn't bound either pointer. The row is masked to the buffer
// height on write and the column wraps at the row length.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    row: u8,
    col: u8,
}

impl Cursor {
    const ROW_MASK: u8 = (NUM_ROWS - 1) as u8;
    const COL_MASK: u8 = (ROW_LEN - 1) as u8;

    pub fn new() -> Cursor {
        Default::default()
    }

    pub fn set_row(&mut self, val: u8) {
        self.row = val & Self::ROW_MASK;
        self.col = 0;
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn col(&self) -> usize {
        self.col as usize
    }

    // Returns the current position, then moves one column on.
    pub fn advance(&mut self) -> (usize, usize) {
        let pos = (self.row(), self.col());
        self.col = self.col.wrapping_add(1) & Self::COL_MASK;
        pos
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBuffer {
    rows: [[u8; ROW_LEN]; NUM_ROWS],
}

impl RowBuffer {
    pub fn new() -> RowBuffer {
        Default::default()
    }

    pub fn read(&self, row: usize, col: usize) -> u8 {
        self.rows[row % NUM_ROWS][col % ROW_LEN]
    }

    pub fn write(&mut self, row: usize, col: usize, val: u8) {
        self.rows[row % NUM_ROWS][col % ROW_LEN] = val;
    }

    pub fn row(&self, row: usize) -> &[u8; ROW_LEN] {
        &self.rows[row % NUM_ROWS]
    }

    // Rows whose record is empty keep whatever they held before.
    pub fn merge_frame(&mut self, frame: &Frame) -> usize {
        let mut merged = 0;
        for (i, record) in frame_rows(frame).iter().enumerate() {
            if !has_data(record) {
                continue;
            }
            let row = &mut self.rows[i];
            row[0] = ROW_MARKER;
            row[1..=ROW_PAYLOAD].copy_from_slice(record);
            merged += 1;
        }
        trace!("RowBuffer: merged {merged} rows");
        merged
    }
}

impl Default for RowBuffer {
    fn default() -> Self {
        RowBuffer { rows: [[0; ROW_LEN]; NUM_ROWS] }
    }
}

////////////////////////////////////////////////////////////////////////////////

// Everything the host can observe through the register window.
#[derive(Debug, Default, Clone)]
pub struct AdapterState {
    status: StatusLatch,
    control: Control,
    cursor: Cursor,
    rows: RowBuffer,
}

impl AdapterState {
    pub fn new() -> Self {
        Default::default()
    }

    // The row buffer survives a reset.
    pub fn reset(&mut self) {
        self.status = StatusLatch::new();
        self.control = Control::new();
        self.cursor = Cursor::new();
    }

    pub fn status(&self) -> StatusLatch {
        self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusLatch {
        &mut self.status
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn control_mut(&mut self) -> &mut Control {
        &mut self.control
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub fn rows(&self) -> &RowBuffer {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut RowBuffer {
        &mut self.rows
    }
}
