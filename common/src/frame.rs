use crate::constants::{FRAME_LEN, ROW_PAYLOAD};

use bytemuck::cast_slice;

pub type Frame = [u8; FRAME_LEN];
pub type RowRecord = [u8; ROW_PAYLOAD];

pub fn empty_frame() -> Frame {
    [0; FRAME_LEN]
}

// A frame is NUM_ROWS consecutive row records.
pub fn frame_rows(frame: &Frame) -> &[RowRecord] {
    cast_slice(frame.as_slice())
}

// A record whose first byte is zero carries nothing for its row.
pub fn has_data(record: &RowRecord) -> bool {
    record[0] != 0
}
