use crate::harness::setup;
use txt_lib::BusDevice;
use common::constants::{ADAPTER_BASE, ROW_LEN};
use common::regs::Register;

#[test]
fn data_reads_advance_column() {
    let mut h = setup();
    let rows = h.txt.get_state_mut().rows_mut();
    rows.write(7, 0, 0xaa);
    rows.write(7, 1, 0xbb);
    rows.write(7, 2, 0xcc);

    h.txt.write(Register::Row, 7);
    assert_eq!(h.txt.read(Register::Data), 0xaa);
    assert_eq!(h.txt.read(Register::Data), 0xbb);
    assert_eq!(h.txt.read(Register::Data), 0xcc);
    assert_eq!(h.txt.cursor().col(), 3);
}

#[test]
fn data_writes_then_read_back() {
    let mut h = setup();
    h.txt.write(Register::Row, 5);
    for val in [1, 2, 3] {
        h.txt.write(Register::Data, val);
    }

    h.txt.write(Register::Row, 5);
    assert_eq!(h.txt.read(Register::Data), 1);
    assert_eq!(h.txt.read(Register::Data), 2);
    assert_eq!(h.txt.read(Register::Data), 3);
    assert_eq!(h.txt.rows().row(5)[..4], [1, 2, 3, 0]);
}

#[test]
fn reads_and_writes_share_cursor() {
    let mut h = setup();
    h.txt.write(Register::Row, 2);
    h.txt.read(Register::Data);
    h.txt.write(Register::Data, 0x42);
    assert_eq!(h.txt.rows().read(2, 0), 0);
    assert_eq!(h.txt.rows().read(2, 1), 0x42);
}

#[test]
fn row_write_resets_column() {
    let mut h = setup();
    h.txt.write(Register::Row, 1);
    h.txt.read(Register::Data);
    h.txt.read(Register::Data);
    assert_eq!(h.txt.cursor().col(), 2);

    h.txt.write(Register::Row, 1);
    assert_eq!(h.txt.cursor().col(), 0);
}

#[test]
fn row_register_reads_zero() {
    let mut h = setup();
    h.txt.write(Register::Row, 9);
    h.txt.read(Register::Data);
    assert_eq!(h.txt.read(Register::Row), 0);
    assert_eq!(h.txt.cursor().row(), 9);
    assert_eq!(h.txt.cursor().col(), 1);
}

#[test]
fn status_read_has_no_side_effect() {
    let mut h = setup();
    h.feeds[0].push_frame(&[1; 10]);
    h.txt.poll();

    let first = h.txt.read(Register::Status);
    assert_eq!(first, 0xdf);
    assert_eq!(h.txt.read(Register::Status), first);
}

#[test]
fn clear_by_read_or_write() {
    for by_read in [true, false] {
        let mut h = setup();
        h.feeds[0].push_frame(&[1; 10]);
        h.txt.poll();
        h.txt.get_state_mut().status_mut().set_dew(true);
        assert_eq!(h.txt.read(Register::Status), 0xff);

        if by_read {
            assert_eq!(h.txt.read(Register::Clear), 0);
        } else {
            h.txt.write(Register::Clear, 0x5a);
        }

        let status = h.txt.status();
        assert!(!status.get_fsyn());
        assert!(!status.get_dor());
        assert!(!status.get_int());
        assert!(status.get_dew());
        assert_eq!(status.to_raw(), 0x2f);
    }
}

#[test]
fn clear_is_idempotent() {
    let mut h = setup();
    h.feeds[0].push_frame(&[1; 10]);
    h.txt.poll();

    h.txt.write(Register::Clear, 0);
    let once = h.txt.status();
    h.txt.read(Register::Clear);
    assert_eq!(h.txt.status(), once);
}

#[test]
fn row_pointer_masked() {
    let mut h = setup();
    h.txt.get_state_mut().rows_mut().write(3, 0, 0x33);
    h.txt.write(Register::Row, 0xf3);
    assert_eq!(h.txt.cursor().row(), 3);
    assert_eq!(h.txt.read(Register::Data), 0x33);
}

#[test]
fn column_pointer_wraps() {
    let mut h = setup();
    h.txt.get_state_mut().rows_mut().write(4, 0, 0x44);
    h.txt.write(Register::Row, 4);
    for _ in 0..ROW_LEN {
        h.txt.read(Register::Data);
    }
    assert_eq!(h.txt.cursor().col(), 0);
    assert_eq!(h.txt.read(Register::Data), 0x44);
}

#[test]
fn window_mirrors() {
    let mut h = setup();
    h.txt.write_byte(ADAPTER_BASE + 5, 6);
    assert_eq!(h.txt.cursor().row(), 6);
    h.txt.write_byte(ADAPTER_BASE + 6, 0x99);
    assert_eq!(h.txt.rows().read(6, 0), 0x99);
    assert_eq!(h.txt.read_byte(ADAPTER_BASE + 4), 0x0f);
}

#[test]
fn reset_restores_defaults() {
    let mut h = setup();
    h.txt.write(Register::Status, 0x0f);
    h.txt.write(Register::Row, 3);
    h.txt.write(Register::Data, 0x77);
    h.feeds[3].push_frame(&[1; 10]);
    h.txt.poll();

    h.txt.reset();
    assert_eq!(h.txt.status().to_raw(), 0x0f);
    assert_eq!(h.txt.control().channel(), 0);
    assert!(!h.txt.control().interrupts_enabled());
    assert!(!h.txt.control().output_enabled());
    assert_eq!((h.txt.cursor().row(), h.txt.cursor().col()), (0, 0));
    assert_eq!(h.txt.rows().read(3, 0), 0x77);
}
