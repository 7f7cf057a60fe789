use crate::harness::setup;
use txt_lib::TeletextAdapter;
use txt_lib::io::{IntStatus, InterruptLine, InterruptSource};
use common::regs::{Register, control};

use std::sync::Arc;

fn check_line(h: &crate::harness::Harness) {
    let expected = h.txt.control().interrupts_enabled() && h.txt.status().get_int();
    assert_eq!(h.irq.asserted(), expected, "status {:#04x}", h.txt.status().to_raw());
}

#[test]
fn status_write_recomputes_line() {
    for latched in [false, true] {
        let mut h = setup();
        if latched {
            h.feeds[0].push_frame(&[1; 42]);
            h.txt.poll();
        }

        // Every control value, from every previous one.
        for prev in 0..=u8::MAX {
            h.txt.write(Register::Status, prev);
            check_line(&h);
            h.txt.write(Register::Status, prev ^ control::INT_ENB);
            check_line(&h);
        }
    }
}

#[test]
fn enabling_with_int_latched_raises() {
    let mut h = setup();
    h.feeds[1].push_frame(&[1; 42]);
    h.txt.poll();
    assert!(h.txt.status().get_int());
    assert!(!h.irq.asserted());

    h.txt.write(Register::Status, control::INT_ENB);
    assert!(h.irq.asserted());
}

#[test]
fn disabling_lowers_but_int_stays() {
    let mut h = setup();
    h.txt.write(Register::Status, control::INT_ENB);
    h.feeds[0].push_frame(&[1; 42]);
    h.txt.poll();
    assert!(h.irq.asserted());

    h.txt.write(Register::Status, 0);
    assert!(!h.irq.asserted());
    assert!(h.txt.status().get_int());
}

#[test]
fn poll_raises_without_data() {
    let mut h = setup();
    h.txt.write(Register::Status, control::INT_ENB);
    assert!(!h.irq.asserted());

    h.txt.poll();
    assert!(!h.txt.status().get_int());
    assert!(h.irq.asserted());
}

#[test]
fn poll_leaves_line_alone_when_disabled() {
    let mut h = setup();
    h.feeds[0].push_frame(&[1; 42]);
    h.txt.poll();
    assert!(h.txt.status().get_int());
    assert!(!h.irq.asserted());

    // Something else raised it; a poll doesn't lower it.
    h.irq.raise();
    h.txt.poll();
    assert!(h.irq.asserted());
}

#[test]
fn clear_lowers_line() {
    let mut h = setup();
    h.txt.write(Register::Status, control::INT_ENB);
    h.feeds[0].push_frame(&[1; 42]);
    h.txt.poll();
    assert!(h.irq.asserted());

    h.txt.read(Register::Clear);
    assert!(!h.irq.asserted());

    // Still enabled, so the next frame raises it again.
    h.txt.poll();
    assert!(h.irq.asserted());
    h.txt.write(Register::Clear, 0);
    assert!(!h.irq.asserted());
}

#[test]
fn host_interrupt_status() {
    let int_status = Arc::new(IntStatus::new());
    int_status.set(InterruptSource::SysVia, true);

    let mut txt = TeletextAdapter::new(Arc::new(int_status.line(InterruptSource::Teletext)));
    txt.set_enabled(true);
    txt.write(Register::Status, control::INT_ENB);
    txt.poll();
    assert_eq!(int_status.to_raw(), 0x11);

    txt.read(Register::Clear);
    assert_eq!(int_status.to_raw(), 0x01);
    assert_eq!(int_status.sources(), vec![InterruptSource::SysVia]);
}
