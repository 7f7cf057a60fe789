use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

// The adapter's one interrupt output. The host decides what to do with it.
pub trait InterruptLine: Send + Sync {
    fn set(&self, asserted: bool);
    fn asserted(&self) -> bool;

    fn raise(&self) {
        self.set(true);
    }

    fn lower(&self) {
        self.set(false);
    }
}

////////////////////////////////////////////////////////////////////////////////

// A line on its own, for hosts that poll a single device.
#[derive(Debug, Default)]
pub struct IrqLatch(AtomicBool);

impl InterruptLine for IrqLatch {
    fn set(&self, asserted: bool) {
        self.0.store(asserted, Ordering::SeqCst);
    }

    fn asserted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

////////////////////////////////////////////////////////////////////////////////

// Bit numbers in the host's interrupt status.
#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq)]
pub enum InterruptSource {
    SysVia = 0,
    UserVia,
    Serial,
    Tube,
    Teletext,
    Hdc,
}

impl InterruptSource {
    pub fn mask(self) -> u8 {
        0x1 << (self as u8)
    }
}

// The host side: one bit per source, the CPU sees an interrupt if any is set.
#[derive(Debug, Default)]
pub struct IntStatus(AtomicU8);

impl IntStatus {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn to_raw(&self) -> u8 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn pending(&self) -> bool {
        self.to_raw() != 0
    }

    pub fn is_set(&self, source: InterruptSource) -> bool {
        self.to_raw() & source.mask() != 0
    }

    pub fn set(&self, source: InterruptSource, asserted: bool) {
        if asserted {
            self.0.fetch_or(source.mask(), Ordering::SeqCst);
        } else {
            self.0.fetch_and(!source.mask(), Ordering::SeqCst);
        }
    }

    pub fn sources(&self) -> Vec<InterruptSource> {
        let raw = self.to_raw();
        (0..u8::BITS as u8)
            .filter(|bit| raw & (0x1 << bit) != 0)
            .filter_map(InterruptSource::from_u8)
            .collect()
    }

    pub fn line(self: &Arc<Self>, source: InterruptSource) -> SourceLine {
        SourceLine { status: self.clone(), source }
    }
}

// One source's view of the shared interrupt status.
#[derive(Debug, Clone)]
pub struct SourceLine {
    status: Arc<IntStatus>,
    source: InterruptSource,
}

impl InterruptLine for SourceLine {
    fn set(&self, asserted: bool) {
        self.status.set(self.source, asserted);
    }

    fn asserted(&self) -> bool {
        self.status.is_set(self.source)
    }
}
