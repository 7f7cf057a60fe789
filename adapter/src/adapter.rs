use crate::adapter_state::{AdapterState, Control, Cursor, RowBuffer, StatusLatch};
use crate::config::{ConfigError, FeedConfig};
use crate::io::{BusDevice, FeedChannel, InterruptLine, TcpFeed};
use common::constants::{ADAPTER_BASE, NUM_CHANNELS, OPEN_BUS};
use common::frame::{Frame, empty_frame};
use common::regs::Register;

use std::sync::Arc;

use delegate::delegate;
use log::{debug, trace};

// Status register
//   Read
//    0-3   Link settings
//    4     FSYN (latches high on field sync)
//    5     DEW (data entry window)
//    6     DOR (latches high on end of DEW)
//    7     INT (latches high on end of DEW)
//   Write
//    0-1   Channel select
//    2     Teletext enable
//    3     Enable interrupts
//    4     Enable AFC (and mystery links A)
//    5     Mystery links B
pub struct TeletextAdapter {
    enabled: bool,
    state: AdapterState,
    feeds: [Option<Box<dyn FeedChannel>>; NUM_CHANNELS],
    irq: Arc<dyn InterruptLine>,
    base: u16,
    addrs: [u16; 4],
}

impl TeletextAdapter {
    pub fn new(irq: Arc<dyn InterruptLine>) -> Self {
        Self::new_at(irq, ADAPTER_BASE)
    }

    pub fn new_at(irq: Arc<dyn InterruptLine>, base: u16) -> Self {
        TeletextAdapter {
            enabled: false,
            state: AdapterState::new(),
            feeds: Default::default(),
            irq,
            base,
            addrs: Register::ALL.map(|reg| reg.addr(base)),
        }
    }

    delegate! {
        to self.state {
            pub fn status(&self) -> StatusLatch;
            pub fn control(&self) -> Control;
            pub fn cursor(&self) -> Cursor;
            pub fn rows(&self) -> &RowBuffer;
        }
    }

    pub fn get_state(&self) -> &AdapterState {
        &self.state
    }

    pub fn get_state_mut(&mut self) -> &mut AdapterState {
        &mut self.state
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enabled = true;
            self.reset();
        } else {
            self.close_feeds();
            self.irq.lower();
            self.enabled = false;
        }
        debug!("Teletext: adapter {}", if enabled { "enabled" } else { "disabled" });
    }

    // Interrupts come back disabled with INT clear, so the line drops too.
    pub fn reset(&mut self) {
        self.state.reset();
        self.irq.lower();
    }

    pub fn attach_feed(&mut self, channel: usize, feed: Box<dyn FeedChannel>) {
        assert!(channel < NUM_CHANNELS, "No teletext channel {channel}");
        self.feeds[channel] = Some(feed);
    }

    pub fn close_feeds(&mut self) {
        for (ch, feed) in self.feeds.iter_mut().enumerate() {
            if feed.take().is_some() {
                debug!("Teletext: closing channel {ch}");
            }
        }
    }

    // Starts connecting every configured channel and returns straight away;
    // poll() picks up each feed once it is ready.
    pub fn connect(&mut self, config: &FeedConfig) -> Result<(), ConfigError> {
        let endpoints = config.endpoints()?;

        self.set_enabled(!config.mode.is_disabled());
        if !self.enabled {
            return Ok(());
        }

        self.close_feeds();
        for (ch, endpoint) in endpoints.into_iter().enumerate() {
            if let Some(endpoint) = endpoint {
                self.attach_feed(ch, Box::new(TcpFeed::connect(ch, endpoint)));
            }
        }
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////
    // Registers
    ///////////////////////////////////////////////////////////////////////////

    pub fn read(&mut self, reg: Register) -> u8 {
        if !self.enabled {
            return OPEN_BUS;
        }

        let val = match reg {
            Register::Status => self.state.status().to_raw(),
            Register::Row => 0,
            Register::Data => self.data_read(),
            Register::Clear => {
                self.clear();
                0
            }
        };
        trace!("Teletext: read {reg:?} = {val:#04x}");
        val
    }

    pub fn write(&mut self, reg: Register, val: u8) {
        if !self.enabled {
            return;
        }

        trace!("Teletext: write {reg:?} = {val:#04x}");
        match reg {
            Register::Status => self.status_write(val),
            Register::Row => self.state.cursor_mut().set_row(val),
            Register::Data => {
                let (row, col) = self.state.cursor_mut().advance();
                self.state.rows_mut().write(row, col, val);
            }
            Register::Clear => self.clear(),
        }
    }

    fn status_write(&mut self, val: u8) {
        let control = self.state.control_mut();
        if control.write(val) {
            debug!("Teletext: channel {} selected", control.channel());
        }

        let ints = control.interrupts_enabled();
        self.irq.set(ints && self.state.status().get_int());
    }

    fn data_read(&mut self) -> u8 {
        let (row, col) = self.state.cursor_mut().advance();
        if col == 0 {
            trace!("Teletext: reading row {row}");
        }
        self.state.rows().read(row, col)
    }

    // Clears INT, DOR and FSYN. DEW is left alone.
    fn clear(&mut self) {
        self.state.status_mut().clear_latches();
        self.irq.lower();
    }

    ///////////////////////////////////////////////////////////////////////////
    // Frame poll
    ///////////////////////////////////////////////////////////////////////////

    // Called once per emulated video frame.
    pub fn poll(&mut self) {
        if !self.enabled {
            return;
        }

        // Every live channel is drained each frame so switching channel
        // doesn't leave a backlog, but only the selected one is kept.
        let mut frames: [Frame; NUM_CHANNELS] = [empty_frame(); NUM_CHANNELS];
        let mut data_ready = false;
        for (ch, slot) in self.feeds.iter_mut().enumerate() {
            let Some(feed) = slot else {
                continue;
            };
            if !feed.connected() {
                continue;
            }
            if let Some(len) = feed.try_recv(&mut frames[ch]) {
                trace!("Teletext: channel {ch} received {len} bytes");
                data_ready |= len > 0;
            }
        }

        if data_ready {
            self.state.status_mut().latch_data_ready();
        }

        let control = self.state.control();
        if control.output_enabled() {
            self.state.rows_mut().merge_frame(&frames[control.channel()]);
        }

        // Unlike a status write this doesn't look at INT.
        if control.interrupts_enabled() {
            self.irq.raise();
        }
    }
}

impl BusDevice for TeletextAdapter {
    fn reset(&mut self) {
        TeletextAdapter::reset(self);
    }

    fn tick(&mut self) {
        self.poll();
    }

    fn default_addrs(&self) -> &[u16] {
        &self.addrs
    }

    fn read_byte(&mut self, addr: u16) -> u8 {
        self.read(Register::decode(addr))
    }

    fn write_byte(&mut self, addr: u16, val: u8) {
        self.write(Register::decode(addr), val);
    }
}
