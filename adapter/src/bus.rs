use crate::io::BusDevice;
use common::constants::OPEN_BUS;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{error, trace};

// The slice of the host's address space that devices answer. Each device
// sits behind its own lock, so register traffic from the CPU and the frame
// tick can come from different threads.
#[derive(Default)]
pub struct Bus {
    handlers: HashMap<u16, Arc<Mutex<dyn BusDevice>>>,
    devices: Vec<Arc<Mutex<dyn BusDevice>>>,
}

impl Bus {
    pub fn new() -> Bus {
        Default::default()
    }

    pub fn set_device_for<D, I>(&mut self, device: D, addrs: I) -> Arc<Mutex<D>>
    where
        D: BusDevice + 'static,
        I: IntoIterator<Item = u16>,
    {
        let device = Arc::new(Mutex::new(device));
        for addr in addrs.into_iter() {
            self.register_handler(device.clone(), addr);
        }
        self.devices.push(device.clone());
        device
    }

    // Returns the device so the caller can still reach it.
    pub fn set_device<D: BusDevice + 'static>(&mut self, device: D) -> Arc<Mutex<D>> {
        let addrs = device.default_addrs().to_vec();
        self.set_device_for(device, addrs)
    }

    fn register_handler(&mut self, handler: Arc<Mutex<dyn BusDevice>>, addr: u16) {
        let prev = self.handlers.insert(addr, handler);
        assert!(prev.is_none(), "Duplicate BusDevice for {addr:#06x}");
    }

    pub fn is_mapped(&self, addr: u16) -> bool {
        self.handlers.contains_key(&addr)
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        if let Some(handler) = self.handlers.get(&addr) {
            let val = handler.lock().unwrap().read_byte(addr);
            trace!("Bus: read {val:#04x} from {addr:#06x}");
            return val;
        }
        error!("Bus: read of unmapped address {addr:#06x}");
        OPEN_BUS
    }

    pub fn write_byte(&self, addr: u16, val: u8) {
        if let Some(handler) = self.handlers.get(&addr) {
            trace!("Bus: writing {val:#04x} to {addr:#06x}");
            handler.lock().unwrap().write_byte(addr, val);
            return;
        }
        error!("Bus: write of {val:#04x} to unmapped address {addr:#06x}");
    }

    // Each device gets exactly one tick, however many addresses it answers.
    pub fn end_frame(&self) {
        for dev in self.devices.iter() {
            dev.lock().unwrap().tick();
        }
    }

    pub fn reset(&self) {
        for dev in self.devices.iter() {
            dev.lock().unwrap().reset();
        }
    }
}
