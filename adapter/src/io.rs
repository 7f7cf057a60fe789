pub mod feed;
pub mod irq;
pub mod tcp_feed;

pub use feed::{FeedChannel, PipeFeed};
pub use irq::{IntStatus, InterruptLine, InterruptSource, IrqLatch, SourceLine};
pub use tcp_feed::{FeedError, TcpFeed};

// A device on the host bus. Addresses are absolute host addresses; a device
// decodes as many of the lines as the real hardware does.
pub trait BusDevice: Send {
    fn reset(&mut self) {}

    // Once per emulated video frame.
    fn tick(&mut self) {}

    fn default_addrs(&self) -> &[u16] {
        &[]
    }

    fn read_byte(&mut self, addr: u16) -> u8;
    fn write_byte(&mut self, addr: u16, val: u8);
}
