pub mod adapter;
pub mod adapter_state;
pub mod bus;
pub mod config;
pub mod io;

pub use adapter::TeletextAdapter;
pub use adapter_state::{AdapterState, Control, Cursor, RowBuffer, StatusLatch};
pub use bus::Bus;
pub use config::{ConfigError, Endpoint, FeedConfig, FeedMode};
pub use io::BusDevice;
