use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// One source of teletext frames. Neither method may block: the emulation
// thread calls both once per frame.
pub trait FeedChannel: Send {
    fn connected(&mut self) -> bool;

    // Copies at most one frame into buf, returning how many bytes were
    // copied, or None if nothing has arrived since the last call.
    fn try_recv(&mut self, buf: &mut [u8]) -> Option<usize>;
}

////////////////////////////////////////////////////////////////////////////////

// Frames pushed from elsewhere in the process.
pub struct PipeFeed {
    frames: Mutex<VecDeque<Vec<u8>>>,
    connected: AtomicBool,
}

impl Default for PipeFeed {
    fn default() -> Self {
        PipeFeed {
            frames: Mutex::new(VecDeque::new()),
            connected: AtomicBool::new(true),
        }
    }
}

impl PipeFeed {
    pub fn push_frame(&self, frame: &[u8]) {
        self.frames.lock().unwrap().push_back(frame.to_vec());
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn is_empty(&self) -> bool {
        self.frames.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

impl FeedChannel for Arc<PipeFeed> {
    fn connected(&mut self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn try_recv(&mut self, buf: &mut [u8]) -> Option<usize> {
        let frame = self.frames.lock().unwrap().pop_front()?;
        let len = frame.len().min(buf.len());
        buf[..len].copy_from_slice(&frame[..len]);
        Some(len)
    }
}
