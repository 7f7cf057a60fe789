use std::io::{self, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::config::Endpoint;
use crate::io::FeedChannel;
use common::constants::FRAME_LEN;

use derive_more::IsVariant;
use log::{debug, error, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unable to resolve {0}: {1}")]
    Resolve(String, #[source] io::Error),

    #[error("no addresses found for {0}")]
    NoAddress(String),

    #[error("unable to connect to {0}: {1}")]
    Connect(String, #[source] io::Error),

    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum LinkState {
    Connecting,
    Connected,
    Unavailable,
}

enum Link {
    Connecting(Receiver<Result<TcpStream, FeedError>>),
    Connected(TcpStream),
    Unavailable,
}

// A feed server streaming back to back frames over TCP. Connecting happens on
// a worker thread so setting up the adapter never waits on the network; the
// stream is handed back over a channel and picked up by connected().
pub struct TcpFeed {
    channel: usize,
    endpoint: Endpoint,
    link: Link,
    pending: Vec<u8>,
}

impl TcpFeed {
    // Frames beyond this are dropped, oldest first.
    pub const MAX_PENDING_FRAMES: usize = 8;

    const READ_BUDGET: usize = 4 * Self::MAX_PENDING_FRAMES * FRAME_LEN;

    pub fn connect(channel: usize, endpoint: Endpoint) -> TcpFeed {
        let (tx, rx) = mpsc::channel();
        let target = endpoint.clone();

        let spawned = thread::Builder::new()
            .name(format!("txt-connect-{channel}"))
            .spawn(move || {
                // Nobody is listening if the feed was dropped meanwhile.
                let _ = tx.send(Self::open(&target));
            });

        let link = match spawned {
            Ok(_) => {
                debug!("Teletext: connecting channel {channel} to {endpoint}");
                Link::Connecting(rx)
            }
            Err(e) => {
                error!("Teletext: unable to start connect thread for channel {channel}: {e}");
                Link::Unavailable
            }
        };

        TcpFeed {
            channel,
            endpoint,
            link,
            pending: Vec::new(),
        }
    }

    fn open(endpoint: &Endpoint) -> Result<TcpStream, FeedError> {
        let addrs: Vec<SocketAddr> = (endpoint.host.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|e| FeedError::Resolve(endpoint.to_string(), e))?
            .collect();
        if addrs.is_empty() {
            return Err(FeedError::NoAddress(endpoint.to_string()));
        }

        let stream = TcpStream::connect(addrs.as_slice())
            .map_err(|e| FeedError::Connect(endpoint.to_string(), e))?;
        stream.set_nonblocking(true)?;
        Ok(stream)
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn state(&self) -> LinkState {
        match self.link {
            Link::Connecting(_) => LinkState::Connecting,
            Link::Connected(_) => LinkState::Connected,
            Link::Unavailable => LinkState::Unavailable,
        }
    }

    fn check_connect(&mut self) {
        let next = match &self.link {
            Link::Connecting(rx) => match rx.try_recv() {
                Ok(Ok(stream)) => {
                    info!("Teletext: channel {} connected to {}", self.channel, self.endpoint);
                    Link::Connected(stream)
                }
                Ok(Err(e)) => {
                    error!("Teletext: channel {}: {e}", self.channel);
                    Link::Unavailable
                }
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    error!("Teletext: channel {} connect thread went away", self.channel);
                    Link::Unavailable
                }
            },
            _ => return,
        };
        self.link = next;
    }

    // Frames waiting to be handed over.
    pub fn backlog(&self) -> usize {
        self.pending.len() / FRAME_LEN
    }

    // Drops the oldest whole frames past the limit, so the stream stays
    // aligned. Returns how many went.
    fn trim(pending: &mut Vec<u8>) -> usize {
        let limit = Self::MAX_PENDING_FRAMES * FRAME_LEN;
        if pending.len() <= limit {
            return 0;
        }
        let excess = (pending.len() - limit).div_ceil(FRAME_LEN) * FRAME_LEN;
        pending.drain(..excess);
        excess / FRAME_LEN
    }

    // Pull what the socket has without blocking, at most READ_BUDGET bytes
    // per call. A server sending faster than that just loses old frames.
    fn fill(&mut self) {
        let Link::Connected(stream) = &mut self.link else {
            return;
        };

        let mut chunk = [0u8; FRAME_LEN];
        let mut budget = Self::READ_BUDGET;
        let mut dropped = 0;
        let mut lost = false;
        while budget > 0 {
            match stream.read(&mut chunk) {
                Ok(0) => {
                    info!("Teletext: channel {} closed by {}", self.channel, self.endpoint);
                    lost = true;
                    break;
                }
                Ok(n) => {
                    budget = budget.saturating_sub(n);
                    self.pending.extend_from_slice(&chunk[..n]);
                    dropped += Self::trim(&mut self.pending);
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!("Teletext: channel {}: {}", self.channel, FeedError::from(e));
                    lost = true;
                    break;
                }
            }
        }

        if dropped > 0 {
            debug!("Teletext: channel {} dropping {dropped} stale frames", self.channel);
        }
        if lost {
            // Whole frames already read still get delivered.
            self.link = Link::Unavailable;
            self.pending.truncate(self.backlog() * FRAME_LEN);
        }
    }
}

impl FeedChannel for TcpFeed {
    fn connected(&mut self) -> bool {
        self.check_connect();
        self.state().is_connected() || self.backlog() > 0
    }

    fn try_recv(&mut self, buf: &mut [u8]) -> Option<usize> {
        self.fill();
        if self.pending.len() < FRAME_LEN {
            return None;
        }

        let len = FRAME_LEN.min(buf.len());
        buf[..len].copy_from_slice(&self.pending[..len]);
        self.pending.drain(..FRAME_LEN);
        Some(len)
    }
}
