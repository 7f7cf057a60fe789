use txt_lib::io::{IntStatus, InterruptSource};
use txt_lib::{Bus, Endpoint, FeedConfig, FeedMode, TeletextAdapter};
use common::constants::{ADAPTER_BASE, NUM_ROWS, ROW_PAYLOAD};
use common::regs::{Register, control, status};

use std::error::Error;
use std::io::{Write, stdout};
use std::num::ParseIntError;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use log::info;

// 50 Hz field rate.
const FRAME_TIME: Duration = Duration::from_millis(20);

/// BBC Micro Teletext Adapter
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Where the feeds come from
    #[arg(long, value_enum, default_value_t = FeedMode::Localhost)]
    mode: FeedMode,

    /// host:port for each channel in custom mode, in channel order
    #[arg(long = "endpoint")]
    endpoints: Vec<Endpoint>,

    /// Port for each channel in localhost mode, in channel order
    #[arg(long = "port")]
    ports: Vec<u16>,

    /// Channel to display
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..4))]
    channel: u8,

    /// Wait for the adapter's interrupt instead of polling its status register
    #[arg(long)]
    interrupts: bool,

    /// Stop after this many frames, 0 runs until killed
    #[arg(long, default_value_t = 0)]
    frames: u64,

    /// Base address of the register window
    #[arg(long, default_value_t = ADAPTER_BASE, value_parser = parse_addr)]
    base: u16,
}

fn parse_addr(s: &str) -> Result<u16, ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix('&')) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

// What a host program would do: select each row and read it out.
fn read_page(bus: &Bus, base: u16) -> Vec<Vec<u8>> {
    let mut page = Vec::with_capacity(NUM_ROWS);
    for row in 0..NUM_ROWS {
        bus.write_byte(Register::Row.addr(base), row as u8);
        let bytes = (0..=ROW_PAYLOAD)
            .map(|_| bus.read_byte(Register::Data.addr(base)))
            .collect();
        page.push(bytes);
    }
    page
}

fn draw(out: &mut impl Write, page: &[Vec<u8>]) -> std::io::Result<()> {
    for (i, row) in page.iter().enumerate() {
        // Skip the row marker; control codes show as spaces.
        let text: String = row
            .iter()
            .skip(1)
            .map(|b| match b & 0x7f {
                c @ 0x20..=0x7e => c as char,
                _ => ' ',
            })
            .collect();
        queue!(out, MoveTo(0, i as u16), Clear(ClearType::CurrentLine), Print(text))?;
    }
    out.flush()
}

fn run(opt: Args) -> Result<(), Box<dyn Error>> {
    let config = FeedConfig::new(opt.mode)
        .with_ports(&opt.ports)?
        .with_custom(opt.endpoints)?;

    let int_status = Arc::new(IntStatus::new());
    let line = Arc::new(int_status.line(InterruptSource::Teletext));
    let mut adapter = TeletextAdapter::new_at(line, opt.base);
    adapter.connect(&config)?;
    if !adapter.is_enabled() {
        info!("Teletext adapter disabled, nothing to do");
        return Ok(());
    }

    let base = adapter.base();
    let mut bus = Bus::new();
    bus.set_device(adapter);

    let mut ctl = (opt.channel & control::CHANNEL_MASK) | control::ENABLE;
    if opt.interrupts {
        ctl |= control::INT_ENB;
    }
    bus.write_byte(Register::Status.addr(base), ctl);

    let mut out = stdout();
    execute!(out, Clear(ClearType::All))?;

    let mut frame = 0u64;
    loop {
        let started = Instant::now();
        bus.end_frame();

        let irq = opt.interrupts && int_status.is_set(InterruptSource::Teletext);
        if irq || !opt.interrupts {
            let stat = bus.read_byte(Register::Status.addr(base));
            let ready = stat & status::INT != 0;
            if ready {
                let page = read_page(&bus, base);
                draw(&mut out, &page)?;
            }
            if irq || ready {
                bus.write_byte(Register::Clear.addr(base), 0);
            }
        }

        frame += 1;
        if opt.frames != 0 && frame >= opt.frames {
            break;
        }
        if let Some(rest) = FRAME_TIME.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let opt = Args::parse();
    if let Err(e) = run(opt) {
        eprintln!("txt_cli: {e}");
        std::process::exit(1);
    }
}
