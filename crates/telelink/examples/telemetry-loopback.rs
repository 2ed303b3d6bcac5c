//! Sender and receiver over an in-memory link that loses frames.
//!
//! Run with:
//!   cargo run --example telemetry-loopback --features peer

use telelink::peer::{FrameOutcome, Link};
use telelink::transport::memory_sink;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (radio, air) = memory_sink();
    let (unused, _) = memory_sink();
    let mut sender = Link::new(radio);
    let mut receiver = Link::new(unused);

    sender.declare_field::<i32>("alt")?;
    sender.declare_field::<f64>("lat")?;
    sender.declare_field::<f64>("lon")?;
    sender.declare_text("status", 300)?;
    sender.announce_schema()?;

    let mut seen = 0usize;
    for tick in 0..20i32 {
        // Re-announce now and then so a receiver that missed it can sync.
        if tick % 5 == 0 {
            sender.announce_schema()?;
        }
        sender.clear_record();
        sender.set_field("alt", &(1000 + tick * 12))?;
        sender.set_field("lat", &(51.4779 + f64::from(tick) * 1e-4))?;
        sender.set_field("lon", &-0.0015f64)?;
        sender.set_field("status", format!("tick {tick} nominal").as_str())?;
        sender.send_record()?;

        for frame in air.drain() {
            seen += 1;
            if seen % 7 == 0 {
                eprintln!("  (frame {seen} lost)");
                continue;
            }
            if receiver.on_frame_received(&frame)? == FrameOutcome::Dropped {
                eprintln!("  (frame {seen} dropped out of sequence)");
            }
        }

        if receiver.is_synced() && receiver.is_updated() {
            eprintln!(
                "tick {tick}: alt={} lat={:.4} status={:?}",
                receiver.get_field::<i32>("alt")?,
                receiver.get_field::<f64>("lat")?,
                receiver.get_field::<String>("status")?,
            );
        } else {
            eprintln!("tick {tick}: no complete report");
        }
    }

    Ok(())
}
