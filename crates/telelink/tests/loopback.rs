#![cfg(feature = "peer")]

use telelink::frame::{FrameReassembler, FrameSegmenter, PacketKind, FRAGMENT_PAYLOAD};
use telelink::peer::{FrameOutcome, Link, LinkConfig, PeerError};
use telelink::schema::{SchemaConfig, SchemaError};
use telelink::transport::{memory_sink, FrameTap, MemorySink, MAX_FRAME_LEN};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn pair() -> (Link<MemorySink>, FrameTap, Link<MemorySink>) {
    let (tx, tap) = memory_sink();
    let (rx, _) = memory_sink();
    (Link::new(tx), tap, Link::new(rx))
}

fn deliver(receiver: &mut Link<MemorySink>, tap: &FrameTap) -> Vec<FrameOutcome> {
    tap.drain()
        .iter()
        .map(|frame| {
            receiver
                .on_frame_received(frame)
                .expect("loopback frame should be accepted")
        })
        .collect()
}

#[test]
fn altitude_reaches_receiver() {
    init_tracing();
    let (mut sender, tap, mut receiver) = pair();

    sender.declare_field::<i32>("alt").unwrap();
    sender.announce_schema().unwrap();
    deliver(&mut receiver, &tap);
    assert!(receiver.is_synced());

    sender.set_field("alt", &1234i32).unwrap();
    sender.send_record().unwrap();
    deliver(&mut receiver, &tap);

    assert!(receiver.is_updated());
    assert_eq!(receiver.get_field::<i32>("alt").unwrap(), 1234);
    assert!(!receiver.is_updated());
    assert!(receiver.is_synced());
}

#[test]
fn announcement_teaches_offsets_and_widths() {
    let (mut sender, tap, mut receiver) = pair();
    sender.declare_field::<i32>("alt").unwrap();
    sender.declare_field::<f64>("lat").unwrap();
    sender.announce_schema().unwrap();

    assert_eq!(
        deliver(&mut receiver, &tap),
        vec![FrameOutcome::Dispatched(PacketKind::SchemaAnnounce)]
    );
    let alt = receiver.schema().get("alt").unwrap();
    let lat = receiver.schema().get("lat").unwrap();
    assert_eq!((alt.offset, alt.width), (0, 4));
    assert_eq!((lat.offset, lat.width), (4, 8));
    assert_eq!(receiver.schema(), sender.schema());

    sender.set_field("alt", &-42i32).unwrap();
    sender.set_field("lat", &51.4779f64).unwrap();
    sender.send_record().unwrap();
    deliver(&mut receiver, &tap);
    assert_eq!(receiver.get_field::<i32>("alt").unwrap(), -42);
    assert_eq!(receiver.get_field::<f64>("lat").unwrap(), 51.4779);
}

#[test]
fn mixed_fields_round_trip() {
    let (mut sender, tap, mut receiver) = pair();
    sender.declare_field::<u8>("sats").unwrap();
    sender.declare_field::<i16>("temp").unwrap();
    sender.declare_field::<u32>("uptime").unwrap();
    sender.declare_field::<f32>("vbat").unwrap();
    sender.declare_field::<bool>("fix").unwrap();
    sender.declare_field::<i64>("ticks").unwrap();
    sender.declare_text("GPS", 32).unwrap();
    sender.announce_schema().unwrap();

    sender.set_field("sats", &11u8).unwrap();
    sender.set_field("temp", &-273i16).unwrap();
    sender.set_field("uptime", &86_400u32).unwrap();
    sender.set_field("vbat", &3.7f32).unwrap();
    sender.set_field("fix", &true).unwrap();
    sender.set_field("ticks", &i64::MIN).unwrap();
    sender.set_field("GPS", "N51.4779 W0.0015").unwrap();
    sender.send_record().unwrap();

    deliver(&mut receiver, &tap);
    assert!(receiver.is_updated());
    assert_eq!(receiver.latest_record().len(), 1 + 2 + 4 + 4 + 1 + 8 + 32);
    assert_eq!(receiver.get_field::<u8>("sats").unwrap(), 11);
    assert_eq!(receiver.get_field::<i16>("temp").unwrap(), -273);
    assert_eq!(receiver.get_field::<u32>("uptime").unwrap(), 86_400);
    assert_eq!(receiver.get_field::<f32>("vbat").unwrap(), 3.7);
    assert!(receiver.get_field::<bool>("fix").unwrap());
    assert_eq!(receiver.get_field::<i64>("ticks").unwrap(), i64::MIN);
    assert_eq!(
        receiver.get_field::<String>("GPS").unwrap(),
        "N51.4779 W0.0015"
    );
}

#[test]
fn duplicate_declaration_fails_and_keeps_table() {
    let (mut sender, _tap, _) = pair();
    sender.declare_field::<i32>("alt").unwrap();
    sender.declare_text("GPS", 16).unwrap();

    let err = sender.declare_field::<i32>("alt").unwrap_err();
    assert!(matches!(
        err,
        PeerError::Schema(SchemaError::DuplicateField(ref name)) if name == "alt"
    ));
    assert_eq!(sender.schema().len(), 2);
    assert_eq!(sender.schema().total_width(), 20);
}

#[test]
fn dropped_continuation_skips_one_report() {
    init_tracing();
    let (mut sender, tap, mut receiver) = pair();
    sender.declare_text("blob", 510).unwrap();
    sender.announce_schema().unwrap();
    deliver(&mut receiver, &tap);

    sender.set_field("blob", "lost").unwrap();
    sender.send_record().unwrap();
    let frames = tap.drain();
    assert_eq!(frames.len(), 3);
    for (i, frame) in frames.iter().enumerate() {
        if i == 1 {
            continue;
        }
        let outcome = receiver.on_frame_received(frame).unwrap();
        assert_ne!(outcome, FrameOutcome::Dispatched(PacketKind::Report));
    }
    assert!(!receiver.is_updated());
    assert!(receiver.latest_record().is_empty());

    sender.clear_record();
    sender.set_field("blob", "kept").unwrap();
    sender.send_record().unwrap();
    deliver(&mut receiver, &tap);
    assert!(receiver.is_updated());
    assert_eq!(receiver.latest_record().len(), 510);
    assert_eq!(receiver.get_field::<String>("blob").unwrap(), "kept");
}

#[test]
fn reports_survive_sequence_wraparound() {
    let (mut sender, tap, mut receiver) = pair();
    sender.declare_field::<u64>("counter").unwrap();
    sender.declare_field::<u16>("crc").unwrap();
    sender.announce_schema().unwrap();
    deliver(&mut receiver, &tap);

    for i in 0..257u64 {
        sender.set_field("counter", &i).unwrap();
        sender.set_field("crc", &(i as u16 ^ 0xA5A5)).unwrap();
        assert_eq!(sender.send_record().unwrap(), 1);

        let outcomes = deliver(&mut receiver, &tap);
        assert_eq!(outcomes, vec![FrameOutcome::Dispatched(PacketKind::Report)]);
        assert!(receiver.is_updated(), "report {i} not flagged");
        assert_eq!(receiver.latest_record().len(), 10);
        assert_eq!(receiver.get_field::<u64>("counter").unwrap(), i);
        assert_eq!(
            receiver.get_field::<u16>("crc").unwrap(),
            i as u16 ^ 0xA5A5
        );
    }
}

#[test]
fn late_receiver_syncs_on_next_announcement() {
    let (mut sender, tap, mut receiver) = pair();
    sender.declare_field::<u32>("id").unwrap();
    sender.announce_schema().unwrap();
    tap.drain();

    sender.set_field("id", &7u32).unwrap();
    sender.send_record().unwrap();
    deliver(&mut receiver, &tap);
    assert!(receiver.is_updated());
    assert!(!receiver.is_synced());
    assert!(receiver.get_field::<u32>("id").is_err());

    sender.announce_schema().unwrap();
    deliver(&mut receiver, &tap);
    assert!(receiver.is_synced());
    assert_eq!(receiver.get_field::<u32>("id").unwrap(), 7);
}

#[test]
fn joining_mid_packet_drops_orphan_continuations() {
    let (mut sender, tap, mut receiver) = pair();
    sender.declare_text("blob", 510).unwrap();
    sender.send_record().unwrap();
    let frames = tap.drain();
    assert_eq!(frames.len(), 3);

    for frame in &frames[1..] {
        assert_eq!(
            receiver.on_frame_received(frame).unwrap(),
            FrameOutcome::Dropped
        );
    }
    sender.send_record().unwrap();
    let outcomes = deliver(&mut receiver, &tap);
    assert_eq!(
        outcomes.last(),
        Some(&FrameOutcome::Dispatched(PacketKind::Report))
    );
}

#[test]
fn multi_frame_announcement_then_report() {
    let (mut sender, tap, mut receiver) = pair();
    for i in 0..20u32 {
        sender.declare_field::<u32>(&format!("sensor_{i:02}")).unwrap();
    }
    assert_eq!(sender.announce_schema().unwrap(), 4);
    assert_eq!(
        deliver(&mut receiver, &tap),
        vec![
            FrameOutcome::Buffered,
            FrameOutcome::Buffered,
            FrameOutcome::Buffered,
            FrameOutcome::Dispatched(PacketKind::SchemaAnnounce),
        ]
    );
    assert!(receiver.is_synced());
    assert_eq!(receiver.schema(), sender.schema());

    for i in 0..20u32 {
        sender
            .set_field(&format!("sensor_{i:02}"), &(i * 1000 + 7))
            .unwrap();
    }
    sender.send_record().unwrap();
    deliver(&mut receiver, &tap);
    assert!(receiver.is_updated());
    assert_eq!(receiver.get_field::<u32>("sensor_00").unwrap(), 7);
    assert_eq!(receiver.get_field::<u32>("sensor_19").unwrap(), 19_007);
    let last = receiver.schema().get("sensor_19").unwrap();
    assert_eq!((last.offset, last.width), (76, 4));
}

#[test]
fn receiver_with_smaller_capacity_refuses_wide_layouts() {
    let (tx, tap) = memory_sink();
    let (rx, _) = memory_sink();
    let wide = LinkConfig {
        schema: SchemaConfig {
            record_capacity: 1024,
            ..SchemaConfig::default()
        },
        ..LinkConfig::default()
    };
    let mut sender = Link::with_config(tx, wide);
    let mut receiver = Link::new(rx);
    receiver.declare_field::<u8>("own").unwrap();

    sender.declare_text("blob", 600).unwrap();
    sender.set_field("blob", "too wide").unwrap();

    sender.announce_schema().unwrap();
    let mut last = None;
    for frame in tap.drain() {
        last = Some(receiver.on_frame_received(&frame));
    }
    assert!(matches!(
        last,
        Some(Err(PeerError::Schema(SchemaError::SchemaOverflow {
            needed: 600,
            capacity: 512,
            ..
        })))
    ));
    assert!(!receiver.is_synced());
    assert!(receiver.schema().contains("own"));

    assert_eq!(sender.send_record().unwrap(), 3);
    let frames = tap.drain();
    for frame in &frames[..2] {
        assert_eq!(
            receiver.on_frame_received(frame).unwrap(),
            FrameOutcome::Buffered
        );
    }
    assert!(matches!(
        receiver.on_frame_received(&frames[2]),
        Err(PeerError::ReportTooLarge {
            len: 600,
            capacity: 512
        })
    ));
    assert!(!receiver.is_updated());
    assert!(receiver.latest_record().is_empty());
}

#[test]
fn frames_never_exceed_radio_limit() {
    let (sink, tap) = memory_sink();
    let mut segmenter = FrameSegmenter::new(sink);
    let mut reassembler = FrameReassembler::new();

    for len in [0usize, 1, 250, 251, 252, 501, 502] {
        let payload: Vec<u8> = (0..len).map(|i| (i * 7 % 251) as u8).collect();
        let frames = segmenter.send(PacketKind::Report, &payload).unwrap();
        assert_eq!(frames, len.div_ceil(FRAGMENT_PAYLOAD).max(1));

        let mut packet = None;
        for frame in tap.drain() {
            assert!(frame.len() <= MAX_FRAME_LEN);
            assert!(packet.is_none(), "packet completed before its last frame");
            packet = reassembler.push_frame(&frame).unwrap();
        }
        let packet = packet.expect("packet should complete on its last frame");
        assert_eq!(packet.kind, PacketKind::Report);
        assert_eq!(&packet.payload[..], &payload[..], "length {len}");
    }
}
