use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tidepool_core::bencode;
use tidepool_core::torrent::{TorrentDescriptor, TrackerResponse};

fn sample_torrent(piece_count: usize) -> Vec<u8> {
    let pieces = piece_count * 20;
    let mut data = format!(
        "d8:announce34:http://tracker.local:6969/announce4:infod6:lengthi{}e4:name9:bench.bin12:piece lengthi262144e6:pieces{pieces}:",
        piece_count * 262_144
    )
    .into_bytes();
    data.extend((0..pieces).map(|i| i as u8));
    data.extend_from_slice(b"ee");
    data
}

fn sample_tracker_response(peer_count: usize) -> Vec<u8> {
    let mut data = format!(
        "d8:completei50e10:incompletei20e8:intervali1800e5:peers{}:",
        peer_count * 6
    )
    .into_bytes();
    for i in 0..peer_count {
        data.extend_from_slice(&[10, 0, (i >> 8) as u8, i as u8, 0x1A, 0xE1]);
    }
    data.push(b'e');
    data
}

fn bench_decode_torrent(c: &mut Criterion) {
    let data = sample_torrent(4096);
    c.bench_function("bencode_decode_torrent", |b| {
        b.iter(|| bencode::decode(black_box(&data)))
    });
}

fn bench_encode_torrent(c: &mut Criterion) {
    let value = bencode::decode(&sample_torrent(4096)).unwrap();
    c.bench_function("bencode_encode_torrent", |b| {
        b.iter(|| bencode::encode(black_box(&value)))
    });
}

fn bench_parse_descriptor(c: &mut Criterion) {
    let data = sample_torrent(4096);
    c.bench_function("metainfo_parse_descriptor", |b| {
        b.iter(|| TorrentDescriptor::parse(black_box(&data)))
    });
}

fn bench_parse_tracker_response(c: &mut Criterion) {
    let data = sample_tracker_response(500);
    c.bench_function("tracker_parse_compact_peers", |b| {
        b.iter(|| TrackerResponse::parse(black_box(&data)))
    });
}

criterion_group!(
    benches,
    bench_decode_torrent,
    bench_encode_torrent,
    bench_parse_descriptor,
    bench_parse_tracker_response
);
criterion_main!(benches);
