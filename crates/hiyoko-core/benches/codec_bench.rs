use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hiyoko_core::{decode, Board, KEY_SPACE};

fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 || board.verdict() != 0 {
        return 1;
    }
    let mut nodes = 0u64;
    for (_, child) in board.children() {
        nodes += perft(&child, depth - 1);
    }
    nodes
}

fn codec_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    group.bench_function("encode_opening", |b| {
        let board = Board::start();
        b.iter(|| black_box(&board).key())
    });

    group.bench_function("decode_span", |b| {
        // A span in the middle of the key space, mostly illegal keys.
        let start = KEY_SPACE / 2;
        b.iter(|| {
            let mut legal = 0u64;
            for key in (start..start + 4096).step_by(2) {
                if decode(black_box(key)).is_some() {
                    legal += 1;
                }
            }
            legal
        })
    });

    group.finish();
}

fn movegen_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");
    group.sample_size(20);

    group.bench_function("perft_opening_depth_4", |b| {
        let board = Board::start();
        b.iter(|| perft(black_box(&board), 4))
    });

    group.finish();
}

criterion_group!(benches, codec_benchmarks, movegen_benchmarks);
criterion_main!(benches);
