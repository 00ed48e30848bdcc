//! Pipeline Benchmarks
//!
//! Image enhancement on synthetic document pages and Hindi sentence
//! segmentation on a long passage.
//!
//! Run with: `cargo bench --bench enhancement`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, GrayImage, Luma};
use std::time::Duration;

use hindi_qa_server::imaging;
use hindi_qa_server::qa::Segmenter;

/// Light page with dark horizontal strokes standing in for text lines
fn synthetic_page(width: u32, height: u32) -> DynamicImage {
    let page = GrayImage::from_fn(width, height, |x, y| {
        let line = (y / 24) % 2 == 1 && (y % 24) < 6;
        let word = (x / 40) % 3 != 2;
        if line && word {
            Luma([30])
        } else {
            Luma([220 + ((x + y) % 16) as u8])
        }
    });
    DynamicImage::ImageLuma8(page)
}

fn bench_enhance(c: &mut Criterion) {
    let mut group = c.benchmark_group("enhance");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for (name, width, height) in [("page_640x480", 640, 480), ("page_1280x1600", 1280, 1600)] {
        let page = synthetic_page(width, height);
        group.bench_function(name, |b| {
            b.iter(|| imaging::enhance(black_box(page.clone())))
        });
    }

    group.finish();
}

fn bench_segment(c: &mut Criterion) {
    let passage = "ताजमहल भारत के आगरा शहर में यमुना नदी के किनारे स्थित है। \
        इसका निर्माण मुगल बादशाह शाहजहाँ ने करवाया था। \
        तापमान 3.5 डिग्री था और डॉ. शर्मा ने बी.ए. किया था? हाँ! "
        .repeat(200);
    let segmenter = Segmenter::new();

    let mut group = c.benchmark_group("segment");
    group.bench_function("split_600_sentences", |b| {
        b.iter(|| segmenter.split(black_box(&passage)).count())
    });
    group.finish();
}

criterion_group!(benches, bench_enhance, bench_segment);
criterion_main!(benches);
