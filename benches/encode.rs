use criterion::{Criterion, black_box, criterion_group, criterion_main};
use minqr::config::RenderOptions;
use minqr::helper::to_svg_string;
use minqr::qrcode::{Mask, QrCode, QrSegment};

fn bench_encode_url_v1(c: &mut Criterion) {
    c.bench_function("encode_text_url_v1", |b| {
        b.iter(|| QrCode::encode_text(black_box("HTTPS://GBD.TO/R1"), None))
    });
}

fn bench_encode_bytes_v4(c: &mut Criterion) {
    let text = "https://example.com/reminders/2024/shuffle?id=0123456789abcdef&x=1";
    c.bench_function("encode_text_bytes_v4", |b| {
        b.iter(|| QrCode::encode_text(black_box(text), None))
    });
}

fn bench_encode_fixed_mask(c: &mut Criterion) {
    let text = "https://example.com/reminders/2024/shuffle?id=0123456789abcdef&x=1";
    c.bench_function("encode_text_bytes_v4_mask0", |b| {
        b.iter(|| QrCode::encode_text(black_box(text), Some(Mask::new(0))))
    });
}

fn bench_make_segments_mixed(c: &mut Criterion) {
    let text = "https://example.com/r/1234567890123456789012345678901234";
    c.bench_function("make_segments_mixed", |b| {
        b.iter(|| QrSegment::make_segments(black_box(text)))
    });
}

fn bench_to_svg_string(c: &mut Criterion) {
    let qr = QrCode::encode_text("https://example.com/reminders/2024/shuffle", None).unwrap();
    let opts = RenderOptions::default();
    c.bench_function("to_svg_string", |b| {
        b.iter(|| to_svg_string(black_box(&qr), black_box(&opts)))
    });
}

criterion_group!(
    benches,
    bench_encode_url_v1,
    bench_encode_bytes_v4,
    bench_encode_fixed_mask,
    bench_make_segments_mixed,
    bench_to_svg_string
);
criterion_main!(benches);
