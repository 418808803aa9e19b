use criterion::{Criterion, black_box, criterion_group, criterion_main};
use cb_core::{Image, mask_from_fn};
use cb_label::{Connectivity, label_components, split_by_area};

fn synthetic_line_art(width: usize, height: usize) -> Image<u8> {
    mask_from_fn(width, height, |x, y| {
        let grid = x % 40 == 0 || y % 40 == 0;
        let blob = (200..420).contains(&x) && (150..380).contains(&y);
        let dots = x % 9 == 3 && y % 11 == 5;
        grid || blob || dots
    })
}

fn bench_label(c: &mut Criterion) {
    let img = synthetic_line_art(1024, 768);

    c.bench_function("cb_label_components_1024x768", |b| {
        b.iter(|| {
            let l = label_components(black_box(&img.as_view()), Connectivity::C8);
            black_box(l.num_components());
        });
    });

    c.bench_function("cb_label_split_by_area_1024x768", |b| {
        b.iter(|| {
            let s = split_by_area(black_box(&img.as_view()), 2500);
            black_box((s.solid_components, s.line_components));
        });
    });
}

criterion_group!(benches, bench_label);
criterion_main!(benches);
