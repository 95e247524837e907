use criterion::{Criterion, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};
use planter_core::{
    BackgroundParams, InpaintParams, PipelineSettings, PlantDescriptor, Region, process_plant,
    remove_background, remove_face_features,
};
use std::hint::black_box;

fn build_pot_image() -> RgbImage {
    let mut img = RgbImage::from_pixel(640, 640, Rgb([255, 251, 240]));
    for y in 200..600 {
        for x in 120..520 {
            img.put_pixel(x, y, Rgb([214, 160, 118]));
        }
    }
    // Eyes, mouth and cheeks give both passes work to do.
    for (cx, cy) in [(240, 360), (400, 360)] {
        for y in cy - 12..cy + 12 {
            for x in cx - 12..cx + 12 {
                img.put_pixel(x, y, Rgb([30, 24, 20]));
            }
        }
    }
    for x in 280..360 {
        img.put_pixel(x, 430, Rgb([40, 30, 30]));
    }
    for (cx, cy) in [(200, 420), (440, 420)] {
        for y in cy - 15..cy + 15 {
            for x in cx - 25..cx + 25 {
                img.put_pixel(x, y, Rgb([245, 130, 130]));
            }
        }
    }
    img
}

fn bench_face_removal(c: &mut Criterion) {
    let source = build_pot_image();
    let params = InpaintParams::default();
    let pot = Region::new(120, 200, 520, 600);

    c.bench_function("remove_face_features_400px", |b| {
        b.iter(|| {
            let mut img = source.clone();
            black_box(remove_face_features(&mut img, pot, &params));
        })
    });
}

fn bench_background(c: &mut Criterion) {
    let source = DynamicImage::ImageRgb8(build_pot_image()).to_rgba8();
    let params = BackgroundParams::default();

    c.bench_function("remove_background_640px", |b| {
        b.iter(|| {
            let mut img = source.clone();
            black_box(remove_background(&mut img, &params));
        })
    });
}

fn bench_full_plant(c: &mut Criterion) {
    let source = DynamicImage::ImageRgb8(build_pot_image());
    let plant = PlantDescriptor::new(
        "bench",
        Region::new(0, 0, 640, 640),
        vec![Region::new(120, 200, 520, 600)],
    );
    let settings = PipelineSettings::default();

    c.bench_function("process_plant_640px", |b| {
        b.iter(|| black_box(process_plant(&source, &plant, &settings).ok()))
    });
}

criterion_group!(benches, bench_face_removal, bench_background, bench_full_plant);
criterion_main!(benches);
