#![allow(unused)]

use bcn_codec::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

struct Image {
    tiles: Vec<Tile>,
    width: u32,
    height: u32,
    name: String,
}
impl Image {
    fn from_pixels(pixels: &[u8], size: Size, name: impl Into<String>) -> Self {
        let (width, height) = size.tile_grid();
        Self {
            tiles: image_to_tiles(pixels, size).unwrap(),
            width,
            height,
            name: name.into(),
        }
    }

    fn random(size: Size) -> Self {
        let mut pixels = vec![0_u8; size.pixels() as usize * 4];
        let mut rng = rand::thread_rng();
        rng.fill(pixels.as_mut_slice());
        Self::from_pixels(&pixels, size, "random")
    }

    /// A smooth image with a little noise, closer to real textures.
    fn gradient(size: Size) -> Self {
        let mut rng = rand::thread_rng();
        let mut pixels = Vec::with_capacity(size.pixels() as usize * 4);
        for y in 0..size.height {
            for x in 0..size.width {
                let noise: u8 = rng.gen_range(0..16);
                pixels.extend_from_slice(&[
                    (x % 256) as u8,
                    (y % 256) as u8,
                    ((x + y) % 256) as u8 / 2 + noise,
                    255 - noise,
                ]);
            }
        }
        Self::from_pixels(&pixels, size, "gradient")
    }
}

fn bench_encoder(c: &mut Criterion, format: Format, options: &EncodeOptions, image: &Image) {
    let mut name = format!("{format:?}: {} {:?}", image.name, options.quality);
    if options.parallel {
        name += " parallel";
    }

    c.bench_function(&name, |b| {
        b.iter(|| {
            let image = black_box(image);
            let result = encode(
                &image.tiles,
                image.width,
                image.height,
                format,
                black_box(options),
            );
            assert!(!black_box(result).unwrap().is_empty());
        });
    });
}

pub fn encode_compressed(c: &mut Criterion) {
    // images
    let random = Image::random(Size::new(128, 128));
    let gradient = Image::gradient(Size::new(128, 128));

    // options
    let mut base = EncodeOptions::default();
    base.parallel = false; // disable/enable parallel for benchmarking

    let mut fast = base;
    fast.quality = CompressionQuality::Fast;
    let mut balanced = base;
    balanced.quality = CompressionQuality::Balanced;
    let mut best = base;
    best.quality = CompressionQuality::BestQuality;

    for options in [&fast, &balanced, &best] {
        bench_encoder(c, Format::BC1_UNORM, options, &random);
        bench_encoder(c, Format::BC1_UNORM, options, &gradient);
        bench_encoder(c, Format::BC3_UNORM, options, &gradient);
        bench_encoder(c, Format::BC4_UNORM, options, &random);
        bench_encoder(c, Format::BC5_UNORM, options, &gradient);
    }

    let small = Image::gradient(Size::new(32, 32));
    bench_encoder(c, Format::BC7_UNORM, &fast, &gradient);
    bench_encoder(c, Format::BC7_UNORM, &balanced, &small);
    // bench_encoder(c, Format::BC7_UNORM, &best, &small);
}

pub fn encode_parallel(c: &mut Criterion) {
    // Create a new group to make the benchmark faster.
    // It's fine if the results are less accurate in this case.
    let mut group = c.benchmark_group("par");
    group.warm_up_time(std::time::Duration::from_millis(500));
    group.measurement_time(std::time::Duration::from_secs(3));
    group.sample_size(10);

    let images = [
        Image::random(Size::new(64, 64)),
        Image::random(Size::new(256, 256)),
        Image::random(Size::new(1024, 1024)),
    ];

    for format in [Format::BC1_UNORM, Format::BC4_UNORM] {
        for image in &images {
            for parallel in [true, false] {
                let mut options = EncodeOptions::default();
                options.quality = CompressionQuality::Fast;
                options.parallel = parallel;

                let name = format!(
                    "{format:?} {} - {}x{} tiles",
                    if parallel { "parallel" } else { "!parallel" },
                    image.width,
                    image.height,
                );

                group.bench_function(&name, |b| {
                    b.iter(|| {
                        let image = black_box(image);
                        let result =
                            encode(&image.tiles, image.width, image.height, format, &options);
                        black_box(result).unwrap();
                    });
                });
            }
        }
    }
}

criterion_group!(
    benches,
    encode_compressed,
    // encode_parallel,
);
criterion_main!(benches);
