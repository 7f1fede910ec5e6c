use bcn_codec::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, RngCore};

fn random_bytes(len: usize) -> Vec<u8> {
    let mut out = vec![0; len];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut out);
    out
}

type DataModifier = Box<dyn FnMut(&mut [u8])>;
struct BenchConfig {
    data_modifier: DataModifier,
    size: Size,
    name: String,
}
impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            data_modifier: Box::new(|_| {}),
            size: (2048, 2048).into(),
            name: String::new(),
        }
    }
}

fn bench_decoder(c: &mut Criterion, format: Format) {
    bench_decoder_with(c, format, |_| {});
}
fn bench_decoder_with(
    c: &mut Criterion,
    format: Format,
    create_config: impl FnOnce(&mut BenchConfig),
) {
    let mut config = BenchConfig::default();
    create_config(&mut config);

    let mut name = format!("{:?}", format);
    if !config.name.is_empty() {
        name += " - ";
        name += &config.name;
    }

    c.bench_function(&name, |b| {
        let (width, height) = config.size.tile_grid();
        let len = format.encoded_size(width, height).unwrap();
        let mut bytes = random_bytes(len).into_boxed_slice();
        (config.data_modifier)(&mut bytes);

        b.iter(|| {
            let result = decode(black_box(&bytes), width, height, format);
            black_box(result).unwrap();
        });
    });
}

/// This sets the BC7 block modes such that each mode is equally likely.
///
/// The block mode is decided by the number of trailing zeros, meaning that
/// for random bytes, 50% of the blocks will be mode 0. This does NOT
/// represent real-world data at all, hence this function.
fn random_bc7_modes(data: &mut [u8]) {
    let mut rng = rand::thread_rng();
    for i in (0..data.len()).step_by(16) {
        let mode: u8 = rng.gen_range(0..8);
        set_bc7_mode(&mut data[i], mode);
    }
}
fn set_bc7_mode(byte: &mut u8, mode: u8) {
    *byte |= 1;
    *byte <<= mode;
}

pub fn block_compressed(c: &mut Criterion) {
    bench_decoder(c, Format::BC1_UNORM);
    bench_decoder_with(c, Format::BC1_UNORM, |c| {
        c.size = (2047, 2047).into();
    });
    bench_decoder(c, Format::BC2_UNORM);
    bench_decoder(c, Format::BC3_UNORM);
    bench_decoder(c, Format::BC4_UNORM);
    bench_decoder(c, Format::BC5_UNORM);
    bench_decoder_with(c, Format::BC7_UNORM, |c| {
        c.data_modifier = Box::new(random_bc7_modes);
    });
    for mode in 0..8 {
        bench_decoder_with(c, Format::BC7_UNORM, |c| {
            c.data_modifier = Box::new(move |data: &mut [u8]| {
                for i in (0..data.len()).step_by(16) {
                    set_bc7_mode(&mut data[i], mode);
                }
            });
            c.name = format!("mode {mode}");
            c.size = (1024, 1024).into();
        });
    }
}

criterion_group!(benches, block_compressed);
criterion_main!(benches);
