//! Creates an ICNS file from a PNG (or JPEG 2000) image.
//!
//! To create an ICNS file from a PNG, run:
//!
//! ```shell
//! cargo run --example png2icns <path/to/file.png>
//! # ICNS will be saved to path/to/file.icns
//! ```
//!
//! The image must be at least 32 pixels on its larger side.  Every
//! supported resolution up to the largest one the image can fill is stored.
//! Non-square images are stretched to square.
//!
//! To choose the resampling algorithm, pass its name (`nearest`,
//! `bilinear`, `bicubic`, `mitchell`, `lanczos2`, `lanczos3`) or a quality
//! level from 0 to 5:
//!
//! ```shell
//! cargo run --example png2icns <path/to/file.png> lanczos3
//! ```
//!
//! Set `RUST_LOG=debug` to see which resolutions were written.

extern crate env_logger;
extern crate icnsify;

use icnsify::{IconFamily, Interpolation};
use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();
    let num_args = env::args().count();
    if num_args < 2 || num_args > 3 {
        println!("Usage: png2icns <path> [<interpolation>]");
        return;
    }
    let args: Vec<String> = env::args().collect();
    let interpolation = match args.get(2) {
        Some(name) => name.parse::<Interpolation>().unwrap_or_else(|err| {
            eprintln!("{}", err);
            process::exit(1);
        }),
        None => Interpolation::Lanczos3,
    };
    let input_path = Path::new(&args[1]);
    let input = fs::read(input_path).expect("failed to read input file");
    let (format, image) =
        icnsify::format::decode(&input).expect("failed to decode input image");
    println!("Read {}x{} {} image.", image.width(), image.height(), format);
    let family = IconFamily::from_image(&image, interpolation)
        .expect("failed to encode image");
    let icns_path = input_path.with_extension("icns");
    let icns_file = BufWriter::new(File::create(&icns_path)
        .expect("failed to create ICNS file"));
    family.write(icns_file).expect("failed to write ICNS file");
    println!("Wrote {} icon(s) to {}.",
             family.elements().len(),
             icns_path.display());
}
