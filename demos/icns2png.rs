//! Extracts images from an ICNS file as PNG files.
//!
//! ```shell
//! cargo run --example icns2png <path/to/file.icns>
//! # Largest icon will be saved to path/to/file.png
//!
//! cargo run --example icns2png <path/to/file.icns> all
//! # Every icon will be saved to path/to/file.<ostype>.png
//! ```

extern crate env_logger;
extern crate icnsify;

use icnsify::IconReader;
use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

fn main() {
    env_logger::init();
    let num_args = env::args().count();
    let args: Vec<String> = env::args().collect();
    let extract_all = num_args == 3 && args[2] == "all";
    if num_args < 2 || num_args > 3 || (num_args == 3 && !extract_all) {
        println!("Usage: icns2png <path> [all]");
        return;
    }
    let icns_path = Path::new(&args[1]);
    let data = fs::read(icns_path).expect("failed to read ICNS file");
    let reader = IconReader::parse(&data).expect("failed to parse ICNS file");
    if extract_all {
        for entry in reader.entries() {
            let image = entry.decode_image().expect("failed to decode image");
            let png_path = icns_path
                .with_extension(format!("{}.png", entry.icon_type().ostype()));
            save_png(&image, &png_path);
        }
    } else {
        let image = reader.decode_largest().expect("failed to decode image");
        save_png(&image, &icns_path.with_extension("png"));
    }
}

fn save_png(image: &icnsify::Image, path: &Path) {
    let png_file = BufWriter::new(File::create(path)
        .expect("failed to create PNG file"));
    image.write_png(png_file).expect("failed to write PNG file");
    println!("Wrote {}x{} image to {}.",
             image.width(),
             image.height(),
             path.display());
}
