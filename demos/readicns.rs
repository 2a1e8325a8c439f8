extern crate env_logger;
extern crate icnsify;

use icnsify::IconReader;
use std::env;
use std::fs;

fn main() {
    env_logger::init();
    if env::args().count() != 2 {
        println!("Usage: readicns <path>");
        return;
    }
    let path = env::args().nth(1).unwrap();
    let data = fs::read(path).expect("failed to open file");
    let reader = IconReader::parse(&data).expect("failed to read ICNS file");
    println!("ICNS file is {} bytes and contains {} image(s).",
             reader.total_length(),
             reader.entries().len());
    for (index, entry) in reader.entries().iter().enumerate() {
        println!("Image {}: {} at offset {} ({}px, {} byte payload)",
                 index,
                 entry.icon_type().ostype(),
                 entry.offset(),
                 entry.pixels(),
                 entry.data().len());
    }
}
