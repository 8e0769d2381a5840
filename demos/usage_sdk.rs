use huffc::config::HuffConfig;
use huffc::pipeline;

fn main() {
	let data = b"hello hello hello hello".to_vec();
	let mut input = std::io::Cursor::new(data);
	let mut compressed = Vec::new();
	let cfg = HuffConfig::default();
	let stats = pipeline::compress(&mut input, &mut compressed, &cfg).unwrap();
	println!("compressed {} -> {} ({} symbols)", stats.original_size, stats.compressed_size, stats.distinct_symbols);

	let mut comp_cur = std::io::Cursor::new(compressed);
	let mut restored = Vec::new();
	let restored_stats = pipeline::decompress(&mut comp_cur, &mut restored, &cfg).unwrap();
	println!("restored {} bytes", restored_stats.decompressed_size);
}
