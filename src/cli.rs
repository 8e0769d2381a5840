use crate::codec::{header, HuffmanTree};
use crate::config::{HuffConfig, Operation, DEFAULT_BUFFER_SIZE};
use crate::dump;
use crate::error::HuffError;
use crate::pipeline;
use clap::{ArgGroup, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about, long_about = "Huffman coding compressor with a sentinel-terminated bit stream")]
#[command(group(ArgGroup::new("operation").required(true).args(["compress", "decompress"])))]
struct Cli {
    /// Compress INPUT into OUTPUT
    #[arg(short, long)]
    compress: bool,

    /// Decompress INPUT into OUTPUT
    #[arg(short, long)]
    decompress: bool,

    /// Input file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Size in bytes of the chunks read from and written to disk
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    /// Show a progress bar
    #[arg(short, long)]
    progress: bool,

    /// Write the Huffman tree as a Graphviz digraph
    #[arg(long, value_name = "FILE")]
    dump_tree: Option<PathBuf>,

    /// Write the symbol table as text
    #[arg(long, value_name = "FILE")]
    dump_table: Option<PathBuf>,
}

impl Cli {
    fn operation(&self) -> Operation {
        if self.compress {
            Operation::Compress
        } else {
            Operation::Decompress
        }
    }
}

pub fn run() -> Result<(), HuffError> {
    let cli = Cli::parse();
    let config = HuffConfig::default()
        .with_buffer_size(cli.buffer_size)
        .with_progress(cli.progress);
    config.validate()?;

    let input_len = std::fs::metadata(&cli.input)?.len();
    let pb = progress_bar(input_len, &config);
    let mut in_file = pb.wrap_read(BufReader::new(File::open(&cli.input)?));
    let mut out_file = BufWriter::new(File::create(&cli.output)?);

    let start = Instant::now();
    match cli.operation() {
        Operation::Compress => {
            println!("Compressing {} to {}...", cli.input.display(), cli.output.display());
            let stats = pipeline::compress(&mut in_file, &mut out_file, &config)?;
            pb.finish_and_clear();

            println!("Compression successful!");
            println!("  Original Size:    {} bytes", stats.original_size);
            println!("  Compressed Size:  {} bytes", stats.compressed_size);
            println!("  Symbols:          {}", stats.distinct_symbols);
            println!("  Ratio:            {:.2}x", stats.ratio);
        }
        Operation::Decompress => {
            println!("Decompressing {} to {}...", cli.input.display(), cli.output.display());
            let stats = pipeline::decompress(&mut in_file, &mut out_file, &config)?;
            pb.finish_and_clear();

            println!("Decompression successful!");
            println!("  Restored Size:    {} bytes", stats.decompressed_size);
        }
    }
    println!("  Elapsed Time:     {:.2?}", start.elapsed());

    if cli.dump_tree.is_some() || cli.dump_table.is_some() {
        let source = match cli.operation() {
            Operation::Compress => &cli.output,
            Operation::Decompress => &cli.input,
        };
        write_dumps(source, cli.dump_tree.as_deref(), cli.dump_table.as_deref())?;
    }

    Ok(())
}

/// Renders the table stored in the header of `stream`.
fn write_dumps(stream: &Path, tree_path: Option<&Path>, table_path: Option<&Path>) -> Result<(), HuffError> {
    let decoded = header::read_table(&mut BufReader::new(File::open(stream)?))?;
    if let Some(path) = tree_path {
        let tree = HuffmanTree::build(&decoded.table);
        dump::write_tree_dot(&tree, &mut BufWriter::new(File::create(path)?))?;
    }
    if let Some(path) = table_path {
        dump::write_table_text(&decoded.table, &mut BufWriter::new(File::create(path)?))?;
    }
    Ok(())
}

fn progress_bar(len: u64, config: &HuffConfig) -> ProgressBar {
    if !config.progress {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
