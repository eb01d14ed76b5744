//! bitprob CLI - unpack bit-packed probability blocks.
//!
//! Reads an already decompressed block from disk and prints the decoded
//! fields, their probabilities, or per-sample dosages.

use bitprob_rs::BitWidth;
use bitprob_rs::probability::{self, DosageOptions};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Unpacks MSB-first bit-packed fields into renormalized 32-bit values
#[derive(Parser)]
#[command(name = "bitprob")]
#[command(author = "bitprob-rs contributors")]
#[command(version)]
#[command(about = "Decode bit-packed probability blocks", long_about = None)]
#[command(after_help = "EXAMPLES:
    bitprob decode -i block.bin -b 10 -n 2000
    bitprob decode -i block.bin -b 8 -n 16 -f hex --offset 11
    bitprob probs -i block.bin -b 16 -n 200
    bitprob dosage -i block.bin -b 8 -s 500 -t 0.9
    bitprob info -b 10 -n 2000")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode packed fields to renormalized 32-bit values
    #[command(visible_alias = "d")]
    Decode {
        /// Input file holding the packed block
        #[arg(short, long, help = "Path to the packed block")]
        input: PathBuf,

        /// Bits per field (1-32)
        #[arg(short, long)]
        bits: u32,

        /// Number of fields to decode
        #[arg(short = 'n', long)]
        count: usize,

        /// Skip this many bytes before the packed data
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Output format
        #[arg(short, long, default_value = "decimal", value_enum)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode packed fields and print them as probabilities
    #[command(visible_alias = "p")]
    Probs {
        /// Input file holding the packed block
        #[arg(short, long)]
        input: PathBuf,

        /// Bits per field (1-32)
        #[arg(short, long)]
        bits: u32,

        /// Number of fields to decode
        #[arg(short = 'n', long)]
        count: usize,

        /// Skip this many bytes before the packed data
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Compute diploid dosages (two stored probabilities per sample)
    Dosage {
        /// Input file holding the packed block
        #[arg(short, long)]
        input: PathBuf,

        /// Bits per field (1-32)
        #[arg(short, long)]
        bits: u32,

        /// Number of samples
        #[arg(short, long)]
        samples: usize,

        /// Skip this many bytes before the packed data
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Probability threshold (0 disables filtering)
        #[arg(short, long, default_value = "0.9")]
        threshold: f64,

        /// One byte per sample, high bit set when the sample is missing
        #[arg(long)]
        missing: Option<PathBuf>,
    },

    /// Show the byte budget for a block
    #[command(visible_alias = "i")]
    Info {
        /// Bits per field (1-32)
        #[arg(short, long)]
        bits: u32,

        /// Number of fields
        #[arg(short = 'n', long)]
        count: usize,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// One decimal value per line
    Decimal,
    /// One 8-digit hex value per line
    Hex,
    /// Little-endian u32 words
    Raw,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            input,
            bits,
            count,
            offset,
            format,
            output,
        } => decode_block(&input, bits, count, offset, &format, output.as_ref()),
        Commands::Probs {
            input,
            bits,
            count,
            offset,
        } => print_probabilities(&input, bits, count, offset),
        Commands::Dosage {
            input,
            bits,
            samples,
            offset,
            threshold,
            missing,
        } => print_dosages(&input, bits, samples, offset, threshold, missing.as_ref()),
        Commands::Info { bits, count } => show_info(bits, count),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn read_block(input: &PathBuf, offset: usize) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let data = skip_offset(fs::read(input)?, offset)
        .map_err(|e| format!("{} in {:?}", e, input))?;
    log::debug!("read {} bytes from {:?} after offset {}", data.len(), input, offset);
    Ok(data)
}

fn skip_offset(mut data: Vec<u8>, offset: usize) -> Result<Vec<u8>, String> {
    if offset > data.len() {
        return Err(format!(
            "offset {} is past the end of the file ({} bytes)",
            offset,
            data.len()
        ));
    }
    data.drain(..offset);
    Ok(data)
}

/// One byte per sample; the high bit flags a missing sample.
fn parse_missing_mask(bytes: &[u8]) -> Vec<bool> {
    bytes.iter().map(|b| b & 0x80 != 0).collect()
}

fn decode_block(
    input: &PathBuf,
    bits: u32,
    count: usize,
    offset: usize,
    format: &OutputFormat,
    output: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = read_block(input, offset)?;
    let values = bitprob_rs::decode(&data, bits, count)?;

    let mut bytes = Vec::new();
    match format {
        OutputFormat::Decimal => {
            for v in &values {
                writeln!(bytes, "{}", v)?;
            }
        }
        OutputFormat::Hex => {
            for v in &values {
                writeln!(bytes, "{:08X}", v)?;
            }
        }
        OutputFormat::Raw => {
            for v in &values {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
    }

    match output {
        Some(path) => {
            fs::write(path, &bytes)?;
            println!("✓ Decoded {} fields of {} bits to {:?}", values.len(), bits, path);
        }
        None => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

fn print_probabilities(
    input: &PathBuf,
    bits: u32,
    count: usize,
    offset: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let width = BitWidth::new(bits)?;
    let data = read_block(input, offset)?;
    let values = bitprob_rs::decode(&data, bits, count)?;

    for p in probability::probabilities(&values, width) {
        println!("{:.6}", p);
    }
    Ok(())
}

fn print_dosages(
    input: &PathBuf,
    bits: u32,
    samples: usize,
    offset: usize,
    threshold: f64,
    missing: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(format!("threshold {} is outside [0, 1]", threshold).into());
    }

    let width = BitWidth::new(bits)?;
    let data = read_block(input, offset)?;
    let values = bitprob_rs::decode(&data, bits, probability::stored_value_count(samples)?)?;

    let mask = match missing {
        Some(path) => Some(parse_missing_mask(&fs::read(path)?)),
        None => None,
    };

    let options = DosageOptions {
        prob_threshold: threshold,
    };
    let dosages = probability::dosages(&values, width, samples, mask.as_deref(), &options)?;

    for d in dosages {
        match d {
            Some(v) => println!("{:.6}", v),
            None => println!("NA"),
        }
    }
    Ok(())
}

struct BlockBudget {
    total_bits: u64,
    bytes: usize,
    slack_bits: u64,
}

fn block_budget(bits: u32, count: usize) -> Result<BlockBudget, bitprob_rs::UnpackError> {
    let width = BitWidth::new(bits)?;
    // Fails when count * bits does not fit, so the product below is in range.
    let bytes = bitprob_rs::required_bytes(bits, count)?;
    let total_bits = count as u64 * width.get() as u64;
    Ok(BlockBudget {
        total_bits,
        bytes,
        slack_bits: (8 - total_bits % 8) % 8,
    })
}

fn show_info(bits: u32, count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let width = BitWidth::new(bits)?;
    let budget = block_budget(bits, count)?;

    println!("Field width: {}", width);
    println!("Fields:      {}", count);
    println!("Total bits:  {}", budget.total_bits);
    println!("Bytes:       {}", budget.bytes);
    println!("Slack bits:  {}", budget.slack_bits);
    println!("Max raw:     {}", width.max_raw());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitprob_rs::UnpackError;

    #[test]
    fn test_skip_offset() {
        assert_eq!(skip_offset(vec![1, 2, 3, 4], 1).unwrap(), vec![2, 3, 4]);
        assert_eq!(skip_offset(vec![1, 2, 3, 4], 4).unwrap(), Vec::<u8>::new());
        assert_eq!(skip_offset(vec![1, 2, 3], 0).unwrap(), vec![1, 2, 3]);
        assert!(skip_offset(vec![1, 2, 3], 4).is_err());
    }

    #[test]
    fn test_missing_mask_uses_high_bit() {
        assert_eq!(
            parse_missing_mask(&[0x00, 0x80, 0x02, 0x82, 0xFF, 0x7F]),
            vec![false, true, false, true, true, false]
        );
        assert!(parse_missing_mask(&[]).is_empty());
    }

    #[test]
    fn test_block_budget() {
        let budget = block_budget(10, 3).unwrap();
        assert_eq!(budget.total_bits, 30);
        assert_eq!(budget.bytes, 4);
        assert_eq!(budget.slack_bits, 2);

        let budget = block_budget(8, 5).unwrap();
        assert_eq!(budget.slack_bits, 0);
    }

    #[test]
    fn test_block_budget_rejects_oversized_blocks() {
        assert!(matches!(
            block_budget(32, usize::MAX),
            Err(UnpackError::SizeOverflow { .. })
        ));
        assert!(matches!(
            block_budget(33, 1),
            Err(UnpackError::InvalidBitWidth { bit_width: 33 })
        ));
    }

    #[test]
    fn test_cli_arguments_parse() {
        let cli = Cli::try_parse_from(["bitprob", "info", "-b", "10", "-n", "2000"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Info {
                bits: 10,
                count: 2000
            }
        ));
    }
}
