//! # utf-convert CLI - Unicode Transfer Encoding Converter
//!
//! Command-line interface for converting and validating UTF-8, UTF-16 and
//! UTF-32 files.

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use std::time::Instant;

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use serde::Serialize;

#[cfg(feature = "cli")]
use utf_convert::detection::EncodingDetector;
#[cfg(feature = "cli")]
use utf_convert::{Encoding, Error as ConvertError, Translator};

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features disabled. Enable with --features cli");
    std::process::exit(1);
}

/// utf-convert: validating UTF-8 / UTF-16 / UTF-32 converter
#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "utf-convert")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert a file between Unicode encodings
    Convert(ConvertArgs),

    /// Detect the byte order mark of a file
    Detect(DetectArgs),

    /// List all supported encodings
    List(ListArgs),

    /// Validate that a file is properly encoded
    Validate(ValidateArgs),

    /// Display detailed information about an encoding
    Info(InfoArgs),
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ConvertArgs {
    /// Source encoding
    #[arg(short = 'f', long = "from")]
    from: Encoding,

    /// Target encoding
    #[arg(short = 't', long = "to")]
    to: Encoding,

    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert in-place (overwrite input file)
    #[arg(long, conflicts_with = "output")]
    in_place: bool,

    /// Reject lone surrogates, overlong forms and surrogate code points
    #[arg(long)]
    strict: bool,

    /// Remove a leading BOM from the output
    #[arg(long, conflicts_with = "add_bom")]
    strip_bom: bool,

    /// Ensure the output starts with a BOM
    #[arg(long)]
    add_bom: bool,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct DetectArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Maximum bytes to read for detection
    #[arg(long, default_value = "8192")]
    sample_size: usize,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ListArgs {
    /// Show encoding details
    #[arg(long)]
    details: bool,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ValidateArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Expected encoding
    #[arg(short, long)]
    encoding: Encoding,

    /// Reject lone surrogates, overlong forms and surrogate code points
    #[arg(long)]
    strict: bool,

    /// Show the failing status
    #[arg(long)]
    show_errors: bool,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct InfoArgs {
    /// Encoding to describe
    encoding: Encoding,

    /// Show how sample characters are encoded
    #[arg(long)]
    samples: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct ConversionResult {
    success: bool,
    from: Encoding,
    to: Encoding,
    bytes_processed: usize,
    bytes_written: usize,
    processing_time_ms: u64,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    encoding: Encoding,
    strict: bool,
    error: Option<String>,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(ref args) => convert_command(args, &cli)?,
        Commands::Detect(ref args) => detect_command(args, &cli)?,
        Commands::List(ref args) => list_command(args, &cli)?,
        Commands::Validate(ref args) => validate_command(args, &cli)?,
        Commands::Info(ref args) => info_command(args, &cli)?,
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn read_input(input: Option<&Path>, verbose: bool) -> Result<Vec<u8>> {
    if let Some(input_path) = input {
        if verbose {
            eprintln!("Reading from: {}", input_path.display());
        }
        fs::read(input_path)
            .with_context(|| format!("Failed to read input file: {}", input_path.display()))
    } else {
        if verbose {
            eprintln!("Reading from stdin");
        }
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    }
}

#[cfg(feature = "cli")]
fn convert_command(args: &ConvertArgs, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();

    if cli.verbose {
        eprintln!(
            "Converting from {} to {}{}",
            args.from.name(),
            args.to.name(),
            if args.strict { " (strict)" } else { "" }
        );
    }

    let translator = Translator::new(args.from, args.to).comply_with_standard(args.strict);
    let input_data = read_input(args.input.as_deref(), cli.verbose)?;

    let output_data = translator.convert(&input_data).with_context(|| {
        format!(
            "Failed to convert from {} to {}",
            args.from.name(),
            args.to.name()
        )
    })?;

    // Output is always written big-endian, so the BOM is the target's own
    let bom = args.to.bom();
    let converted_len = output_data.len();
    let final_data = apply_bom(output_data, bom, args.strip_bom, args.add_bom);
    if cli.verbose && final_data.len() < converted_len {
        eprintln!("Stripped BOM ({} bytes)", bom.len());
    }

    if args.in_place {
        if let Some(ref input_path) = args.input {
            fs::write(input_path, &final_data).with_context(|| {
                format!("Failed to write to input file: {}", input_path.display())
            })?;
            if cli.verbose {
                eprintln!("Updated file in-place: {}", input_path.display());
            }
        } else {
            anyhow::bail!("Cannot use --in-place without input file");
        }
    } else if let Some(ref output_path) = args.output {
        fs::write(output_path, &final_data)
            .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;
        if cli.verbose {
            eprintln!("Wrote to: {}", output_path.display());
        }
    } else {
        io::stdout()
            .write_all(&final_data)
            .context("Failed to write to stdout")?;
    }

    let processing_time = start_time.elapsed();

    if cli.verbose {
        eprintln!(
            "Processed {} bytes -> {} bytes in {:?}",
            input_data.len(),
            final_data.len(),
            processing_time
        );
    }

    match cli.format {
        OutputFormat::Json => {
            let result = ConversionResult {
                success: true,
                from: args.from,
                to: args.to,
                bytes_processed: input_data.len(),
                bytes_written: final_data.len(),
                processing_time_ms: processing_time.as_millis() as u64,
            };
            eprintln!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            if cli.verbose {
                eprintln!("✓ Conversion completed successfully");
            }
        }
    }

    Ok(())
}

/// Strip or add `bom` at the start of converted output
///
/// Stripping wins when both are requested.
#[cfg(feature = "cli")]
fn apply_bom(mut output: Vec<u8>, bom: &[u8], strip: bool, add: bool) -> Vec<u8> {
    let has_bom = output.starts_with(bom);
    if strip && has_bom {
        output.drain(..bom.len());
        output
    } else if add && !has_bom {
        let mut result = bom.to_vec();
        result.extend(output);
        result
    } else {
        output
    }
}

#[cfg(feature = "cli")]
fn detect_command(args: &DetectArgs, cli: &Cli) -> Result<()> {
    let sample_data = if let Some(ref input_path) = args.input {
        let file = fs::File::open(input_path)
            .with_context(|| format!("Failed to open input file: {}", input_path.display()))?;
        read_sample(file, args.sample_size)?
    } else {
        read_sample(io::stdin(), args.sample_size)?
    };

    let detector = EncodingDetector::with_sample_size(args.sample_size);
    let detection_result = detector.detect(&sample_data);

    match cli.format {
        OutputFormat::Json => {
            let result = serde_json::json!({
                "bom_detected": detection_result.is_some(),
                "detection": detection_result,
                "sample_size": sample_data.len(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            match detection_result {
                Some(result) => {
                    println!("Detected encoding: {}", result.encoding.name());
                    println!("Byte order: {}", result.endianness.name());
                    println!("BOM length: {} bytes", result.bom_length);
                }
                None => println!("No BOM detected"),
            }
            println!("Sample size: {} bytes", sample_data.len());
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn read_sample(reader: impl Read, sample_size: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(sample_size);
    reader
        .take(sample_size as u64)
        .read_to_end(&mut buffer)
        .context("Failed to read sample")?;
    Ok(buffer)
}

#[cfg(feature = "cli")]
fn list_command(args: &ListArgs, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let encodings_info: Vec<_> = Encoding::ALL
                .iter()
                .map(|encoding| {
                    serde_json::json!({
                        "name": encoding.name(),
                        "description": get_encoding_description(*encoding),
                        "unit_width": encoding.unit_width(),
                        "max_units_per_code_point": encoding.max_units_per_code_point(),
                        "bom": format!("{:02X?}", encoding.bom()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&encodings_info)?);
        }
        OutputFormat::Text => {
            println!("Supported Encodings ({} total):", Encoding::ALL.len());
            println!();

            for encoding in Encoding::ALL {
                println!(
                    "{:8} {}",
                    encoding.name(),
                    get_encoding_description(encoding)
                );

                if args.details {
                    println!("         Unit width: {} bytes", encoding.unit_width());
                    println!(
                        "         Units per code point: 1-{}",
                        encoding.max_units_per_code_point()
                    );
                    println!("         BOM: {:02X?}", encoding.bom());
                    println!();
                }
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn validate_command(args: &ValidateArgs, cli: &Cli) -> Result<()> {
    let input_data = read_input(args.input.as_deref(), cli.verbose)?;

    // Same-encoding conversion validates without changing the text
    let translator = Translator::new(args.encoding, args.encoding).comply_with_standard(args.strict);
    let outcome = translator.convert(&input_data);

    if let OutputFormat::Json = cli.format {
        let result = ValidationResult {
            valid: outcome.is_ok(),
            encoding: args.encoding,
            strict: args.strict,
            error: outcome.as_ref().err().map(ToString::to_string),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
        std::process::exit(if outcome.is_ok() { 0 } else { 1 });
    }

    match outcome {
        Ok(_) => {
            println!("✓ File is valid {}", args.encoding.name());
            std::process::exit(0);
        }
        Err(e) => {
            println!("✗ File is not valid {}", args.encoding.name());

            if args.show_errors {
                match e {
                    ConvertError::Conversion { status } => {
                        println!("  Status {}: {}", status.code(), status);
                    }
                    _ => println!("  Error: {}", e),
                }
            }

            std::process::exit(1);
        }
    }
}

#[cfg(feature = "cli")]
fn info_command(args: &InfoArgs, cli: &Cli) -> Result<()> {
    let encoding = args.encoding;

    match cli.format {
        OutputFormat::Json => {
            let info = serde_json::json!({
                "name": encoding.name(),
                "description": get_encoding_description(encoding),
                "unit_width": encoding.unit_width(),
                "max_units_per_code_point": encoding.max_units_per_code_point(),
                "bom": format!("{:02X?}", encoding.bom()),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Text => {
            println!("Encoding Information: {}", encoding.name());
            println!("Description: {}", get_encoding_description(encoding));
            println!("Unit width: {} bytes", encoding.unit_width());
            println!(
                "Units per code point: 1-{}",
                encoding.max_units_per_code_point()
            );
            println!("BOM: {:02X?}", encoding.bom());

            if args.samples {
                println!("\nCharacter Samples:");
                print_character_samples(encoding)?;
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn get_encoding_description(encoding: Encoding) -> &'static str {
    match encoding {
        Encoding::UTF8 => "Unicode Transformation Format 8-bit, variable-length encoding",
        Encoding::UTF16 => "Unicode Transformation Format 16-bit, surrogate pairs above U+FFFF",
        Encoding::UTF32 => "Unicode Transformation Format 32-bit, fixed-length encoding",
    }
}

#[cfg(feature = "cli")]
fn print_character_samples(encoding: Encoding) -> Result<()> {
    let translator = Translator::new(Encoding::UTF8, encoding).comply_with_standard(true);

    for sample in ["A", "\u{E9}", "\u{20AC}", "\u{10348}"] {
        let encoded = translator
            .convert(sample.as_bytes())
            .with_context(|| format!("Failed to encode sample {}", sample))?;
        let code_point = sample.chars().next().map(u32::from).unwrap_or_default();
        println!("  U+{:04X} {} -> {:02X?}", code_point, sample, encoded);
    }

    Ok(())
}
