use clap::{Parser, Subcommand};
use qr_trace::{BitMatrix, DecoderResult, QrDecoder, decode_batch_with};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qrtrace", version, about = "Decode QR module grids and report corrected positions")]
struct Cli {
    /// Do not retry failed grids with a mirrored reading
    #[arg(long, global = true)]
    no_mirror: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a single grid file
    Decode {
        #[arg(long)]
        grid: PathBuf,
    },
    /// Decode several grid files in one batch
    Batch {
        #[arg(long, num_args = 1.., required = true)]
        grid: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let decoder = QrDecoder::new().with_mirror_retry(!cli.no_mirror);

    match cli.command {
        Command::Decode { grid } => decode_cmd(&decoder, &grid),
        Command::Batch { grid } => batch_cmd(&decoder, &grid),
    }
}

fn load_grid(path: &Path) -> Result<BitMatrix, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read grid {}: {}", path.display(), err))?;
    BitMatrix::parse_grid(&text).ok_or_else(|| {
        format!(
            "Failed to parse grid {}: rows must be equal length and use #/1/X or ./0/space",
            path.display()
        )
    })
}

fn decode_cmd(decoder: &QrDecoder, path: &Path) -> ExitCode {
    let matrix = match load_grid(path) {
        Ok(matrix) => matrix,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::FAILURE;
        }
    };

    println!("Grid: {} ({}x{})", path.display(), matrix.width(), matrix.height());
    match decoder.decode(&matrix) {
        Ok(result) => {
            print_result(&result);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Decode failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn batch_cmd(decoder: &QrDecoder, paths: &[PathBuf]) -> ExitCode {
    let mut matrices = Vec::with_capacity(paths.len());
    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        match load_grid(path) {
            Ok(matrix) => {
                matrices.push(matrix);
                loaded.push(path);
            }
            Err(msg) => eprintln!("{}", msg),
        }
    }

    let start = Instant::now();
    let results = decode_batch_with(decoder, &matrices);
    let elapsed = start.elapsed();

    let mut decoded = 0usize;
    for (path, result) in loaded.iter().zip(&results) {
        println!("Grid: {}", path.display());
        match result {
            Ok(result) => {
                decoded += 1;
                print_result(result);
            }
            Err(err) => println!("  Decode failed: {}", err),
        }
    }

    println!(
        "Decoded {}/{} grids in {:.2}ms",
        decoded,
        paths.len(),
        elapsed.as_secs_f64() * 1000.0
    );
    if decoded == paths.len() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_result(result: &DecoderResult) {
    println!(
        "  version={} ec_level={:?} mask={} mirrored={}",
        result.version.number(),
        result.ec_level,
        result.mask_pattern.bits(),
        result.mirrored
    );
    println!("  corrected {} codewords", result.errors_corrected);
    for block in &result.error_positions {
        println!("    block {}: {:?}", block.block_index, block.positions);
    }
    let hex: Vec<String> = result.data.iter().map(|b| format!("{:02x}", b)).collect();
    println!("  data: {}", hex.join(" "));
}
