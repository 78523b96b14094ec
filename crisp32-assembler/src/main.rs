//! `crisp32-asm`: assemble CRISP-32 assembly into a raw image

use clap::Parser;
use crisp32_assembler::assemble_with_origin;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(author, version, about = "CRISP-32 assembler", long_about = None)]
struct Opts {
    /// Assembly source file
    input: PathBuf,

    /// Output image path (defaults to the input with a .bin extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Load address the image will be linked against
    #[arg(long, value_parser = parse_addr, default_value = "0x1000")]
    origin: u32,
}

fn parse_addr(s: &str) -> Result<u32, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse::<u32>()
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("crisp32-asm: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &Opts) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(&opts.input)?;
    let program = assemble_with_origin(&source, opts.origin)?;

    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| opts.input.with_extension("bin"));
    std::fs::write(&output, &program.image)?;

    println!(
        "assembled {} instructions ({} bytes) at origin {:#x} -> {}",
        program.instruction_count(),
        program.len(),
        program.origin,
        output.display()
    );
    Ok(())
}
