//! `crisp32-run`: load a raw CRISP-32 image and run it to halt

use clap::Parser;
use crisp32_runtime::{Machine, MachineConfig};
use crisp32_spec::{Register, NUM_REGISTERS};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(author, version, about = "CRISP-32 virtual machine", long_about = None)]
struct Opts {
    /// Raw program image
    image: PathBuf,

    /// Guest physical load address (also the initial PC)
    #[arg(long, value_parser = parse_addr, default_value = "0x1000")]
    load_addr: u32,

    /// Guest memory size in bytes
    #[arg(long, default_value_t = 64 * 1024)]
    memory: usize,

    /// Step cap; 0 runs until halt
    #[arg(long, default_value_t = 0)]
    max_steps: u64,

    /// Show execution trace
    #[arg(short, long)]
    trace: bool,
}

/// Accept decimal or 0x-prefixed hex addresses
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
            eprintln!("crisp32-run: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &Opts) -> Result<(), Box<dyn std::error::Error>> {
    let image = std::fs::read(&opts.image)?;

    let mut memory = vec![0u8; opts.memory];
    let config = MachineConfig {
        max_steps: (opts.max_steps > 0).then_some(opts.max_steps),
        trace: opts.trace,
    };
    let mut machine = Machine::with_config(&mut memory, config);
    machine.load_image(&image, opts.load_addr)?;
    machine.set_pc(opts.load_addr);

    let outcome = machine.run();

    println!(
        "halted after {} steps, pc={:#010x}{}",
        machine.steps(),
        machine.pc(),
        if machine.is_running() {
            " (step cap reached)"
        } else {
            ""
        }
    );
    for row in 0..NUM_REGISTERS / 4 {
        let mut line = String::new();
        for col in 0..4 {
            let idx = row * 4 + col;
            let reg = Register::from_index(idx).expect("register index in range");
            line.push_str(&format!("{:>4} = {:#010x}  ", reg.name(), machine.reg(reg)));
        }
        println!("{}", line.trim_end());
    }

    outcome?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_addr() {
        assert_eq!(parse_addr("0x1000").unwrap(), 0x1000);
        assert_eq!(parse_addr("4096").unwrap(), 4096);
        assert!(parse_addr("0xZZ").is_err());
        assert!(parse_addr("").is_err());
    }
}
