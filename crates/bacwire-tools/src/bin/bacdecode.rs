use std::io::BufRead;

use bacwire_tools::{dissect, parse_hex, Dissection, Framing};
use clap::Parser;

/// Decodes captured BACnet frames down to the service arguments.
#[derive(Parser, Debug)]
#[command(name = "bacdecode")]
struct Args {
    /// Frame as hex. Without it, every non-empty stdin line is one frame.
    hex: Option<String>,
    #[arg(long, value_enum, default_value_t = Framing::Auto)]
    framing: Framing,
    /// Print JSON instead of the debug tree.
    #[arg(long)]
    json: bool,
}

fn print(dissection: &Dissection, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(dissection)?);
    } else {
        println!("{dissection:#?}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let frames = match args.hex {
        Some(hex) => vec![hex],
        None => std::io::stdin()
            .lock()
            .lines()
            .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let mut failed = false;
    for text in &frames {
        match parse_hex(text).and_then(|bytes| dissect(&bytes, args.framing)) {
            Ok(dissection) => print(&dissection, args.json)?,
            Err(e) => {
                eprintln!("decode failed: {e}");
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
