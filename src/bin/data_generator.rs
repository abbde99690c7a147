use clap::Parser;
use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

const SITES: [&str; 6] = [
    "Bahía Norte",
    "Bahía Sur",
    "Estero Real",
    "Laguna Azul",
    "Punta Arenas",
    "Río Bravo",
];

/// Writes a synthetic monitoring CSV for trying out sheet-analyzer.
#[derive(Parser)]
struct Args {
    /// Output file
    #[arg(default_value = "data/monitoreo.csv")]
    path: PathBuf,

    /// Number of data rows
    #[arg(long, default_value_t = 100_000)]
    rows: usize,

    /// Share of depth cells left blank
    #[arg(long, default_value_t = 0.02)]
    missing: f64,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    if let Some(dir) = args.path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let file = File::create(&args.path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "Localización,Profundidad (m),Año de Monitoreo")?;

    let mut rng = rand::rng();
    for _ in 0..args.rows {
        let site = SITES[rng.random_range(0..SITES.len())];
        let year = rng.random_range(2015..=2024);
        if rng.random_bool(args.missing.clamp(0.0, 1.0)) {
            writeln!(writer, "\"{}\",,{}", site, year)?;
        } else {
            let depth: f64 = rng.random_range(0.5..40.0);
            writeln!(writer, "\"{}\",{:.2},{}", site, depth, year)?;
        }
    }
    writer.flush()?;

    println!("Sample CSV generated: {}", args.path.display());
    Ok(())
}
