use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use rustyschem::model::SchematicDoc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect saved schematic documents as JSON", long_about = None)]
struct Cli {
    /// Schematic document: binary .rsch or a JSON export
    #[arg(value_name = "SCHEMATIC_FILE")]
    schematic_file: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = Utf8PathBuf::from(&cli.schematic_file);
    let doc = if path.extension() == Some("json") {
        let text = std::fs::read_to_string(&path).with_context(|| format!("Open {}", path))?;
        serde_json::from_str::<SchematicDoc>(&text)
            .with_context(|| format!("Failed to parse {}", path))?
    } else {
        SchematicDoc::load_from_binary(&path).with_context(|| format!("Failed to load {}", path))?
    };

    let json = serde_json::to_string_pretty(&doc)?;
    println!("{}", json);
    Ok(())
}
