use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Parser;

use mailarchive::{ConvertConfig, ConvertError, InputFormat, convert, init_logger, write_threads};

#[derive(Parser, Debug)]
#[command(
    name = "mailarchive",
    about = "Convert a mailing list archive into threaded JSON"
)]
struct Args {
    /// Path or http(s) URL of the archive.
    source: String,

    /// Decompress the archive with gzip before parsing.
    #[arg(long)]
    gzip: bool,

    /// Input layout (defaults to `MAILARCHIVE_FORMAT`, then mbox).
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Write the JSON here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> ConvertConfig {
        let mut config = ConvertConfig::from_env(self.source);
        config.gzip |= self.gzip;
        config.pretty |= self.pretty;
        if let Some(format) = self.format {
            config.format = format;
        }
        config.output = self.output;
        config
    }
}

async fn run(config: ConvertConfig) -> Result<(), ConvertError> {
    let outcome = convert(&config).await?;

    match &config.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| ConvertError::Io {
                path: path.display().to_string(),
                source,
            })?;
            write_threads(&outcome.threads, BufWriter::new(file), config.pretty)?;
        }
        None => write_threads(&outcome.threads, io::stdout().lock(), config.pretty)?,
    }

    let messages: usize = outcome.threads.iter().map(|t| t.messages.len()).sum();
    log::info!(
        "wrote {} threads ({} messages), {} records rejected",
        outcome.threads.len(),
        messages,
        outcome.rejected.len()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    init_logger();

    let config = Args::parse().into_config();

    if let Err(err) = run(config).await {
        log::error!("conversion failed: {}", err);
        std::process::exit(1);
    }
}
