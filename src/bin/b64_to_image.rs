use clap::Parser;
use codefix::utils::logger;
use codefix::utils::validation::{validate_non_empty_string, validate_path};
use codefix::{Engine, FixError, ImagePipeline, LocalStorage, DEFAULT_DATA_KEY};

#[derive(Parser)]
#[command(name = "b64-to-image")]
#[command(about = "Decode a Base64 image field from a JSON document into a file")]
struct Args {
    /// JSON document holding the encoded image
    #[arg(short, long, default_value = "response.json")]
    input: String,

    /// Where to write the decoded image
    #[arg(short, long, default_value = "output.png")]
    output: String,

    /// JSON field holding the Base64 payload
    #[arg(short, long, default_value = DEFAULT_DATA_KEY)]
    key: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn validate(args: &Args) -> Result<(), FixError> {
    validate_path("input", &args.input)?;
    validate_path("output", &args.output)?;
    validate_non_empty_string("key", &args.key)
}

fn report(e: &FixError) -> ! {
    tracing::error!(
        "❌ Image extraction failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    if let Err(e) = validate(&args) {
        report(&e);
    }

    tracing::info!("📁 Reading {} (field '{}')", args.input, args.key);

    let pipeline = ImagePipeline::new(LocalStorage::default(), &args.input, &args.output, &args.key);
    let engine = Engine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            println!(
                "✅ Image saved to {} ({} bytes)",
                summary.output_path, summary.bytes_written
            );
            Ok(())
        }
        Err(e) => report(&e),
    }
}
