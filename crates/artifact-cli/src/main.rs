use anyhow::{bail, Context};
use artifact_codegen::{emitter_for, generate_code, EmitOptions, DEFAULT_COMPONENT_NAME};
use artifact_core::{
    build_component_tree_from_value, ComponentNode, Config, Framework, GenerationRequest,
    SnapshotKey, SnapshotStore,
};
use artifact_llm::providers::common::openai_compat::parse_json_content;
use artifact_llm::{
    ArtifactPipeline, CreateOptions, CredentialSource, ProviderKind, UnifiedProvider,
    PROVIDER_PRIORITY,
};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use futures::StreamExt;
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "artifact-studio")]
#[command(about = "Generate UI components from natural-language prompts")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, short, global = true, default_value = "false")]
    debug: bool,

    /// Snapshot directory (overrides the configured one)
    #[arg(long, global = true, env = "ARTIFACT_STUDIO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which AI providers have credentials
    Providers,
    /// Generate a component from a prompt
    Generate(GenerateArgs),
    /// Emit code for the saved canvas or a JSON file
    Export(ExportArgs),
    /// Run the HTTP API
    Serve {
        /// Server port
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
}

#[derive(Args)]
struct EmitArgs {
    /// Name of the exported component
    #[arg(long, default_value = DEFAULT_COMPONENT_NAME)]
    name: String,

    /// State variable as NAME=JSON (repeatable)
    #[arg(long = "state", value_name = "NAME=VALUE")]
    state: Vec<String>,

    /// Data binding fetched on mount as NAME=URL (repeatable)
    #[arg(long = "bind", value_name = "NAME=URL")]
    bind: Vec<String>,
}

#[derive(Args)]
struct GenerateArgs {
    /// What to build
    prompt: String,

    #[arg(long, short)]
    framework: Option<String>,

    #[arg(long)]
    styling: Option<String>,

    #[arg(long)]
    interactivity: Option<String>,

    #[arg(long)]
    theme: Option<String>,

    /// Provider to try first (openrouter, aiml, openai)
    #[arg(long)]
    provider: Option<String>,

    /// Stream tokens through OpenRouter
    #[arg(long, conflicts_with = "provider")]
    stream: bool,

    /// Write the code to this file instead of stdout
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Save the result as the canvas snapshot
    #[arg(long)]
    save: bool,

    #[command(flatten)]
    emit: EmitArgs,
}

#[derive(Args)]
struct ExportArgs {
    /// JSON file holding a component list or a raw AI response.
    /// Defaults to the saved canvas.
    #[arg(long, short)]
    input: Option<PathBuf>,

    #[arg(long, short, default_value = "react")]
    framework: String,

    /// Write the code to this file instead of stdout
    #[arg(long, short)]
    out: Option<PathBuf>,

    #[command(flatten)]
    emit: EmitArgs,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.debug {
        artifact_server::logging::init_logging(true);
        eprintln!("{}", "[DEBUG] Debug mode enabled".dimmed());
    }

    let mut config = Config::load();
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = Some(dir);
    }
    let credentials = CredentialSource::from_env();

    match cli.command {
        Commands::Providers => {
            list_providers(&credentials);
            Ok(())
        }
        Commands::Generate(args) => generate(args, &config, &credentials, cli.debug).await,
        Commands::Export(args) => export(args, &config).await,
        Commands::Serve { port } => {
            if !cli.debug {
                artifact_server::logging::init_logging(false);
            }
            if let Some(port) = port {
                config.port = port;
            }
            artifact_server::run_server(config).await?;
            Ok(())
        }
    }
}

fn list_providers(credentials: &CredentialSource) {
    println!("{}", "AI providers (priority order):".bold());
    for kind in PROVIDER_PRIORITY {
        let status = if credentials.is_available(kind) {
            "available".green()
        } else {
            "missing key".red()
        };
        println!(
            "  {:<12} {:<12} {}",
            kind.as_str(),
            status,
            kind.api_key_var().dimmed()
        );
    }
}

async fn generate(
    args: GenerateArgs,
    config: &Config,
    credentials: &CredentialSource,
    debug: bool,
) -> anyhow::Result<()> {
    let request = GenerationRequest::from_parts(
        &args.prompt,
        args.framework.as_deref(),
        args.styling.as_deref(),
        args.interactivity.as_deref(),
        args.theme.as_deref(),
    )?;
    let create = CreateOptions {
        provider: args
            .provider
            .as_deref()
            .map(str::parse::<ProviderKind>)
            .transpose()?,
    };
    let emit = emit_options(&args.emit)?;
    let pipeline = ArtifactPipeline::new(UnifiedProvider::from_config(config, credentials));

    if debug {
        eprintln!(
            "{}",
            format!("[DEBUG] Request: {:?}, preferred provider: {:?}", request, create.provider)
                .dimmed()
        );
    }

    let started = Instant::now();
    let (provider, components, code) = if args.stream {
        stream_generate(&pipeline, &request, &emit).await?
    } else {
        let artifact = pipeline.generate(&request, &create, &emit).await?;
        for attempt in &artifact.failed_attempts {
            eprintln!(
                "{} {}: {}",
                "[fallback]".yellow(),
                attempt.provider.as_str(),
                attempt.error
            );
        }
        (artifact.provider, artifact.components, artifact.code)
    };

    eprintln!(
        "{} {} root component(s) via {} in {:.1}s",
        "✓".green(),
        components.len(),
        provider.as_str().cyan(),
        started.elapsed().as_secs_f64()
    );

    if args.save {
        let store = SnapshotStore::new(config.snapshot_dir());
        store.save(SnapshotKey::Canvas, &components).await?;
        eprintln!("{}", format!("Saved canvas to {}", store.base_path().display()).dimmed());
    }

    write_output(&code, args.out.as_deref())
}

/// OpenRouter streamed path: tokens go to stderr as they arrive.
async fn stream_generate(
    pipeline: &ArtifactPipeline,
    request: &GenerationRequest,
    emit: &EmitOptions,
) -> anyhow::Result<(ProviderKind, Vec<ComponentNode>, String)> {
    let Some(provider) = pipeline
        .provider()
        .provider(ProviderKind::OpenRouter)
        .filter(|p| p.is_configured())
    else {
        bail!(
            "--stream needs {} to be set",
            ProviderKind::OpenRouter.api_key_var()
        );
    };

    let mut deltas = provider.generate_stream(request).await?;
    let mut text = String::new();
    let mut stderr = io::stderr();
    while let Some(delta) = deltas.next().await {
        let delta = delta?;
        write!(stderr, "{}", delta.dimmed())?;
        stderr.flush()?;
        text.push_str(&delta);
    }
    writeln!(stderr)?;

    let value = parse_json_content(ProviderKind::OpenRouter, &text)?;
    let components = build_component_tree_from_value(&value);
    let code = generate_code(request.framework, &components, emit);
    Ok((ProviderKind::OpenRouter, components, code))
}

async fn export(args: ExportArgs, config: &Config) -> anyhow::Result<()> {
    let framework: Framework = args.framework.parse()?;
    let emit = emit_options(&args.emit)?;

    let components = match &args.input {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", path.display()))?;
            forest_from_value(value)?
        }
        None => {
            let store = SnapshotStore::new(config.snapshot_dir());
            match store.load::<Vec<ComponentNode>>(SnapshotKey::Canvas).await? {
                Some(components) => components,
                None => bail!(
                    "no saved canvas in {}; pass --input or run `generate --save` first",
                    store.base_path().display()
                ),
            }
        }
    };

    let code = emitter_for(framework).emit(&components, &emit);
    write_output(&code, args.out.as_deref())
}

/// Accept either a component list or a raw `{components, layout, componentDetails}` response.
fn forest_from_value(value: Value) -> anyhow::Result<Vec<ComponentNode>> {
    match value {
        Value::Array(_) => {
            serde_json::from_value(value).context("input is not a valid component list")
        }
        Value::Object(_) => Ok(build_component_tree_from_value(&value)),
        _ => bail!("input must be a component list or an AI response object"),
    }
}

fn parse_pair(raw: &str) -> anyhow::Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => bail!("expected NAME=VALUE, got '{}'", raw),
    }
}

fn emit_options(args: &EmitArgs) -> anyhow::Result<EmitOptions> {
    let mut options = EmitOptions::new().with_component_name(args.name.clone());
    for raw in &args.state {
        let (name, value) = parse_pair(raw)?;
        // Plain words are taken as strings.
        let initial = serde_json::from_str::<Value>(&value).unwrap_or(Value::String(value));
        options = options.with_state(name, initial);
    }
    for raw in &args.bind {
        let (name, url) = parse_pair(raw)?;
        options = options.with_data_binding(name, url);
    }
    Ok(options)
}

fn write_output(code: &str, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, code)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} {}", "Wrote".green(), path.display());
        }
        None => print!("{code}"),
    }
    Ok(())
}
