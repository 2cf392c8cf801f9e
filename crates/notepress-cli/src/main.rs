use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use notepress_client::{HttpClient, NoteImageUploader, PublishRequest, Publisher, Session};
use notepress_config::Config;
use notepress_engine::{
    CompileOptions, Document, ImageBridge, LocalImageBridge, ParseResult, compile_with,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "notepress", version, about = "Compile markdown into note.com HTML and publish it")]
#[command(propagate_version = true)]
struct Cli {
    /// Config file to use instead of ~/.config/notepress/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the compiled free/pay HTML as JSON
    Compile {
        markdown: PathBuf,

        /// Check images exist locally instead of uploading them
        #[arg(long)]
        offline: bool,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Create a note from a markdown file, as a draft unless --publish is given
    Publish {
        markdown: PathBuf,

        #[arg(long)]
        title: String,

        /// Header image
        #[arg(long)]
        eyecatch: Option<PathBuf>,

        /// Repeatable; a leading '#' is added when missing
        #[arg(long = "hashtag")]
        hashtags: Vec<String>,

        /// Price in yen; above zero the part after <pay> is paywalled
        #[arg(long, default_value_t = 0)]
        price: u32,

        /// Magazine key, repeatable
        #[arg(long = "magazine")]
        magazines: Vec<String>,

        #[arg(long)]
        publish: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    match cli.command {
        Commands::Compile {
            markdown,
            offline,
            pretty,
        } => {
            let result = if offline {
                let config = Config::load_from_path(&config_path)?;
                compile_offline(&markdown, config.as_ref())?
            } else {
                let config = require_config(&config_path)?;
                compile_online(&markdown, &config)?
            };
            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{json}");
        }
        Commands::Publish {
            markdown,
            title,
            eyecatch,
            hashtags,
            price,
            magazines,
            publish,
        } => {
            let config = require_config(&config_path)?;
            let request = PublishRequest {
                markdown,
                title,
                eyecatch,
                hashtags,
                price,
                magazines,
                publish,
            };
            let (http, session) = connect(&config)?;
            let publisher = Publisher::new(http, session, config.user_urlname.clone())
                .with_options(compile_options(Some(&config)));
            let outcome = publisher.publish(&request)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}

fn require_config(config_path: &Path) -> Result<Config> {
    match Config::load_from_path(config_path)? {
        Some(config) => Ok(config),
        None => bail!(
            "No config file found at {}; create one containing at least user_urlname = \"<your note id>\"",
            config_path.display()
        ),
    }
}

fn compile_options(config: Option<&Config>) -> CompileOptions {
    match config {
        Some(config) => CompileOptions {
            toc_label: config.toc_label.clone(),
        },
        None => CompileOptions::default(),
    }
}

fn connect(config: &Config) -> Result<(HttpClient, Session)> {
    let session = Session::load(&config.session_file).with_context(|| {
        format!(
            "Log in to note.com in a browser and save the cookies to {}",
            config.session_file.display()
        )
    })?;
    let mut http = HttpClient::new(config.user_agent.as_deref())?;
    http.set_cookies(&session.cookies);
    Ok((http, session))
}

fn compile_offline(markdown: &Path, config: Option<&Config>) -> Result<ParseResult> {
    let doc = Document::load(markdown)?;
    let mut bridge = match doc.base_dir() {
        Some(dir) => LocalImageBridge::with_base_dir(dir),
        None => LocalImageBridge::default(),
    };
    compile_document(&doc, &mut bridge, config)
}

fn compile_online(markdown: &Path, config: &Config) -> Result<ParseResult> {
    let doc = Document::load(markdown)?;
    let (http, session) = connect(config)?;
    session.validate(&http)?;
    let mut uploader = NoteImageUploader::new(&http).with_base_dir(doc.base_dir());
    compile_document(&doc, &mut uploader, Some(config))
}

fn compile_document(
    doc: &Document,
    bridge: &mut dyn ImageBridge,
    config: Option<&Config>,
) -> Result<ParseResult> {
    let result = compile_with(doc, bridge, compile_options(config))?;
    if result.has_pay() {
        log::info!("Paywall split found in {}", doc.path().display());
    }
    Ok(result)
}
