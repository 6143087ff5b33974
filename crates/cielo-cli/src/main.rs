mod error;

use std::path::{Path, PathBuf};

use cielo_common::Config;
use cielo_common::telemetry::{self, TelemetryConfig};
use cielo_editor_core::{EditorMode, EditorRegistry, FormId, Markup, RichTextEditor};
use cielo_media::{
    GalleryBrowser, HttpMediaBackend, ImageCard, MediaBackend, MediaInsertionPanel,
    PaginationControl, PhotoRecord, UploadFile, author_options,
};
use clap::{Parser, Subcommand};
use miette::Result;

use crate::error::CieloError;

#[derive(Parser)]
#[command(version, about = "Cielo - media and editor tools for the association site", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, value_name = "FILE", env = "CIELO_CONFIG", default_value = cielo_common::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Uploaded images on the site
    Media {
        #[command(subcommand)]
        command: MediaCommands,
    },
    /// Filter an exported photo list the way the gallery page does
    Gallery {
        /// JSON array of photo documents
        photos: PathBuf,

        #[arg(long, default_value = "all")]
        author: String,

        /// Date prefix, e.g. 2024 or 2024-03
        #[arg(long, default_value = "")]
        date: String,

        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
    },
    /// Insert uploaded images into an HTML document
    Compose {
        document: PathBuf,

        #[arg(long)]
        scope: Option<String>,

        /// Insert through the raw source surface
        #[arg(long)]
        raw: bool,

        /// Image URL to insert, in order (repeatable)
        #[arg(long = "select", value_name = "URL")]
        select: Vec<String>,
    },
}

#[derive(Subcommand)]
enum MediaCommands {
    /// Print a scope's image URLs
    List { scope: Option<String> },
    /// Upload files and print the updated list
    Upload {
        #[arg(long)]
        scope: Option<String>,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();
    dotenvy::dotenv().ok();
    telemetry::init(TelemetryConfig::from_env("cielo"));

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Media { command } => match command {
            MediaCommands::List { scope } => list_media(&config, scope.as_deref()).await?,
            MediaCommands::Upload { scope, files } => {
                upload_media(&config, scope.as_deref(), &files).await?
            }
        },
        Commands::Gallery {
            photos,
            author,
            date,
            page,
        } => show_gallery(&photos, &author, &date, page)?,
        Commands::Compose {
            document,
            scope,
            raw,
            select,
        } => compose(&config, &document, scope.as_deref(), raw, &select).await?,
    }

    Ok(())
}

fn backend(config: &Config) -> Result<HttpMediaBackend, CieloError> {
    let backend = HttpMediaBackend::new(&config.site.base_url)?;
    Ok(match &config.site.session_cookie {
        Some(cookie) if !cookie.is_empty() => backend.with_session(cookie),
        _ => backend,
    })
}

async fn list_media(config: &Config, scope: Option<&str>) -> Result<()> {
    let scope = config.scope(scope)?;
    let images = backend(config)?.list(&scope).await?;
    for url in &images {
        println!("{url}");
    }
    tracing::info!(%scope, count = images.len(), "listed media");
    Ok(())
}

async fn upload_media(config: &Config, scope: Option<&str>, paths: &[PathBuf]) -> Result<()> {
    let scope = config.scope(scope)?;
    let files = paths
        .iter()
        .map(UploadFile::from_path)
        .collect::<Result<Vec<_>, _>>()?;
    let images = backend(config)?.upload(&scope, &files).await?;
    println!("✓ Uploaded {} files to {scope}", files.len());
    for url in &images {
        println!("{url}");
    }
    Ok(())
}

fn show_gallery(photos: &Path, author: &str, date: &str, page: i64) -> Result<()> {
    let raw = std::fs::read_to_string(photos).map_err(|source| CieloError::Io {
        path: photos.to_owned(),
        source,
    })?;
    let records: Vec<PhotoRecord> =
        serde_json::from_str(&raw).map_err(|source| CieloError::Json {
            path: photos.to_owned(),
            source,
        })?;

    let cards: Vec<ImageCard> = records.iter().map(ImageCard::from_record).collect();
    let authors = author_options(&cards);
    let mut gallery = GalleryBrowser::new(cards);
    gallery.set_author(author);
    gallery.set_date(date);
    gallery.go_to_page(page);

    println!("Autores: {}", authors.join(", "));
    for card in gallery.visible_cards() {
        println!("{}\t{}\t{}", card.display_date, card.author, card.image_url);
    }
    println!(
        "{} de {} fotos",
        gallery.visible_cards().count(),
        gallery.match_count()
    );
    if let PaginationControl::Buttons(buttons) = gallery.control() {
        let pager: Vec<String> = buttons
            .iter()
            .map(|b| match b.active {
                true => format!("[{}]", b.page),
                false => b.page.to_string(),
            })
            .collect();
        println!("{}", pager.join(" "));
    }
    Ok(())
}

async fn compose(
    config: &Config,
    document: &Path,
    scope: Option<&str>,
    raw: bool,
    select: &[String],
) -> Result<()> {
    let scope = config.scope(scope)?;
    let html = std::fs::read_to_string(document).map_err(|source| CieloError::Io {
        path: document.to_owned(),
        source,
    })?;
    if let Err(issue) = Markup::parse_strict(&html) {
        let report = miette::Report::new(issue).with_source_code(miette::NamedSource::new(
            document.display().to_string(),
            html.clone(),
        ));
        eprintln!("{report:?}");
    }

    let form = FormId::new(document.display().to_string());
    let mut editors = EditorRegistry::new();
    let mut editor = RichTextEditor::new(&html).with_insertion(config.editor.insertion);
    if raw {
        editor.set_mode(EditorMode::Raw);
    }
    editors.register(form.clone(), editor);

    let mut panel = MediaInsertionPanel::new(backend(config)?, scope, form.clone());
    panel.toggle_panel().await;
    if !panel.is_loaded() {
        return Err(miette::miette!(
            help = "check [site] base_url and session_cookie",
            "could not list images for scope `{}`",
            panel.scope()
        ));
    }
    for url in select {
        if !panel.select(url) {
            tracing::warn!(%url, "not listed in scope, skipping");
        }
    }
    if !panel.confirm_insert(&mut editors) {
        println!("Nothing inserted");
        return Ok(());
    }

    let Some(editor) = editors.get_mut(&form) else {
        return Ok(());
    };
    let submitted = editor.submit().to_owned();
    std::fs::write(document, &submitted).map_err(|source| CieloError::Io {
        path: document.to_owned(),
        source,
    })?;
    println!("✓ Wrote {}", document.display());
    Ok(())
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
