use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use image::RgbaImage;

use snapmark::render::text::{FixedAdvanceText, GlyphTextEngine, TextEngine};
use snapmark::{EditorConfig, EditorEvent, EditorHost, EditorSession, FinishAction};

#[derive(Parser, Debug)]
#[command(
    name = "snapmark",
    version,
    about = "Replay an annotation event script over a screenshot and save the result"
)]
struct Cli {
    /// Image to annotate
    input: PathBuf,
    /// JSON array of editor events
    events: PathBuf,
    /// Output PNG; defaults to a timestamped file in the pictures directory
    output: Option<PathBuf>,
}

/// Writes the finished image to disk
struct FileHost {
    path: PathBuf,
    result: Option<anyhow::Result<()>>,
    cancelled: bool,
}

impl EditorHost for FileHost {
    fn finished(&mut self, image: RgbaImage, action: FinishAction) {
        if action != FinishAction::Save {
            log::info!("{:?} is handled by the desktop host, saving instead", action);
        }
        let saved = image
            .save(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()));
        self.result = Some(saved);
    }

    fn cancelled(&mut self) {
        log::info!("Edit cancelled, nothing written");
        self.cancelled = true;
    }
}

fn default_output_path() -> Option<PathBuf> {
    let mut path =
        dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))?;
    let name = chrono::Local::now()
        .format("Snapmark_%Y-%m-%d_%H-%M-%S.png")
        .to_string();
    path.push(name);
    Some(path)
}

fn text_engine(config: &EditorConfig) -> Box<dyn TextEngine> {
    let Some(font_path) = &config.font_path else {
        log::warn!("No font_path configured, text will not be drawn");
        return Box::new(FixedAdvanceText);
    };
    match GlyphTextEngine::from_path(font_path) {
        Ok(engine) => Box::new(engine),
        Err(err) => {
            log::warn!("Failed to load font {}: {}", font_path.display(), err);
            Box::new(FixedAdvanceText)
        }
    }
}

fn load_events(path: &Path) -> anyhow::Result<Vec<EditorEvent>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("invalid event script {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Cli {
        input,
        events,
        output,
    } = Cli::parse();
    let output = match output {
        Some(path) => path,
        None => default_output_path().context("no pictures directory for the output")?,
    };

    let base = image::open(&input)
        .with_context(|| format!("failed to open {}", input.display()))?
        .to_rgba8();
    let config = EditorConfig::load();
    let mut session = EditorSession::new(base, &config, text_engine(&config))?;
    let mut host = FileHost {
        path: output,
        result: None,
        cancelled: false,
    };

    let events = load_events(&events)?;
    log::debug!("Replaying {} event(s)", events.len());
    for event in events {
        session.handle(event, &mut host);
    }
    // Scripts without an explicit finish still produce an image
    if host.result.is_none() && !host.cancelled {
        session.handle(EditorEvent::Finish(FinishAction::Save), &mut host);
    }

    match host.result {
        Some(result) => {
            result?;
            println!("{}", host.path.display());
        }
        None => log::info!("No image written"),
    }
    Ok(())
}
