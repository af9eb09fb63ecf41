//! Subcommand implementations.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use deck_core::{file_io, DocumentStore, EditorConfig, Presentation};
use deck_renderer::{
    DeckProjection, DeckWriter, ExportConfig, JsonDeckWriter, RasterFormat, SlideExporter,
};

use crate::{CliArgs, Command};

/// Run a parsed command line.
///
/// # Errors
///
/// Returns an error if the subcommand fails.
pub fn run(args: &CliArgs) -> anyhow::Result<()> {
    match &args.command {
        Command::New { out, title } => {
            let presentation = new_presentation(out, title.as_deref(), EditorConfig::from(args))?;
            println!("Created {} ({})", out.display(), presentation.id());
        }
        Command::Info { file } => {
            println!("{}", info(file)?);
        }
        Command::ExportImage {
            file,
            slide,
            format,
            out,
        } => {
            export_image(file, *slide, (*format).into(), out, ExportConfig::from(args))?;
            println!("Wrote {}", out.display());
        }
        Command::ExportDeck { file, out } => {
            export_deck(file, out)?;
            println!("Wrote {}", out.display());
        }
    }
    Ok(())
}

/// Create a presentation with one empty slide and save it.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn new_presentation(
    out: &Path,
    title: Option<&str>,
    config: EditorConfig,
) -> anyhow::Result<Presentation> {
    let mut store = DocumentStore::with_config(config);
    store.create_presentation();
    if let Some(title) = title {
        store.rename_presentation(title);
    }

    let presentation = store
        .presentation()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No presentation was created"))?;
    file_io::save_to_path(&presentation, out)
        .with_context(|| format!("Failed to create {}", out.display()))?;
    Ok(presentation)
}

/// Summary of a presentation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationInfo {
    /// Presentation title.
    pub title: String,
    /// Slide titles with their element counts.
    pub slides: Vec<(String, usize)>,
    /// Position of the active slide.
    pub active_index: usize,
}

impl fmt::Display for PresentationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for (index, (title, elements)) in self.slides.iter().enumerate() {
            let marker = if index == self.active_index { '*' } else { ' ' };
            write!(f, "{marker} {:>3}. {title} ({elements} elements)", index + 1)?;
            if index + 1 < self.slides.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Read and summarize a presentation file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid presentation.
pub fn info(file: &Path) -> anyhow::Result<PresentationInfo> {
    let presentation = load(file)?;
    let active_index = presentation
        .slide_index(presentation.active_slide_id())
        .unwrap_or_default();
    Ok(PresentationInfo {
        title: presentation.title().to_string(),
        slides: presentation
            .slides()
            .iter()
            .map(|s| (s.title.clone(), s.element_count()))
            .collect(),
        active_index,
    })
}

/// Render one slide to an image file.
///
/// `slide` counts from 1; `None` selects the active slide.
///
/// # Errors
///
/// Returns an error if the slide does not exist or export fails.
pub fn export_image(
    file: &Path,
    slide: Option<usize>,
    format: RasterFormat,
    out: &Path,
    config: ExportConfig,
) -> anyhow::Result<()> {
    let presentation = load(file)?;
    let target = match slide {
        Some(number) => number
            .checked_sub(1)
            .and_then(|index| presentation.slides().get(index))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Slide {number} does not exist ({} slides)",
                    presentation.slide_count()
                )
            })?,
        None => presentation
            .active_slide()
            .ok_or_else(|| anyhow::anyhow!("Presentation has no active slide"))?,
    };

    let bytes = SlideExporter::new(config)
        .export(target, format)
        .context("Failed to render slide")?;
    std::fs::write(out, &bytes).with_context(|| format!("Failed to write {}", out.display()))?;
    tracing::info!(
        slide = %target.id(),
        format = format.extension(),
        bytes = bytes.len(),
        "Exported slide"
    );
    Ok(())
}

/// Write the presentation-file projection of every slide.
///
/// # Errors
///
/// Returns an error if the presentation cannot be read or the output written.
pub fn export_deck(file: &Path, out: &Path) -> anyhow::Result<()> {
    let presentation = load(file)?;
    let deck = DeckProjection::from_presentation(&presentation);
    JsonDeckWriter
        .write_to_path(&deck, out)
        .with_context(|| format!("Failed to write {}", out.display()))
}

fn load(file: &Path) -> anyhow::Result<Presentation> {
    file_io::load_from_path(file).with_context(|| format!("Failed to open {}", file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Bounds, Element};

    fn write_sample(dir: &Path) -> std::path::PathBuf {
        let mut store = DocumentStore::new();
        store.create_presentation();
        store.rename_presentation("Sample");
        store.add_element(Element::text("Hello", 24.0, Bounds::new(10.0, 10.0, 200.0, 40.0)));
        store.add_slide();
        let path = dir.join("sample.json");
        let presentation = store.presentation().expect("presentation");
        file_io::save_to_path(presentation, &path).expect("save");
        path
    }

    #[test]
    fn test_new_presentation_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("talk.json");

        let created =
            new_presentation(&out, Some("Launch plan"), EditorConfig::default()).expect("new");
        assert_eq!(created.title(), "Launch plan");

        let summary = info(&out).expect("info");
        assert_eq!(summary.title, "Launch plan");
        assert_eq!(summary.slides, vec![("Slide 1".to_string(), 0)]);
    }

    #[test]
    fn test_info_marks_active_slide() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_sample(dir.path());

        let summary = info(&path).expect("info");
        assert_eq!(summary.slides.len(), 2);
        assert_eq!(summary.slides[0].1, 1);
        assert_eq!(summary.active_index, 1);
        assert!(summary.to_string().contains("*   2. Slide 2"));
    }

    #[test]
    fn test_export_image_rejects_unknown_slide() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_sample(dir.path());
        let out = dir.path().join("out.png");

        let config = ExportConfig::for_canvas(32, 18);
        assert!(export_image(&path, Some(3), RasterFormat::Png, &out, config.clone()).is_err());
        assert!(export_image(&path, Some(0), RasterFormat::Png, &out, config.clone()).is_err());

        export_image(&path, Some(1), RasterFormat::Png, &out, config).expect("export");
        assert!(std::fs::metadata(&out).expect("written").len() > 0);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"slides\": []}").expect("write");

        let err = info(&path).expect_err("invalid");
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_export_deck() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_sample(dir.path());
        let out = dir.path().join("deck.json");

        export_deck(&path, &out).expect("export");
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).expect("read")).expect("json");
        assert_eq!(value["slides"].as_array().map(Vec::len), Some(2));
    }
}
