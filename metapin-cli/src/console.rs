//! Human-facing output.

use std::fmt::Display;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use metapin_core::types::ContentId;
use metapin_publish::{ProgressCallback, PublishEvent};

const RULE: &str = "--------------------------------------------------------------------------";

/// Prints task progress to stdout, or nothing when quiet.
#[derive(Clone, Copy, Debug, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    /// A console that prints unless `quiet`.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// A console that prints nothing.
    pub fn quiet() -> Self {
        Self::new(true)
    }

    pub fn rule(&self) {
        if !self.quiet {
            println!("{}", RULE.dimmed());
        }
    }

    pub fn line(&self, text: impl Display) {
        if !self.quiet {
            println!("{text}");
        }
    }

    /// Reports a finished upload.
    pub fn uploaded(&self, path: &str, cid: &ContentId, gateway: Option<String>) {
        self.line(format!("{} {} ({})", "Uploaded".green(), path, cid.to_string().cyan()));
        if let Some(link) = gateway {
            self.line(format!("   {} {}", "Gateway:".dimmed(), link));
        }
    }

    /// A progress bar, hidden when quiet.
    pub fn progress_bar(&self, len: u64) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("  [{bar:40.cyan/blue}] {pos}/{len}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }

    /// Progress trace for a placeholder publish.
    pub fn placeholder_progress(&self) -> ProgressCallback {
        let console = *self;
        let bar = self.progress_bar(0);

        Box::new(move |event: &PublishEvent| match event {
            PublishEvent::ImagesCounted { count } => {
                console.rule();
                console.line(
                    format!("Preparing {count} placeholders for the pre-reveal stage:")
                        .cyan()
                        .bold(),
                );
                bar.set_length(*count);
            }
            PublishEvent::ImageUploaded { cid } => {
                console.line(format!("  {} {}", "Placeholder image:".yellow(), cid.to_uri()));
            }
            PublishEvent::MetadataUploaded { .. } => bar.inc(1),
            PublishEvent::DirectoryResolved { cid } => {
                bar.finish_and_clear();
                console.line(format!("  Uploading metadata: {}", "DONE".green()));
                console.line(format!("  {} {}", "baseTokenURI:".yellow(), cid.to_uri()));
                console.rule();
            }
        })
    }
}
