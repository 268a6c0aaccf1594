use std::io::Write;

use anyhow::Context;
use simplenote_core::{DownloadMode, IncrementalCoordinator, Note, NoteSource};
use tracing::debug;

use crate::app_config::AppConfig;

/// Print every note, and optionally its older versions newest first, to stdout.
pub fn download_all_cmd(config: &AppConfig, all_versions: bool) -> anyhow::Result<()> {
    let mut client = config.client()?;
    let notes = client
        .list()
        .with_context(|| format!("Failed to list notes of {}", display_user(config)))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for note in &notes {
        print_note(&mut out, note)?;
        if !all_versions {
            continue;
        }

        for version in (1..note.version).rev() {
            match client.get_note(&note.id, version) {
                Ok(older) => print_note(&mut out, &older)?,
                // There is no way to ask which old versions still exist.
                Err(e) => debug!(id = %note.id, version, error = %e, "skipping version"),
            }
        }
    }
    out.flush().context("Failed to write to stdout")?;

    Ok(())
}

/// Append notes (and optionally older versions) that are not yet in the
/// notes file.
pub fn download_incremental_cmd(config: &AppConfig, all_versions: bool) -> anyhow::Result<()> {
    let client = config.client()?;
    let mut coordinator = IncrementalCoordinator::open(client, &config.notes_path)
        .with_context(|| format!("Failed to load {}", config.notes_path))?;

    let mode = if all_versions {
        DownloadMode::AllVersions
    } else {
        DownloadMode::HeadsOnly
    };
    let stats = coordinator.run(mode).with_context(|| {
        format!(
            "Failed to download notes of {} into {}",
            display_user(config),
            config.notes_path
        )
    })?;

    if config.verbose {
        eprintln!(
            "{} new notes, {} older versions, {} already downloaded, {} versions unavailable",
            stats.heads_written, stats.versions_written, stats.skipped, stats.failed_versions
        );
    }

    Ok(())
}

fn print_note(out: &mut impl Write, note: &Note) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, note).context("Failed to serialize note")?;
    writeln!(out).context("Failed to write to stdout")?;
    Ok(())
}

fn display_user(config: &AppConfig) -> &str {
    config.username.as_deref().unwrap_or("<unknown user>")
}
