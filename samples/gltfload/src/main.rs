use std::process::ExitCode;

use clap::Parser;

mod cli;
mod load;
mod source;

use cli::Cli;
use load::LoadedDocument;

fn report(doc: &mut LoadedDocument, quiet: bool) -> usize {
    if !quiet {
        for buffer in &doc.buffers {
            tracing::info!(
                name = buffer.name(),
                byte_length = buffer.byte_length(),
                views = buffer.view_regions().len(),
                unused_tail = buffer.remaining_bytes(),
                "buffer"
            );
        }
        for (i, view) in doc.views.iter().enumerate() {
            tracing::info!(
                index = i,
                byte_offset = view.byte_offset_in_buffer(),
                byte_length = view.byte_length(),
                target = ?view.target(),
                accessors = view.accessor_layouts().len(),
                layout = if view.is_aos() { "AoS" } else { "SoA" },
                "buffer view"
            );
        }
    }

    let mut mismatches = 0;
    for loaded in &mut doc.accessors {
        if loaded.bounds_match() {
            if !quiet {
                tracing::info!(
                    index = loaded.index,
                    name = loaded.name.as_deref(),
                    composition = %loaded.accessor.composition(),
                    component = %loaded.accessor.component(),
                    count = loaded.accessor.count(),
                    min = ?loaded.accessor.min(),
                    max = ?loaded.accessor.max(),
                    "accessor"
                );
            }
        } else {
            mismatches += 1;
            tracing::warn!(
                index = loaded.index,
                name = loaded.name.as_deref(),
                declared_min = ?loaded.declared_min,
                declared_max = ?loaded.declared_max,
                min = ?loaded.accessor.min(),
                max = ?loaded.accessor.max(),
                "declared accessor bounds disagree with its data"
            );
        }
    }
    mismatches
}

pub fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = cli.install_subscriber() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    for path in &cli.files {
        let _document = tracing::info_span!("document", path = %path.display()).entered();
        match load::load_document(path, cli.byte_align) {
            Ok(mut doc) => {
                let mismatches = report(&mut doc, cli.quiet);
                tracing::info!(
                    accessors = doc.accessors.len(),
                    mismatches,
                    "loaded document"
                );
                failed |= mismatches > 0;
            }
            Err(e) => {
                tracing::error!("failed to load document: {e}");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
