use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing::Subscriber;
use tracing_subscriber::{Layer, filter::LevelFilter, fmt, prelude::*, registry::LookupSpan};

/// Console verbosity: `-q` silences everything, and each `-v` opens one more level below WARN.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Plain-text layer behind `--log-file`. Events carry their target and thread so warnings from
/// the core readers and the parallel input passes can be told apart.
fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let file_layer = log_file.map(File::create).transpose()?.map(file_layer);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Other(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use solvachrom::core::diagnostics::Diagnostics;
    use solvachrom::core::io::ligpargen::DefensivePdbReader;
    use solvachrom::core::io::pdb::PdbFile;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::sync::Once;
    use tracing::{debug, error, info, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_level() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!("This is a warning");
        info!("This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    #[serial]
    fn file_layer_records_core_reader_warnings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("run.log");
        let subscriber = tracing_subscriber::registry()
            .with(level_filter(0, false))
            .with(file_layer(File::create(&log_path).unwrap()));

        let diagnostics = Diagnostics::new();
        let molecule = tracing::subscriber::with_default(subscriber, || {
            DefensivePdbReader::<PdbFile>::new(&diagnostics).read_from(&mut Cursor::new(
                "REMARK LIGPARGEN GENERATED PDB\nATOM 1 C00 UNK ? 0.0 0.0 0.0\n",
            ))
        })
        .unwrap();
        assert_eq!(molecule.atoms()[0].mol_id, 1);

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Couldn't obtain MolID for an atom in a LigParGen PDB"));
        assert!(content.contains("WARN"));
        assert!(content.contains("solvachrom::core::diagnostics"));
        assert!(content.contains("ThreadId"));
        // The debug line about recovery parsing is below the default level.
        assert!(!content.contains("DEBUG"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(&invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
