use std::{
    fs::File,
    io::{self, Write as _},
    path::Path,
};

use anyhow::Context;
use blockfall_engine::EngineConfig;

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read engine configuration from a JSON file
///
/// # Errors
///
/// Returns error if file cannot be opened or parsed
pub fn read_config_file<P>(path: P) -> anyhow::Result<EngineConfig>
where
    P: AsRef<Path>,
{
    read_json_file("engine config", path)
}

/// Writes `value` to stdout as one JSON document followed by a newline.
pub fn print_json<T>(value: &T, pretty: bool) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let mut stdout = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)
    } else {
        serde_json::to_writer(&mut stdout, value)
    }
    .context("Failed to write JSON to stdout")?;
    writeln!(stdout).context("Failed to write newline after JSON to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(format!("blockfall-{}-{name}", process::id()))
    }

    #[test]
    fn test_read_config_file_keeps_defaults() {
        let path = temp_path("partial.json");
        fs::write(&path, r#"{ "rows": 24, "generator": "bag" }"#).unwrap();
        let config = read_config_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.rows, 24);
        assert_eq!(config.cols, EngineConfig::default().cols);
    }

    #[test]
    fn test_read_config_file_reports_path() {
        let path = temp_path("missing.json");
        let err = read_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("engine config"));
        assert!(err.to_string().contains("missing.json"));

        let path = temp_path("broken.json");
        fs::write(&path, "{ cols: ").unwrap();
        let err = read_config_file(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
