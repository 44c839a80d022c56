use std::{
    fs::{File, OpenOptions},
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;

/// Writes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn save_json<T>(file_kind: &str, path: Option<&Path>, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let (mut writer, target): (Box<dyn Write>, _) = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {file_kind} file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_owned()),
    };
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {file_kind} to {target}"))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush {file_kind} to {target}"))?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} file: {}", path.display()))
}

/// Appends `value` as one compact JSON line, creating the file if needed.
pub fn append_json_line<T, P>(file_kind: &str, path: P, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .with_context(|| format!("Failed to write {} record to {}", file_kind, path.display()))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write {} file: {}", file_kind, path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ferrotris_agent::weights::WeightVector;

    use super::*;
    use crate::model::record::HighScoreRecord;

    #[test]
    fn test_append_json_line() {
        let path = std::env::temp_dir().join(format!("ferrotris-append-{}.jsonl", std::process::id()));
        let _ = fs::remove_file(&path);

        let first = HighScoreRecord {
            score: 1200,
            lines: 12,
            weights: WeightVector::DEFAULT,
        };
        let second = HighScoreRecord {
            score: 40,
            ..first
        };
        append_json_line("high score", &path, &first).unwrap();
        append_json_line("high score", &path, &second).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let records: Vec<HighScoreRecord> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records, [first, second]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_json_then_read_back() {
        let path = std::env::temp_dir().join(format!("ferrotris-save-{}.json", std::process::id()));
        let record = HighScoreRecord {
            score: 300,
            lines: 3,
            weights: WeightVector::from_array([1.0, 0.5, 4.0, -0.25]),
        };
        save_json("high score", Some(&path), &record).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("}\n"));
        let loaded: HighScoreRecord = read_json_file("high score", &path).unwrap();
        assert_eq!(loaded, record);
        fs::remove_file(&path).unwrap();
    }
}
