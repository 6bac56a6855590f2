//! JSON payload reading with transparent gzip support.

use flate2::read::GzDecoder;
use pixnet_core::PixnetError;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read and decode a JSON file.
///
/// The file is gunzipped when `gzipped` is set or its name ends in `.gz`,
/// provided the bytes actually carry the gzip magic; otherwise it is parsed
/// as plain UTF-8 JSON.
pub fn read_json<T: DeserializeOwned>(path: &Path, gzipped: bool) -> Result<T, PixnetError> {
    let raw = std::fs::read(path)
        .map_err(|e| PixnetError::Io(format!("Cannot read {}: {}", path.display(), e)))?;

    let wants_gzip = gzipped || path.extension().is_some_and(|ext| ext == "gz");
    let text = if wants_gzip && raw.starts_with(&GZIP_MAGIC) {
        let mut text = String::new();
        GzDecoder::new(raw.as_slice())
            .read_to_string(&mut text)
            .map_err(|e| parse_error(path, e))?;
        text
    } else {
        if wants_gzip {
            tracing::debug!("{} is not gzip-compressed, reading as plain JSON", path.display());
        }
        String::from_utf8(raw).map_err(|e| parse_error(path, e))?
    };

    serde_json::from_str(&text).map_err(|e| parse_error(path, e))
}

fn parse_error(path: &Path, reason: impl std::fmt::Display) -> PixnetError {
    PixnetError::Parse {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn reads_plain_and_gzipped() {
        let dir = tempfile::tempdir().expect("tempdir");

        let plain = dir.path().join("a.json");
        std::fs::write(&plain, r#"{"images": ["x.jpg"]}"#).expect("write");
        let value: serde_json::Value = read_json(&plain, false).expect("plain");
        assert_eq!(value["images"][0], "x.jpg");

        let packed = dir.path().join("a.json.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"[[1, 2], [3, 4]]"#).expect("compress");
        std::fs::write(&packed, encoder.finish().expect("finish")).expect("write");
        let value: Vec<Vec<f64>> = read_json(&packed, false).expect("gzip");
        assert_eq!(value, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn gzip_flag_tolerates_plain_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let plain = dir.path().join("b.json");
        std::fs::write(&plain, "[1, 2]").expect("write");

        let value: Vec<u32> = read_json(&plain, true).expect("plain");
        assert_eq!(value, vec![1, 2]);
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").expect("write");

        let result: Result<serde_json::Value, _> = read_json(&bad, false);
        assert!(matches!(result, Err(PixnetError::Parse { .. })));
    }
}
