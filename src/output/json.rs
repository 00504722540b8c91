//! JSON profile output writer.
//!
//! Writes ProfileDocument structs to JSON files, pretty or compact.

use crate::parser::schema::ProfileDocument;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write a profile document to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `document` - Profile document to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let document = ProfileDocument::new(convert_profile(&hermes)?);
/// write_profile(&document, "profile.json")?;
/// ```
pub fn write_profile(
    document: &ProfileDocument,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    write_document(document, output_path.as_ref(), true)
}

/// Write a profile document as compact JSON (no formatting)
///
/// **Public** - for when file size matters
pub fn write_profile_compact(
    document: &ProfileDocument,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    write_document(document, output_path.as_ref(), false)
}

/// Serialize a profile document to a pretty JSON string
pub fn profile_to_string(document: &ProfileDocument) -> Result<String, OutputError> {
    serde_json::to_string_pretty(document).map_err(OutputError::SerializationFailed)
}

fn write_document(document: &ProfileDocument, output_path: &Path, pretty: bool) -> Result<(), OutputError> {
    info!("Writing profile to: {}", output_path.display());

    super::prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    let serialized = if pretty {
        serde_json::to_writer_pretty(&mut writer, document)
    } else {
        serde_json::to_writer(&mut writer, document)
    };
    serialized.map_err(OutputError::SerializationFailed)?;

    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Profile written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a profile document from a JSON file
///
/// **Public** - useful for validation and testing
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_profile(input_path: impl AsRef<Path>) -> Result<ProfileDocument, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading profile from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;

    let document: ProfileDocument =
        serde_json::from_reader(BufReader::new(file)).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Profile loaded: version {}, {} samples",
        document.version,
        document.profile.samples.len()
    );

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::NormalizedProfile;
    use tempfile::NamedTempFile;

    #[test]
    fn test_compact_is_single_line() {
        let document = ProfileDocument::new(NormalizedProfile::default());
        let temp_file = NamedTempFile::new().unwrap();

        write_profile_compact(&document, temp_file.path()).unwrap();

        let written = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("\"samples\":[]"));
    }

    #[test]
    fn test_profile_to_string() {
        let document = ProfileDocument::new(NormalizedProfile::default());

        let text = profile_to_string(&document).unwrap();

        assert!(text.contains("\"version\": \"1.0.0\""));
        assert!(text.contains("\"platform\": \"javascript\""));
    }
}
