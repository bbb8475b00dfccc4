use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum FileFormatError {
    #[error("Failed to get file extension for file: {0}")]
    MissingFileExtension(String),
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
}

pub type FileFormatResult<T> = Result<T, FileFormatError>;

pub fn get_file_extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|os_str| os_str.to_str())
}

/// Text formats accepted for configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> FileFormatResult<Self> {
        let display = path.display().to_string();
        let ext = get_file_extension(path)
            .ok_or_else(|| FileFormatError::MissingFileExtension(display.clone()))?;

        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Ok(Self::Yaml)
        } else if ext.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(FileFormatError::UnsupportedFileExtension(display))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            FileFormat::from_path(Path::new("cfg/recognition.yaml")).unwrap(),
            FileFormat::Yaml
        );
        assert_eq!(
            FileFormat::from_path(Path::new("recognition.YML")).unwrap(),
            FileFormat::Yaml
        );
        assert_eq!(
            FileFormat::from_path(Path::new("recognition.json")).unwrap(),
            FileFormat::Json
        );
    }

    #[test]
    fn test_format_rejects_unknown_and_missing() {
        assert!(matches!(
            FileFormat::from_path(Path::new("recognition.toml")),
            Err(FileFormatError::UnsupportedFileExtension(_))
        ));
        assert!(matches!(
            FileFormat::from_path(Path::new("recognition")),
            Err(FileFormatError::MissingFileExtension(_))
        ));
    }
}
