use anyhow::{Result, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// <base>[.<langhint>].<ext>
static SUBTITLE_FILENAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.*?)(?:\.(en|eng|ko|kor|ja|jap|zh-cn|chs|zh-tw|cht))?\.(smi|smil|srt|ass)$").unwrap()
});

// @struct: Parts of a subtitle file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleFileName {
    // @field: Output base, including the parent directory
    pub base: PathBuf,

    // @field: Raw language hint, if the name carries one
    pub language_hint: Option<String>,

    // @field: Extension as written
    pub extension: String,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a whole file as raw bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Find subtitle files under a directory, recursively.
    ///
    /// Extensions match case-insensitively. Names starting with `._` (macOS
    /// resource forks) are skipped. Results are in file-name order.
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() || entry.file_name().to_string_lossy().starts_with("._") {
                continue;
            }

            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy();
                if extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(&ext))
                {
                    result.push(path.to_path_buf());
                }
            }
        }

        Ok(result)
    }

    // @parses: <base>[.<langhint>].<ext>
    // @returns: None when the extension is not a subtitle extension
    pub fn parse_subtitle_filename<P: AsRef<Path>>(path: P) -> Option<SubtitleFileName> {
        let path = path.as_ref();
        let file_name = path.file_name()?.to_string_lossy();
        let caps = SUBTITLE_FILENAME_REGEX.captures(&file_name)?;

        let stem = caps.get(1).map_or("", |m| m.as_str());
        let base = match path.parent() {
            Some(parent) => parent.join(stem),
            None => PathBuf::from(stem),
        };

        Some(SubtitleFileName {
            base,
            language_hint: caps.get(2).map(|m| m.as_str().to_string()),
            extension: caps[3].to_string(),
        })
    }

    // @generates: Output path for one converted track
    // @params: base, language code, occurrence of that code in the file (1-based)
    pub fn generate_output_path<P: AsRef<Path>>(base: P, language_code: &str, occurrence: usize) -> PathBuf {
        let mut output = base.as_ref().as_os_str().to_os_string();
        output.push(".");
        output.push(language_code);
        if occurrence > 1 {
            output.push(format!(".{}", occurrence));
        }
        output.push(".srt");
        PathBuf::from(output)
    }
}
