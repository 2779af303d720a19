use log::{error, warn, info, debug};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::subtitle_processor::SubtitleProcessor;

// @module: Application controller for subtitle conversion

/// Per-run switches that do not belong in the configuration file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Report what would be written without writing anything
    pub list_only: bool,

    /// Explicit output file, single-file single-track conversions only
    pub output_path: Option<PathBuf>,
}

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionReport {
    /// Files written, or that would be written in list mode
    pub outputs: Vec<PathBuf>,

    /// Input files that failed, with the reason
    pub failures: Vec<(PathBuf, String)>,

    /// Outputs left alone because they already existed
    pub skipped: usize,
}

/// Main application controller for subtitle conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self { config })
    }

    /// Convert a single file.
    ///
    /// Every failure is returned except the ones that only deserve a warning
    /// (a recognized file without cues).
    pub fn run(&self, input_file: &Path, options: &RunOptions) -> Result<ConversionReport, AppError> {
        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!("Input file does not exist: {}", input_file.display())));
        }

        let mut report = ConversionReport::default();
        match self.convert_file(input_file, options, &mut report) {
            Ok(()) => {}
            Err(AppError::Subtitle(e)) if e.is_warning() => warn!("{}", e),
            Err(e) => return Err(e),
        }

        Ok(report)
    }

    /// Run the workflow in folder mode, converting every matching file below a directory
    /// A failing file is logged and recorded; the remaining files are still converted
    pub fn run_folder(&self, input_dir: &Path, options: &RunOptions) -> Result<ConversionReport, AppError> {
        if options.output_path.is_some() {
            return Err(AppError::Config("--output cannot be used with a directory".to_string()));
        }

        if !FileManager::dir_exists(input_dir) {
            return Err(AppError::File(format!("Input directory does not exist: {}", input_dir.display())));
        }

        let files = FileManager::find_subtitle_files(input_dir, &self.config.directory_extensions)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;
        let mut report = ConversionReport::default();

        if files.is_empty() {
            warn!(
                "No subtitle files ({}) found in directory: {}",
                self.config.directory_extensions.join(", "),
                input_dir.display()
            );
            return Ok(report);
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        for file in &files {
            let file_name = file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());
            folder_pb.set_message(file_name);

            match self.convert_file(file, options, &mut report) {
                Ok(()) => {}
                Err(AppError::Subtitle(e)) if e.is_warning() => warn!("{}", e),
                Err(e) => {
                    error!("{}: {}", file.display(), e);
                    report.failures.push((file.clone(), e.to_string()));
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();

        info!(
            "Folder processing completed: {} file(s), {} output(s), {} skipped, {} error(s)",
            files.len(),
            report.outputs.len(),
            report.skipped,
            report.failures.len()
        );

        Ok(report)
    }

    // @converts: One input file into one SRT per track
    fn convert_file(&self, input_file: &Path, options: &RunOptions, report: &mut ConversionReport) -> Result<(), AppError> {
        let name = FileManager::parse_subtitle_filename(input_file).ok_or_else(|| {
            AppError::File(format!(
                "{}: not a subtitle file name (.smi, .smil, .srt or .ass)",
                input_file.display()
            ))
        })?;

        let bytes = FileManager::read_bytes(input_file).map_err(|e| AppError::File(format!("{:#}", e)))?;
        let document = SubtitleProcessor::load_document(
            input_file,
            &bytes,
            self.config.encoding.as_deref(),
            name.language_hint.clone(),
        )?;
        let tracks = SubtitleProcessor::parse_document(&document)?;

        if options.output_path.is_some() && tracks.len() != 1 {
            return Err(AppError::Config(format!(
                "{}: --output needs exactly one track, found {}",
                input_file.display(),
                tracks.len()
            )));
        }

        let mut occurrences: HashMap<String, usize> = HashMap::new();

        for track in &tracks {
            let language = language_utils::classify_track(track, document.language_hint.as_deref(), tracks.len());
            if let Some(language) = &language {
                debug!("{}: track {} is '{}' ({:?})", input_file.display(), track, language.code, language.source);
            }

            // An explicit output path does not need a language
            let output_path = match (&options.output_path, &language) {
                (Some(path), _) => path.clone(),
                (None, Some(language)) => {
                    let occurrence = occurrences.entry(language.code.clone()).or_insert(0);
                    *occurrence += 1;
                    FileManager::generate_output_path(&name.base, &language.code, *occurrence)
                }
                (None, None) => {
                    warn!("{}: cannot tell the language of track {}, skipped", input_file.display(), track);
                    continue;
                }
            };

            if options.list_only {
                let language_name = language
                    .map(|l| language_utils::get_language_name(&l.code).unwrap_or(l.code))
                    .unwrap_or_else(|| "unknown language".to_string());
                info!("{}: {} [{}] -> {}", input_file.display(), track, language_name, output_path.display());
                report.outputs.push(output_path);
                continue;
            }

            if self.config.no_overwrite && FileManager::file_exists(&output_path) {
                info!("{}: not overwritten", output_path.display());
                report.skipped += 1;
                continue;
            }

            info!("{} -> {}", input_file.display(), output_path.display());
            track
                .write_to_srt(&output_path, self.config.time_begin_ms, self.config.time_offset_ms)
                .map_err(|e| AppError::File(format!("{:#}", e)))?;
            report.outputs.push(output_path);
        }

        Ok(())
    }
}
