/*!
 * Integration tests for the full conversion workflow
 */

use std::fs;
use anyhow::Result;

use smi2srt::app_config::Config;
use smi2srt::app_controller::{Controller, RunOptions};
use smi2srt::errors::{AppError, SubtitleError};
use crate::common;

fn controller_with(config: Config) -> Controller {
    Controller::with_config(config).unwrap()
}

/// Test that a two-language SAMI file becomes one SRT per language
#[test]
fn test_conversion_withTwoLanguageSami_shouldWriteOneFilePerLanguage() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(&temp_dir.path().to_path_buf(), "movie.smi", common::SAMI_TWO_LANGUAGES)?;

    let report = controller_with(Config::default()).run(&input, &RunOptions::default())?;

    let korean = temp_dir.path().join("movie.ko.srt");
    let english = temp_dir.path().join("movie.en.srt");
    assert_eq!(report.outputs, vec![korean.clone(), english.clone()]);

    assert_eq!(
        fs::read_to_string(&korean)?,
        "1\n00:00:01,000 --> 00:00:03,000\n안녕하세요\n\n\
         2\n00:00:03,000 --> 00:00:05,000\n<font color=\"#ffff00\">반갑습니다</font>\n\n"
    );
    assert_eq!(
        fs::read_to_string(&english)?,
        "1\n00:00:01,000 --> 00:00:03,000\nHello\n\n\
         2\n00:00:03,000 --> 00:00:05,000\nNice to\nmeet you\n\n"
    );

    Ok(())
}

#[test]
fn test_conversion_withSrtAndOffset_shouldShiftTimes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "clip.eng.srt",
        "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n",
    )?;
    let config = Config { time_offset_ms: 500, ..Config::default() };

    controller_with(config).run(&input, &RunOptions::default())?;

    let output = fs::read_to_string(temp_dir.path().join("clip.en.srt"))?;
    assert_eq!(output, "1\n00:00:01,500 --> 00:00:02,500\nHello\n\n");

    Ok(())
}

#[test]
fn test_conversion_withTimeBegin_shouldShiftOnlyLaterCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "late.eng.srt",
        "1\n00:00:05,000 --> 00:00:05,500\nbefore\n\n2\n00:00:06,000 --> 00:00:06,500\nafter\n",
    )?;
    let config = Config { time_offset_ms: 1000, time_begin_ms: 6000, ..Config::default() };

    controller_with(config).run(&input, &RunOptions::default())?;

    let output = fs::read_to_string(temp_dir.path().join("late.en.srt"))?;
    assert_eq!(
        output,
        "1\n00:00:05,000 --> 00:00:05,500\nbefore\n\n2\n00:00:07,000 --> 00:00:07,500\nafter\n\n"
    );

    Ok(())
}

#[test]
fn test_conversion_withAssAndHint_shouldWriteTranslatedMarkup() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(&temp_dir.path().to_path_buf(), "episode.kor.ass", common::ASS_SAMPLE)?;

    controller_with(Config::default()).run(&input, &RunOptions::default())?;

    let output = fs::read_to_string(temp_dir.path().join("episode.ko.srt"))?;
    assert_eq!(
        output,
        "1\n00:00:01,000 --> 00:00:02,500\n<b>Bold</b> text\nsecond line\n\n\
         2\n00:00:03,000 --> 00:00:04,000\n<i>an aside</i>\n\n"
    );

    Ok(())
}

#[test]
fn test_conversion_withCp949Sami_shouldDetectEncoding() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let text = "<SAMI><BODY>\r\n\
        <SYNC Start=1000><P Class=KRCC>안녕하세요. 오늘은 날씨가 아주 맑고 따뜻합니다.\r\n\
        <SYNC Start=4000><P Class=KRCC>우리는 공원에서 산책을 하고 점심을 먹었습니다.\r\n\
        <SYNC Start=8000><P Class=KRCC>&nbsp;\r\n\
        </BODY></SAMI>\r\n";
    let (bytes, _, _) = encoding_rs::EUC_KR.encode(text);
    let input = common::create_test_bytes(&temp_dir.path().to_path_buf(), "legacy.smi", &bytes)?;

    controller_with(Config::default()).run(&input, &RunOptions::default())?;

    let output = fs::read_to_string(temp_dir.path().join("legacy.ko.srt"))?;
    assert!(output.contains("안녕하세요. 오늘은 날씨가 아주 맑고 따뜻합니다."));
    assert!(output.contains("2\n00:00:04,000 --> 00:00:08,000\n"));

    Ok(())
}

/// Converting twice with the same settings must give byte-identical output
#[test]
fn test_conversion_runTwice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(&temp_dir.path().to_path_buf(), "again.smi", common::SAMI_TWO_LANGUAGES)?;
    let controller = controller_with(Config { time_offset_ms: -250, ..Config::default() });

    let first = controller.run(&input, &RunOptions::default())?;
    let first_bytes: Vec<Vec<u8>> = first.outputs.iter().map(fs::read).collect::<std::io::Result<_>>()?;

    let second = controller.run(&input, &RunOptions::default())?;
    let second_bytes: Vec<Vec<u8>> = second.outputs.iter().map(fs::read).collect::<std::io::Result<_>>()?;

    assert_eq!(first.outputs, second.outputs);
    assert_eq!(first_bytes, second_bytes);

    Ok(())
}

#[test]
fn test_conversion_withUnrecognizedContent_shouldFailWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "web.srt",
        "WEBVTT\n\n00:01.000 --> 00:02.000\nHi\n",
    )?;

    let result = controller_with(Config::default()).run(&input, &RunOptions::default());

    assert!(matches!(
        result,
        Err(AppError::Subtitle(SubtitleError::UnsupportedFormat { ref leading, .. })) if leading == &vec![87, 69, 66]
    ));
    let entries = fs::read_dir(temp_dir.path())?.count();
    assert_eq!(entries, 1);

    Ok(())
}

#[test]
fn test_conversion_withReversedSrtTimes_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "bad.eng.srt",
        "1\n00:00:09,000 --> 00:00:01,000\nbackwards\n",
    )?;

    let result = controller_with(Config::default()).run(&input, &RunOptions::default());

    assert!(matches!(result, Err(AppError::Subtitle(SubtitleError::SyncOrderingInvalid { .. }))));
    assert!(!temp_dir.path().join("bad.en.srt").exists());

    Ok(())
}
