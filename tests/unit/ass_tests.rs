/*!
 * Tests for the ASS parser
 */

use smi2srt::errors::SubtitleError;
use smi2srt::formats::ass;
use smi2srt::subtitle_processor::Cue;
use crate::common;

#[test]
fn test_parse_withSample_shouldTranslateEveryEvent() {
    let track = ass::parse("sample.ass", common::ASS_SAMPLE).unwrap();

    assert_eq!(track.label, "ass");
    assert_eq!(
        track.cues,
        vec![
            Cue::new(1000, 2500, "<b>Bold</b> text\nsecond line"),
            Cue::new(3000, 4000, "<i>an aside</i>"),
        ]
    );
}

#[test]
fn test_parse_withCommentRecord_shouldEmitCue() {
    let text = "[Events]\nFormat: x\nComment: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,note\n";

    let track = ass::parse("notes.ass", text).unwrap();

    assert_eq!(track.cues, vec![Cue::new(1000, 2000, "note")]);
}

#[test]
fn test_parse_withOverflowingHours_shouldSkipEventWithoutPanicking() {
    let text = "[Events]\nFormat: x\n\
                Dialogue: 0,100000000000000000:00:00.00,100000000000000000:00:01.00,Default,,0,0,0,,Boom\n\
                Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Safe\n";

    let track = ass::parse("huge.ass", text).unwrap();

    assert_eq!(track.cues, vec![Cue::new(1000, 2000, "Safe")]);
}

#[test]
fn test_parse_with_diagnostics_withRepeatedUnknownCommand_shouldReportOncePerFile() {
    let text = "[Events]\nFormat: x\n\
                Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\an8}one\n\
                Dialogue: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,{\\an8\\blur2}two\n";

    let (track, diagnostics) = ass::parse_with_diagnostics("fancy.ass", text).unwrap();

    assert_eq!(track.len(), 2);
    assert_eq!(
        diagnostics,
        vec![
            SubtitleError::UnknownCommand { file: "fancy.ass".to_string(), command: "an8".to_string() },
            SubtitleError::UnknownCommand { file: "fancy.ass".to_string(), command: "blur2".to_string() },
        ]
    );
}

#[test]
fn test_parse_withCentiseconds_shouldScaleToMilliseconds() {
    let text = "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
                Dialogue: 0,1:02:03.45,1:02:04.07,Default,,0,0,0,,timing\n";

    let track = ass::parse("timing.ass", text).unwrap();

    assert_eq!(track.cues[0].start_ms, 3_723_450);
    assert_eq!(track.cues[0].stop_ms, 3_724_070);
}

#[test]
fn test_parse_withUnknownCommands_shouldStillEmitCue() {
    common::init_logger();
    let text = "[Events]\nFormat: x\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\an8\\fad(200,200)}Top text\n";

    let track = ass::parse("fancy.ass", text).unwrap();

    assert_eq!(track.cues, vec![Cue::new(1000, 2000, "Top text")]);
}

#[test]
fn test_parse_withMalformedEventLines_shouldSkipThem() {
    let text = "[Events]\nFormat: x\nDialogue: garbage\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,kept\n";

    let track = ass::parse("partial.ass", text).unwrap();

    assert_eq!(track.len(), 1);
}

#[test]
fn test_parse_withOverrideOnlyText_shouldDropCue() {
    let text = "[Events]\nFormat: x\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\fs20}\n";

    let track = ass::parse("empty.ass", text).unwrap();

    assert!(track.is_empty());
}

#[test]
fn test_parse_withoutEventsSection_shouldReturnNoCuesFound() {
    let result = ass::parse("styles.ass", "[Script Info]\nTitle: x\n\n[V4+ Styles]\nStyle: Default\n");

    assert_eq!(result, Err(SubtitleError::NoCuesFound { file: "styles.ass".to_string() }));
}

#[test]
fn test_decode_event_withComment_shouldKeepKind() {
    let event = ass::decode_event("Comment: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,not shown").unwrap();

    assert_eq!(event.kind, "Comment");
    assert_eq!(event.style, "Default");
    assert_eq!(event.text, "not shown");
}
