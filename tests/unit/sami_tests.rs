/*!
 * Tests for the SAMI parser
 */

use smi2srt::errors::SubtitleError;
use smi2srt::formats::sami;
use smi2srt::subtitle_processor::Cue;
use crate::common;

#[test]
fn test_parse_withTwoClasses_shouldSplitIntoTwoTracks() {
    let tracks = sami::parse("two.smi", common::SAMI_TWO_LANGUAGES).unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].label, "KRCC");
    assert_eq!(tracks[1].label, "ENCC");

    // Three blocks per class, the last one only closes the previous cue
    assert_eq!(tracks[0].len(), 2);
    assert_eq!(tracks[1].len(), 2);
}

#[test]
fn test_parse_withTwoClasses_shouldChainStopTimes() {
    let tracks = sami::parse("two.smi", common::SAMI_TWO_LANGUAGES).unwrap();

    assert_eq!(
        tracks[1].cues,
        vec![
            Cue::new(1000, 3000, "Hello"),
            Cue::new(3000, 5000, "Nice to\nmeet you"),
        ]
    );
    assert_eq!(tracks[0].cues[1].text, "<font color=\"#ffff00\">반갑습니다</font>");
}

#[test]
fn test_parse_withEmptyPayloadInMiddle_shouldEmitSingleCue() {
    let text = "<SAMI><BODY>
<SYNC Start=1000><P Class=KRCC>안녕
<SYNC Start=4000><P Class=KRCC>
<SYNC Start=7000><P Class=KRCC>반가워요
</BODY></SAMI>";

    let tracks = sami::parse("hello.smi", text).unwrap();

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].cues, vec![Cue::new(1000, 4000, "안녕")]);
}

#[test]
fn test_parse_withMissingStart_shouldDropOnlyThatBlock() {
    let text = "<SAMI><BODY>
<SYNC Start=1000><P Class=ENCC>one
<SYNC><P Class=ENCC>broken
<SYNC Start=2000><P Class=ENCC>two
<SYNC Start=3000><P Class=ENCC>&nbsp;
</BODY></SAMI>";

    let tracks = sami::parse("broken.smi", text).unwrap();

    assert_eq!(
        tracks[0].cues,
        vec![Cue::new(1000, 2000, "one"), Cue::new(2000, 3000, "two")]
    );
}

#[test]
fn test_parse_withEqualStarts_shouldKeepInputOrder() {
    let text = "<SAMI><BODY>
<SYNC Start=1000><P Class=ENCC>first
<SYNC Start=1000><P Class=ENCC>second
<SYNC Start=2000><P Class=ENCC>third
<SYNC Start=2500><P Class=ENCC>&nbsp;
</BODY></SAMI>";

    let tracks = sami::parse("ties.smi", text).unwrap();
    let texts: Vec<&str> = tracks[0].cues.iter().map(|c| c.text.as_str()).collect();

    assert_eq!(texts, vec!["first", "second", "third"]);
    assert_eq!(tracks[0].cues[0].stop_ms, 1000);
}

#[test]
fn test_parse_withoutClass_shouldUseUnknownLabel() {
    let text = "<SAMI><BODY><SYNC Start=0><P>text<SYNC Start=900><P>&nbsp;</BODY></SAMI>";

    let tracks = sami::parse("plain.smi", text).unwrap();

    assert_eq!(tracks[0].label, "unknown");
    assert_eq!(tracks[0].cues, vec![Cue::new(0, 900, "text")]);
}

#[test]
fn test_parse_withLowercaseTagsAndSyncClass_shouldReadThem() {
    let text = "<sami><body>
<sync start=\"100\" class=\"JPCC\"><p>こんにちは</p>
<sync start=\"900\" class=\"JPCC\"><p>&nbsp;</p>
</body></sami>";

    let tracks = sami::parse("lower.smi", text).unwrap();

    assert_eq!(tracks[0].label, "JPCC");
    assert_eq!(tracks[0].cues, vec![Cue::new(100, 900, "こんにちは")]);
}

#[test]
fn test_parse_withoutSyncBlocks_shouldReturnNoCuesFound() {
    let result = sami::parse("hollow.smi", "<SAMI><HEAD></HEAD><BODY></BODY></SAMI>");

    assert_eq!(
        result,
        Err(SubtitleError::NoCuesFound { file: "hollow.smi".to_string() })
    );
}
