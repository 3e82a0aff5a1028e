/*!
 * End-to-end tests for batch validation
 */

use std::fs;
use anyhow::Result;
use deckcheck::errors::{AppError, ContentError};
use deckcheck::validation::ValidationService;
use crate::common::{self, ContentFixture};

#[test]
fn test_validateAll_withAllStoriesValid_shouldPass() -> Result<()> {
    common::init_logging();
    let fixture = ContentFixture::new()?;
    fixture.add_deck("hsk1", &[("猫", Some(5)), ("好", Some(1))])?;
    fixture.add_story("hsk1", "story2.json", &[("s1", "好", &[(0, 1, Some(1))])])?;
    fixture.add_story("hsk1", "story1.json", &[("s1", "猫", &[(0, 1, Some(5))])])?;

    let service = ValidationService::new(fixture.config());
    let mut out = Vec::new();
    let summary = service.validate_all(&mut out)?;

    assert!(summary.all_passed());
    assert_eq!(summary.stories_checked, 2);
    assert_eq!(summary.stories_passed, 2);

    let output = common::output_string(out);
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("OK: ") && lines[0].ends_with("story1.json"));
    assert!(lines[1].starts_with("OK: ") && lines[1].ends_with("story2.json"));
    Ok(())
}

#[test]
fn test_validateAll_withBookWithoutDeck_shouldSkipIt() -> Result<()> {
    let fixture = ContentFixture::new()?;
    fixture.add_deck("hsk1", &[("猫", Some(5))])?;
    fixture.add_story("hsk1", "story1.json", &[("s1", "猫", &[(0, 1, Some(5))])])?;
    // Would fail if it were checked against any deck
    fixture.add_story("hsk2", "story1.json", &[("s1", "狗", &[(0, 1, Some(9))])])?;

    let service = ValidationService::new(fixture.config());
    let mut out = Vec::new();
    let summary = service.validate_all(&mut out)?;

    assert!(summary.all_passed());
    assert_eq!(summary.books_skipped, 1);
    assert_eq!(summary.stories_checked, 1);
    assert!(common::output_string(out).contains("SKIP: No deck for hsk2\n"));
    Ok(())
}

#[test]
fn test_validateAll_withOneFailingStory_shouldCheckTheRestAndFail() -> Result<()> {
    let fixture = ContentFixture::new()?;
    fixture.add_deck("hsk1", &[("猫", Some(5))])?;
    fixture.add_deck("hsk2", &[("狗", Some(2))])?;
    fixture.add_story("hsk1", "a.json", &[("s1", "猫", &[(0, 1, Some(4))])])?;
    fixture.add_story("hsk1", "b.json", &[("s1", "猫", &[(0, 1, Some(5))])])?;
    fixture.add_story("hsk2", "a.json", &[("s1", "狗", &[(0, 1, Some(2))])])?;

    let service = ValidationService::new(fixture.config());
    let mut out = Vec::new();
    let summary = service.validate_all(&mut out)?;

    assert!(!summary.all_passed());
    assert_eq!(summary.stories_checked, 3);
    assert_eq!(summary.stories_passed, 2);
    assert_eq!(summary.stories_failed, 1);

    let output = common::output_string(out);
    assert!(output.contains("has l=4 but deck says 5"));
    assert_eq!(output.matches("OK: ").count(), 2);
    Ok(())
}

#[test]
fn test_validateAll_withMalformedStory_shouldReportAndContinue() -> Result<()> {
    let fixture = ContentFixture::new()?;
    fixture.add_deck("hsk1", &[("猫", Some(5))])?;
    let broken = fixture.add_raw_story("hsk1", "a.json", "not json at all")?;
    fixture.add_story("hsk1", "b.json", &[("s1", "猫", &[(0, 1, Some(5))])])?;

    let service = ValidationService::new(fixture.config());
    let mut out = Vec::new();
    let summary = service.validate_all(&mut out)?;

    assert!(!summary.all_passed());
    assert_eq!(summary.load_errors, 1);
    assert_eq!(summary.stories_passed, 1);

    let output = common::output_string(out);
    assert!(output.contains(&format!("ERROR: {}: Failed to parse", broken.display())));
    assert!(output.contains("b.json"));
    Ok(())
}

#[test]
fn test_validateAll_shouldIgnoreOtherExtensionsAndLooseFiles() -> Result<()> {
    let fixture = ContentFixture::new()?;
    fixture.add_deck("hsk1", &[("猫", Some(5))])?;
    fixture.add_story("hsk1", "story1.json", &[("s1", "猫", &[(0, 1, Some(5))])])?;
    fixture.add_raw_story("hsk1", "notes.txt", "not a story")?;
    common::create_test_file(fixture.root(), "content/stories/index.json", "[]")?;

    let service = ValidationService::new(fixture.config());
    let summary = service.validate_all(&mut Vec::new())?;

    assert_eq!(summary.stories_checked, 1);
    assert!(summary.all_passed());
    Ok(())
}

#[test]
fn test_validateAll_withMissingStoriesRoot_shouldBeNotFound() -> Result<()> {
    let fixture = ContentFixture::new()?;
    fs::remove_dir_all(fixture.root().join("content").join("stories"))?;

    let service = ValidationService::new(fixture.config());
    let result = service.validate_all(&mut Vec::new());

    assert!(matches!(result, Err(AppError::Content(ContentError::NotFound { .. }))));
    Ok(())
}

#[test]
fn test_validateAll_withOnlyOverrides_shouldPass() -> Result<()> {
    let fixture = ContentFixture::new()?;
    fixture.add_deck("hsk1", &[("贵", Some(1))])?;
    fixture.add_story("hsk1", "story1.json", &[("s1", "很贵", &[(1, 2, Some(10))])])?;

    let service = ValidationService::new(fixture.config());
    let mut out = Vec::new();
    let summary = service.validate_all(&mut out)?;

    assert!(summary.all_passed());
    assert!(common::output_string(out).contains("INFO s1: '贵' l=10 (deck=1) — contextual override"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_validateAll_withDanglingStorySymlink_shouldReportItAndContinue() -> Result<()> {
    let fixture = ContentFixture::new()?;
    fixture.add_deck("hsk1", &[("猫", Some(5))])?;
    fixture.add_deck("hsk2", &[("狗", Some(2))])?;
    let dangling = fixture.root().join("content/stories/hsk1/a.json");
    fs::create_dir_all(dangling.parent().unwrap())?;
    std::os::unix::fs::symlink(fixture.root().join("gone.json"), &dangling)?;
    let mismatched = fixture.add_story("hsk1", "b.json", &[("s1", "猫", &[(0, 1, Some(4))])])?;
    let valid = fixture.add_story("hsk2", "c.json", &[("s1", "狗", &[(0, 1, Some(2))])])?;

    let service = ValidationService::new(fixture.config());
    let mut out = Vec::new();
    let summary = service.validate_all(&mut out)?;

    assert!(!summary.all_passed());
    assert_eq!(summary.stories_checked, 3);
    assert_eq!(summary.load_errors, 1);
    assert_eq!(summary.stories_failed, 2);
    assert_eq!(summary.stories_passed, 1);
    assert_eq!(
        common::output_string(out),
        format!(
            "ERROR: {}: File not found: {}\n\nIssues found in {}:\n  s1: '猫' has l=4 but deck says 5\nOK: {}\n",
            dangling.display(),
            dangling.display(),
            mismatched.display(),
            valid.display()
        )
    );
    Ok(())
}
