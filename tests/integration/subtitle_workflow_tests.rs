/*!
 * End-to-end tests for the correct/translate workflow over files
 */

use std::fs;
use zhvi::app_config::Config;
use zhvi::app_controller::{replace_in_file, Controller};
use zhvi::providers::mock::{MockFailure, MockProvider};
use zhvi::session::Stage;
use zhvi::subtitle_processor::decode;
use crate::common::{self, create_temp_dir, create_test_file, reply, THREE_BLOCKS, TWO_BLOCKS};

async fn connected(provider: MockProvider) -> Controller<MockProvider> {
    let mut controller = Controller::with_config(Config::default()).unwrap();
    controller.connect(provider).await.unwrap();
    controller
}

#[tokio::test]
async fn test_runPipeline_shouldWriteCorrectedAndTranslatedFiles() {
    common::init_logging();
    let dir = create_temp_dir().unwrap();
    let input = create_test_file(dir.path(), "movie.srt", THREE_BLOCKS).unwrap();
    let provider = MockProvider::echo();
    let mut controller = connected(provider.clone()).await;

    let outputs = controller.run_pipeline(&input, None, false).await.unwrap();

    assert_eq!(outputs, vec![
        dir.path().join("movie.corrected_chinese.srt"),
        dir.path().join("movie.translated_vietnamese.srt"),
    ]);
    for output in &outputs {
        assert_eq!(fs::read_to_string(output).unwrap(), THREE_BLOCKS);
    }
    // One probe, one correct, one translate
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_runTranslate_shouldMapPiecesBackByPosition() {
    let dir = create_temp_dir().unwrap();
    let out_dir = dir.path().join("out");
    let input = create_test_file(dir.path(), "ep01.corrected.srt", TWO_BLOCKS).unwrap();
    let mut controller = connected(MockProvider::replying(reply(&["Xin chào", "Thế giới"]))).await;

    let output = controller.run_translate(&input, Some(&out_dir), false).await.unwrap();

    assert_eq!(output, out_dir.join("ep01.corrected.translated_vietnamese.srt"));
    let blocks = decode(&fs::read_to_string(&output).unwrap());
    assert_eq!(blocks[0].text, "Xin chào");
    assert_eq!(blocks[1].text, "Thế giới");
    assert_eq!(blocks[1].timestamp, "00:00:03,000 --> 00:00:04,000");
    assert_eq!(controller.session().content(Stage::Corrected), TWO_BLOCKS);
}

#[tokio::test]
async fn test_runCorrect_withExistingOutput_shouldRequireForce() {
    let dir = create_temp_dir().unwrap();
    let input = create_test_file(dir.path(), "movie.srt", TWO_BLOCKS).unwrap();
    create_test_file(dir.path(), "movie.corrected_chinese.srt", "old").unwrap();
    let mut controller = connected(MockProvider::echo()).await;

    let err = controller.run_correct(&input, None, false).await.unwrap_err();
    assert!(format!("{:#}", err).contains("already exists"));

    let output = controller.run_correct(&input, None, true).await.unwrap();
    assert_eq!(fs::read_to_string(output).unwrap(), TWO_BLOCKS);
}

#[tokio::test]
async fn test_runCorrect_withMissingInput_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let mut controller = connected(MockProvider::echo()).await;

    let result = controller.run_correct(&dir.path().join("missing.srt"), None, false).await;

    assert!(result.is_err());
}

#[test]
fn test_connect_withInvalidKey_shouldFailWithoutAttaching() {
    let provider = MockProvider::failing(MockFailure::Auth);
    let mut controller: Controller<MockProvider> = Controller::with_config(Config::default()).unwrap();

    let result = tokio_test::block_on(controller.connect(provider.clone()));

    assert!(result.unwrap_err().to_string().starts_with("API check failed: Authentication error"));
    assert!(!controller.session().is_ready());
    assert_eq!(provider.request_count(), 1);
}

#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let config = Config { timeout_secs: 0, ..Config::default() };
    assert!(Controller::<MockProvider>::with_config(config).is_err());
}

#[test]
fn test_replaceInFile_shouldRewriteOnlyWhenMatched() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "vi.srt", "1\nt\nLý Minh\n\n2\nt\nLý Minh đi").unwrap();

    let count = replace_in_file(&path, "Lý Minh", "Lí Minh", false).unwrap();
    assert_eq!(count, 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), "1\nt\nLí Minh\n\n2\nt\nLí Minh đi");

    let count = replace_in_file(&path, r"Lí (\w+)", "Lý $1", true).unwrap();
    assert_eq!(count, 2);

    let count = replace_in_file(&path, "không có", "x", false).unwrap();
    assert_eq!(count, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "1\nt\nLý Minh\n\n2\nt\nLý Minh đi");
}

#[test]
fn test_outputPath_shouldUseStemAndStageName() {
    let mut config = Config::default();
    config.output_dir = Some("/srv/subs".to_string());
    let controller: Controller<MockProvider> = Controller::with_config(config).unwrap();

    let path = controller.output_path(Stage::Translated, std::path::Path::new("/in/show.srt"), None);

    assert_eq!(path, std::path::PathBuf::from("/srv/subs/show.translated_vietnamese.srt"));
}
