/*!
 * Tests for the batched transform service
 */

use zhvi::errors::ProviderError;
use zhvi::providers::mock::{MockFailure, MockProvider};
use zhvi::subtitle_processor::decode;
use zhvi::translation::{GenerationOptions, TransformIntent, TranslationService, BATCH_DELIMITER};
use crate::common::{self, reply, THREE_BLOCKS, TWO_BLOCKS};

fn service(provider: MockProvider) -> TranslationService<MockProvider> {
    TranslationService::new(provider, "gemini-1.5-flash", GenerationOptions::default())
}

#[tokio::test]
async fn test_correct_withMatchingReply_shouldReplaceTextsAndKeepLabels() {
    let provider = MockProvider::replying(format!("你好吗{}世界！", BATCH_DELIMITER));
    let output = service(provider).correct(TWO_BLOCKS, None).await.unwrap();

    assert_eq!(
        output,
        "1\n00:00:01,000 --> 00:00:02,000\n你好吗\n\n2\n00:00:03,000 --> 00:00:04,000\n世界！"
    );
}

#[tokio::test]
async fn test_correct_withSinglePieceReply_shouldKeepSecondOriginal() {
    let provider = MockProvider::replying("你好吗");
    let output = service(provider).correct(TWO_BLOCKS, None).await.unwrap();

    let blocks = decode(&output);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].text, "你好吗");
    assert_eq!(blocks[1].text, "世界");
}

#[tokio::test]
async fn test_transform_withAnyPieceCount_shouldYieldSameBlockCount() {
    common::init_logging();
    for pieces in [vec!["a"], vec!["a", "b", "c"], vec!["a", "b", "c", "d", "e", "f"]] {
        let provider = MockProvider::replying(reply(&pieces));
        let output = service(provider)
            .transform(THREE_BLOCKS, TransformIntent::Translate, None)
            .await
            .unwrap();

        let original = decode(THREE_BLOCKS);
        let blocks = decode(&output);
        assert_eq!(blocks.len(), 3, "reply with {} pieces", pieces.len());
        for (block, source) in blocks.iter().zip(&original) {
            assert_eq!(block.index, source.index);
            assert_eq!(block.timestamp, source.timestamp);
        }
    }
}

#[tokio::test]
async fn test_transform_withExtraPieces_shouldUseFirstN() {
    let provider = MockProvider::replying(reply(&["một", "hai", "ba", "bốn"]));
    let (output, report) = service(provider)
        .transform_with_report(THREE_BLOCKS, TransformIntent::Translate, None)
        .await
        .unwrap();

    let texts: Vec<String> = decode(&output).into_iter().map(|b| b.text).collect();
    assert_eq!(texts, vec!["một", "hai", "ba"]);
    assert_eq!(report.reconciliation.truncated, 1);
}

#[tokio::test]
async fn test_transform_mappingIsPositional() {
    let straight = service(MockProvider::replying(reply(&["A", "B", "C"])))
        .translate(THREE_BLOCKS, None).await.unwrap();
    let swapped = service(MockProvider::replying(reply(&["B", "A", "C"])))
        .translate(THREE_BLOCKS, None).await.unwrap();

    let straight = decode(&straight);
    let swapped = decode(&swapped);
    assert_eq!(straight[0].text, swapped[1].text);
    assert_eq!(straight[1].text, swapped[0].text);
    assert_eq!(straight[2], swapped[2]);
}

#[tokio::test]
async fn test_transform_shouldSendOneRequestWithPackedBatch() {
    let provider = MockProvider::echo();
    let options = GenerationOptions { temperature: Some(0.3), max_output_tokens: Some(2048) };
    let service = TranslationService::new(provider.clone(), "gemini-1.5-flash", options);

    let output = service.correct(THREE_BLOCKS, Some("trang trọng")).await.unwrap();

    assert_eq!(output, THREE_BLOCKS);
    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "gemini-1.5-flash");
    assert_eq!(requests[0].temperature, Some(0.3));
    assert_eq!(requests[0].max_output_tokens, Some(2048));
    assert!(requests[0].prompt.contains("CHÍNH XÁC 3 câu"));
    assert!(requests[0].prompt.contains("Phong cách: trang trọng."));
}

#[tokio::test]
async fn test_transform_withEmptyDocument_shouldNotCallProvider() {
    let provider = MockProvider::replying("unused");
    let service = service(provider.clone());

    let output = service.correct("just one line", None).await.unwrap();

    assert_eq!(output, "");
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_transform_withProviderFailure_shouldPropagateError() {
    let provider = MockProvider::failing(MockFailure::Api);
    let result = service(provider.clone()).translate(TWO_BLOCKS, None).await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 500, .. })));
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_transformReport_shouldCountDroppedEntries() {
    let document = format!("{}\n\n9\nbroken", TWO_BLOCKS);
    let provider = MockProvider::replying(reply(&["a", "b"]));
    let (_, report) = service(provider)
        .transform_with_report(&document, TransformIntent::Correct, None)
        .await
        .unwrap();

    assert_eq!(report.blocks, 2);
    assert_eq!(report.dropped, 1);
    assert!(report.reconciliation.is_exact());
    assert!(report.summary().contains("2 blocks"));
}

#[tokio::test]
async fn test_transform_withBlankReply_shouldFailInsteadOfKeepingSource() {
    for provider in [MockProvider::empty(), MockProvider::replying(" \n ")] {
        let result = service(provider.clone())
            .transform_with_report(TWO_BLOCKS, TransformIntent::Translate, None)
            .await;

        assert!(matches!(result, Err(ProviderError::ParseError(_))));
        assert_eq!(provider.request_count(), 1);
    }
}

#[tokio::test]
async fn test_transform_withOnlyDelimiters_shouldPadEveryBlock() {
    let provider = MockProvider::replying(format!("{d}\n{d}", d = BATCH_DELIMITER));
    let (output, report) = service(provider)
        .transform_with_report(TWO_BLOCKS, TransformIntent::Correct, None)
        .await
        .unwrap();

    assert_eq!(output, TWO_BLOCKS);
    assert_eq!(report.reconciliation.padded, 2);
}
