/*!
 * Prompt templates for the correct and translate actions.
 *
 * Both templates end with the packed batch followed by a closing line
 * restating the expected count, so the batch is always the second to last
 * blank-line separated section of the prompt.
 */

use std::fmt;

use super::batch::BATCH_DELIMITER;

/// What the model should do with the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformIntent {
    /// Fix Chinese grammar, spelling and punctuation
    Correct,
    /// Translate Chinese into Vietnamese
    Translate,
}

impl TransformIntent {
    /// Verb used in logs and progress messages
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Correct => "correcting",
            Self::Translate => "translating",
        }
    }

    /// Build the full prompt for `count` packed texts
    pub fn build_prompt(&self, batch: &str, count: usize, style: Option<&str>) -> String {
        let style = style.map(str::trim).filter(|s| !s.is_empty());
        match self {
            Self::Correct => correction_prompt(batch, count, style),
            Self::Translate => translation_prompt(batch, count, style),
        }
    }
}

impl fmt::Display for TransformIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct => write!(f, "correct"),
            Self::Translate => write!(f, "translate"),
        }
    }
}

fn correction_prompt(batch: &str, count: usize, style: Option<&str>) -> String {
    let style_line = style
        .map(|s| format!("Phong cách: {}.\n", s))
        .unwrap_or_default();

    format!(
        "Bạn là chuyên gia sửa phụ đề tiếng Trung.\n\n\
         {style_line}\n\
         Nhiệm vụ:\n\
         1. Sửa ngữ pháp, chính tả, dấu câu tiếng Trung\n\
         2. Giữ nguyên ý nghĩa\n\
         3. Trả về CHÍNH XÁC {count} câu\n\
         4. Ngăn cách bởi \"{delimiter}\"\n\
         5. KHÔNG thêm giải thích\n\n\
         Các câu cần sửa:\n\
         {batch}\n\n\
         Trả về {count} câu đã sửa:",
        style_line = style_line,
        count = count,
        delimiter = BATCH_DELIMITER,
        batch = batch,
    )
}

fn translation_prompt(batch: &str, count: usize, style: Option<&str>) -> String {
    let style_line = style
        .map(|s| format!("Phong cách dịch: {}.\n", s))
        .unwrap_or_default();

    format!(
        "Bạn là chuyên gia dịch Trung - Việt.\n\n\
         {style_line}\n\
         NGUYÊN TẮC DỊCH:\n\
         1. ĐỊA DANH - Hán Việt: 上海→Thượng Hải, 北京→Bắc Kinh\n\
         2. TÊN NGƯỜI - Hán Việt: 李明→Lý Minh, 王伟→Vương Vỹ\n\
         3. Dịch tự nhiên, dễ hiểu\n\n\
         NHIỆM VỤ:\n\
         1. Dịch {count} câu sang tiếng Việt\n\
         2. Ngăn cách bởi \"{delimiter}\"\n\
         3. KHÔNG thêm giải thích\n\n\
         Các câu cần dịch:\n\
         {batch}\n\n\
         Trả về {count} câu tiếng Việt:",
        style_line = style_line,
        count = count,
        delimiter = BATCH_DELIMITER,
        batch = batch,
    )
}
