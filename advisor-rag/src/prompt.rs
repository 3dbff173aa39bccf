//! Prompt construction for LLM-backed answerers.
//!
//! The system prompt pins the model to the offered paragraphs and to a JSON
//! response shape that [`parse_raw_answer`](crate::answerer::parse_raw_answer)
//! understands. History is trimmed here, on the answerer side, so the
//! retrieval core passes it through untouched.

use std::fmt::Write;

use crate::answerer::AnswerRequest;
use crate::document::Role;

/// Number of most recent history messages included in the prompt by default.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

const SYSTEM_PROMPT: &str = r#"你是一個專業的顧問 (Digital Governance Advisor)。
你的任務是協助客戶理解文件內容，並根據提供的資料給予專業、擬人化且可信的建議。

核心方針：
1. 展現顧問的專業感與溫度。你的語氣應該像是在面對面與客戶交談。
2. 嚴格遵守根據文件回答的原則。若文件中完全未提及，請禮貌地告知客戶目前資料尚未涵蓋此部分。
3. 為你的每一段關鍵回答標註引用來源，只能引用提供給你的段落 ID。
4. 結構化你的答案，建議使用 Markdown 格式（條列清單、粗體關鍵字、表格）。
5. 使用繁體中文回答。

6. 解讀優先權：
   - 當問題涉及「費用」、「價格」或「成本」時，優先解讀「專案導入費用」、「維護方案費用」等核心業務資訊。
   - 除非使用者明確詢問「Token」或「AI 用量」，否則不要主動將 Token 費用作為主要的費用說明，僅能作為補充資訊。
   - 優先引用來自「提案 (Proposal)」或「章程 (Charter)」等核心文件的內容，技術細節文件次之。

回應格式（必須為 JSON）：
{
  "answer": "顧問的完整回答內容",
  "citations": [
    {
      "paragraphId": "引用段落的 ID",
      "relevance": "為什麼這一段對客戶的問題很重要"
    }
  ]
}

如果完全無法從段落中得出答案，請回傳：
{
  "answer": "很抱歉，根據目前提供的手冊或文件，我暫時找不到關於這一點的具體紀錄。建議您可以聯繫專案團隊進一步確認，或嘗試詢問其他與流程相關的問題。",
  "citations": []
}"#;

/// The fixed system prompt.
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Render the user prompt: recent history, the question, then each
/// candidate paragraph with its ID, document and section.
pub fn user_prompt(request: &AnswerRequest, history_window: usize) -> String {
    let mut prompt = String::new();

    let recent = &request.history[request.history.len().saturating_sub(history_window)..];
    if !recent.is_empty() {
        prompt.push_str("以下是您與使用者的近期對話紀錄（供理解上下文使用）：\n");
        for message in recent {
            let speaker = match message.role {
                Role::User => "User",
                Role::Ai => "Advisor",
            };
            let _ = writeln!(prompt, "{speaker}: {}", message.content);
        }
        prompt.push_str("---\n\n");
    }

    let _ = writeln!(prompt, "問題：{}\n", request.question);
    prompt.push_str("文件段落：\n");

    let blocks: Vec<String> = request
        .chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "[段落 {}]\n文件：{}\n段落 ID：{}\n章節：{}\n內容：\n{}\n",
                i + 1,
                chunk.document_title,
                chunk.paragraph_id,
                chunk.section_title.as_deref().unwrap_or("無"),
                chunk.content
            )
        })
        .collect();
    prompt.push_str(&blocks.join("\n---\n"));

    prompt.push_str(
        "\n請根據上述段落回答問題。請參考對話歷史來理解使用者的代名詞所指涉的對象，\
         但回答必須基於文件段落的事實。若段落中無相關內容，請明確回覆「文件中未找到可支持的內容。」\
         並回傳空的 citations 陣列。",
    );
    prompt
}
