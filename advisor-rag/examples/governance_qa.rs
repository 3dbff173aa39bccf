//! # Governance Q&A Example
//!
//! Builds a corpus from two small Markdown documents, asks a few questions
//! through [`QaPipeline`], and prints the answers with their citations.
//!
//! Uses an offline `ExtractiveAnswerer` that quotes the best paragraph, so it
//! needs **zero API keys**. With the `openai` feature enabled and
//! `OPENAI_API_KEY` set, the OpenAI answerer is used instead.
//!
//! Run: `RUST_LOG=advisor_rag=debug cargo run --example governance_qa`

use std::sync::Arc;

use advisor_rag::{
    AnswerError, AnswerRequest, Answerer, CandidateSelection, ChatMessage, Citation, Corpus,
    QaPipeline, RawAnswer, SourceDocument, TourSelection,
};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// ExtractiveAnswerer: quotes the top candidate paragraph
// ---------------------------------------------------------------------------

struct ExtractiveAnswerer;

#[async_trait::async_trait]
impl Answerer for ExtractiveAnswerer {
    async fn answer(&self, request: AnswerRequest) -> Result<RawAnswer, AnswerError> {
        let Some(best) = request.chunks.first() else {
            return Ok(RawAnswer::default());
        };
        Ok(RawAnswer {
            answer: format!("根據《{}》：{}", best.document_title, best.content),
            citations: vec![
                Citation::new(best.paragraph_id.clone(), "最相關的段落"),
                // Answerers may cite paragraphs they were never shown.
                Citation::new("unknown-p0", "fabricated"),
            ],
        })
    }
}

#[cfg(feature = "openai")]
fn answerer() -> Arc<dyn Answerer> {
    match advisor_rag::OpenAIAnswerer::from_env() {
        Ok(openai) => Arc::new(openai),
        Err(_) => Arc::new(ExtractiveAnswerer),
    }
}

#[cfg(not(feature = "openai"))]
fn answerer() -> Arc<dyn Answerer> {
    Arc::new(ExtractiveAnswerer)
}

// ---------------------------------------------------------------------------
// Sample documents
// ---------------------------------------------------------------------------

const CHARTER: &str = r#"# 專案章程

本專案旨在協助組織建立數位治理流程，涵蓋文件管理與決策紀錄。

## 治理結構

治理委員會每月召開一次會議，負責審核專案進度與風險。

專案經理負責日常協調，並向委員會提交月報。
"#;

const PROPOSAL: &str = r#"# 方案提案

## 導入方案

基礎節奏導入：適合剛開始建立治理流程的組織，著重於會議與文件規範。

成長優化導入：適合已有基本流程的組織，加入自動化提醒與報表。

## 費用

專案導入費用依方案層級計價，維護方案費用按月收取。
"#;

#[tokio::main]
async fn main() -> advisor_rag::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let corpus = Corpus::build(&[
        SourceDocument::new("doc-charter", "專案章程", CHARTER),
        SourceDocument::new("doc-proposal", "方案提案", PROPOSAL),
    ]);
    println!("Corpus: {} paragraphs\n", corpus.len());

    let pipeline = QaPipeline::builder().answerer(answerer()).build()?;

    let mut history: Vec<ChatMessage> = Vec::new();
    for question in ["維護費用怎麼計算？", "治理委員會多久開會？", "kubernetes"] {
        let outcome =
            pipeline.ask(question, &corpus, CandidateSelection::Ranked, history.clone()).await;
        println!("Q: {question}\n[{:?}] {}", outcome.state, outcome.response.answer);
        for citation in &outcome.response.citations {
            println!("  ↳ {} ({})", citation.paragraph_id, citation.relevance);
        }
        println!();
        history.push(ChatMessage::user(question));
        history.push(ChatMessage::ai(outcome.response.answer));
    }

    let tour = TourSelection::default().select(&corpus);
    let outcome = pipeline.ask("請為我導讀這份提案。", &corpus, tour, Vec::new()).await;
    println!("Tour: {}", outcome.response.answer);

    Ok(())
}
