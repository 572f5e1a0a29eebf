//! Fakes and PDF fixtures shared by the analysis tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use reqwest::Url;

use crate::analysis::requester::AnalysisModel;
use crate::analysis::source::{FetchedResume, ResolveError, ResumeFetcher};
use crate::llm_client::LlmError;

/// One-page Helvetica PDF with one text line per entry.
pub fn sample_pdf(lines: &[&str]) -> Vec<u8> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("Td", vec![0.into(), (-18).into()]));
        }
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
    }
    operations.push(Operation::new("ET", vec![]));
    build_pdf(operations)
}

/// A page without any text operators, like a scanned image.
pub fn blank_pdf() -> Vec<u8> {
    build_pdf(vec![])
}

fn build_pdf(operations: Vec<Operation>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content stream"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize PDF");
    bytes
}

/// Serves the same body and content type for every URL and counts calls.
pub struct StaticFetcher {
    content_type: Option<String>,
    body: Bytes,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new(content_type: Option<&str>, body: &[u8]) -> Self {
        Self {
            content_type: content_type.map(String::from),
            body: Bytes::copy_from_slice(body),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResumeFetcher for StaticFetcher {
    async fn fetch(&self, _url: &Url) -> Result<FetchedResume, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(FetchedResume {
            content_type: self.content_type.clone(),
            body: self.body.clone(),
        })
    }
}

enum Script {
    Reply(String),
    Timeout,
    RateLimited,
}

/// Model double that returns a canned answer and records what it was sent.
pub struct ScriptedModel {
    script: Script,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_system: Mutex<Option<String>>,
}

impl ScriptedModel {
    fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_system: Mutex::new(None),
        }
    }

    pub fn reply(text: &str) -> Self {
        Self::new(Script::Reply(text.to_string()))
    }

    pub fn timeout() -> Self {
        Self::new(Script::Timeout)
    }

    pub fn rate_limited() -> Self {
        Self::new(Script::RateLimited)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    pub fn last_system(&self) -> Option<String> {
        self.last_system.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisModel for ScriptedModel {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_system.lock().unwrap() = Some(system.to_string());
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Timeout => Err(LlmError::Timeout(Duration::from_secs(60))),
            Script::RateLimited => Err(LlmError::RateLimited),
        }
    }
}
