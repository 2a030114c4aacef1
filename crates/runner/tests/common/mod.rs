//! Shared in-process stubs for exercising the row pipeline without a network
//! or a file system.

// Each integration-test binary uses a different subset of these stubs.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pipeline::{
    AnalysisError, Caption, Confidence, ImageAnalyzer, ImageUrl, InputRecord, OutputRecord,
    RecordEvent, RecordSink, RecordSource, SinkError, SourceError, Tag,
};

pub fn url(value: &str) -> ImageUrl {
    ImageUrl::new(value).unwrap()
}

pub fn caption(text: &str, confidence: f64) -> Caption {
    Caption {
        text: text.into(),
        confidence: Confidence::new(confidence).unwrap(),
    }
}

pub fn tag(name: &str, confidence: f64) -> Tag {
    Tag {
        name: name.into(),
        confidence: Confidence::new(confidence).unwrap(),
    }
}

// ---------------------------------------------------------------------------
// Analyzer stub
// ---------------------------------------------------------------------------

/// Per-URL behaviour of the [`ScriptedAnalyzer`].
pub enum Script {
    /// Both calls succeed immediately.
    Succeed { caption: Caption, tags: Vec<Tag> },
    /// The describe call fails with a transport error.
    FailDescribe,
    /// Describe succeeds, the tag call fails.
    FailTag { caption: Caption },
    /// The describe call sleeps for `delay` before succeeding.
    ///
    /// `completed` flips to `true` only if the sleep actually finishes, so a
    /// test can verify the pipeline dropped (cancelled) the call.
    Hang {
        delay: Duration,
        caption: Caption,
        completed: Arc<AtomicBool>,
    },
}

/// [`ImageAnalyzer`] whose behaviour is scripted per URL.
pub struct ScriptedAnalyzer {
    scripts: HashMap<String, Script>,
}

impl ScriptedAnalyzer {
    pub fn new(scripts: Vec<(&str, Script)>) -> Arc<Self> {
        Arc::new(Self {
            scripts: scripts
                .into_iter()
                .map(|(url, script)| (url.to_string(), script))
                .collect(),
        })
    }

    fn script_for(&self, url: &ImageUrl) -> &Script {
        self.scripts
            .get(url.as_str())
            .unwrap_or_else(|| panic!("no script for {url}"))
    }
}

#[async_trait]
impl ImageAnalyzer for ScriptedAnalyzer {
    async fn describe(&self, url: &ImageUrl) -> Result<Caption, AnalysisError> {
        match self.script_for(url) {
            Script::Succeed { caption, .. } | Script::FailTag { caption } => Ok(caption.clone()),
            Script::FailDescribe => Err(AnalysisError::Transport {
                message: "connection reset by peer".into(),
            }),
            Script::Hang {
                delay,
                caption,
                completed,
            } => {
                tokio::time::sleep(*delay).await;
                completed.store(true, Ordering::SeqCst);
                Ok(caption.clone())
            }
        }
    }

    async fn tag(&self, url: &ImageUrl) -> Result<Vec<Tag>, AnalysisError> {
        match self.script_for(url) {
            Script::Succeed { tags, .. } => Ok(tags.clone()),
            Script::Hang { .. } => Ok(Vec::new()),
            Script::FailDescribe | Script::FailTag { .. } => Err(AnalysisError::Service {
                status: 500,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Source and sink stubs
// ---------------------------------------------------------------------------

/// In-memory source that also asserts the backpressure contract: the pipeline
/// must have appended the previous record's row before pulling the next one.
pub struct VecSource {
    records: VecDeque<InputRecord>,
    appended: Arc<Mutex<Vec<OutputRecord>>>,
    served: usize,
}

impl VecSource {
    pub fn new(urls: &[&str], appended: Arc<Mutex<Vec<OutputRecord>>>) -> Self {
        Self {
            records: urls
                .iter()
                .map(|u| InputRecord { url: url(u) })
                .collect(),
            appended,
            served: 0,
        }
    }
}

#[async_trait]
impl RecordSource for VecSource {
    async fn next_record(&mut self) -> Result<RecordEvent, SourceError> {
        assert_eq!(
            self.appended.lock().unwrap().len(),
            self.served,
            "source advanced before the previous row was appended"
        );
        match self.records.pop_front() {
            Some(record) => {
                self.served += 1;
                Ok(RecordEvent::Record(record))
            }
            None => Ok(RecordEvent::Eof),
        }
    }

    fn source_name(&self) -> &str {
        "stub"
    }
}

/// Source that yields `good_rows` records and then fails like broken decode
/// machinery would.
pub struct FailingSource {
    inner: VecSource,
    good_rows: usize,
}

impl FailingSource {
    pub fn new(urls: &[&str], good_rows: usize, appended: Arc<Mutex<Vec<OutputRecord>>>) -> Self {
        Self {
            inner: VecSource::new(urls, appended),
            good_rows,
        }
    }
}

#[async_trait]
impl RecordSource for FailingSource {
    async fn next_record(&mut self) -> Result<RecordEvent, SourceError> {
        if self.good_rows == 0 {
            return Err(SourceError::Decode {
                row: (self.inner.served + 1) as u64,
                message: "truncated quoted field".into(),
            });
        }
        self.good_rows -= 1;
        self.inner.next_record().await
    }

    fn source_name(&self) -> &str {
        "failing-stub"
    }
}

/// Sink that collects rows into shared memory, optionally failing every append.
pub struct VecSink {
    rows: Arc<Mutex<Vec<OutputRecord>>>,
    fail: bool,
}

impl VecSink {
    pub fn new(rows: Arc<Mutex<Vec<OutputRecord>>>) -> Self {
        Self { rows, fail: false }
    }

    pub fn failing(rows: Arc<Mutex<Vec<OutputRecord>>>) -> Self {
        Self { rows, fail: true }
    }
}

#[async_trait]
impl RecordSink for VecSink {
    async fn append(&mut self, record: &OutputRecord) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::Io {
                message: "no space left on device".into(),
            });
        }
        self.rows.lock().unwrap().push(record.clone());
        Ok(())
    }
}
