//! Scripted in-memory `Page` for strategy and solver tests
//!
//! Each scripted queue pops one entry per call; an exhausted queue falls
//! back to the per-method default noted on the trait impl. All interactions
//! are recorded so tests can assert on the exact driver traffic.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use brlaw_browser::{BoundingBox, BrowserError, Frame, LoadState, Page, Result as BrowserResult};
use serde_json::Value;

#[derive(Default)]
pub(crate) struct FakePage {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    title: String,
    title_queue: VecDeque<String>,
    fail_title: bool,
    // None entries simulate a timed-out read of the hidden input
    token_reads: VecDeque<Option<String>>,
    frames: Vec<Frame>,
    bounding_box: Option<BoundingBox>,
    goto_failures: VecDeque<String>,
    texts_of_all: HashMap<String, VecDeque<Vec<String>>>,
    text_contents: HashMap<String, VecDeque<Option<String>>>,
    evaluations: VecDeque<Result<Value, String>>,
    // Recorded traffic
    gotos: Vec<String>,
    clicks_at: Vec<(f64, f64)>,
    clicked: Vec<String>,
    filled: Vec<(String, String)>,
    pressed: Vec<(String, String)>,
    evaluated: Vec<(String, Value)>,
    load_waits: Vec<LoadState>,
    frames_calls: usize,
    closed: bool,
}

impl FakePage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_title(&self, title: &str) {
        self.inner.lock().unwrap().title = title.to_string();
    }

    /// Queue a title for the next read; later reads fall back to the fixed
    /// title. Lets tests script a challenge page that resolves.
    pub(crate) fn push_title(&self, title: &str) {
        self.inner
            .lock()
            .unwrap()
            .title_queue
            .push_back(title.to_string());
    }

    pub(crate) fn fail_title_reads(&self) {
        self.inner.lock().unwrap().fail_title = true;
    }

    pub(crate) fn push_token(&self, value: Option<&str>) {
        self.inner
            .lock()
            .unwrap()
            .token_reads
            .push_back(value.map(str::to_string));
    }

    pub(crate) fn set_frames(&self, frames: Vec<Frame>) {
        self.inner.lock().unwrap().frames = frames;
    }

    pub(crate) fn set_bounding_box(&self, bounding_box: BoundingBox) {
        self.inner.lock().unwrap().bounding_box = Some(bounding_box);
    }

    pub(crate) fn fail_next_goto(&self, message: &str) {
        self.inner
            .lock()
            .unwrap()
            .goto_failures
            .push_back(message.to_string());
    }

    /// Queue the per-extraction element texts for a selector.
    pub(crate) fn push_texts(&self, selector: &str, texts: &[&str]) {
        self.inner
            .lock()
            .unwrap()
            .texts_of_all
            .entry(selector.to_string())
            .or_default()
            .push_back(texts.iter().map(|t| t.to_string()).collect());
    }

    /// Queue a text-content read for a selector; `None` simulates a
    /// timed-out read.
    pub(crate) fn push_text_content(&self, selector: &str, text: Option<&str>) {
        self.inner
            .lock()
            .unwrap()
            .text_contents
            .entry(selector.to_string())
            .or_default()
            .push_back(text.map(str::to_string));
    }

    pub(crate) fn push_evaluation(&self, result: Result<Value, &str>) {
        self.inner
            .lock()
            .unwrap()
            .evaluations
            .push_back(result.map_err(str::to_string));
    }

    pub(crate) fn gotos(&self) -> Vec<String> {
        self.inner.lock().unwrap().gotos.clone()
    }

    pub(crate) fn clicks_at(&self) -> Vec<(f64, f64)> {
        self.inner.lock().unwrap().clicks_at.clone()
    }

    pub(crate) fn clicked(&self) -> Vec<String> {
        self.inner.lock().unwrap().clicked.clone()
    }

    pub(crate) fn filled(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().filled.clone()
    }

    pub(crate) fn pressed(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().pressed.clone()
    }

    pub(crate) fn evaluated(&self) -> Vec<(String, Value)> {
        self.inner.lock().unwrap().evaluated.clone()
    }

    pub(crate) fn load_waits(&self) -> Vec<LoadState> {
        self.inner.lock().unwrap().load_waits.clone()
    }

    pub(crate) fn frames_calls(&self) -> usize {
        self.inner.lock().unwrap().frames_calls
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }
}

#[async_trait]
impl Page for FakePage {
    // Default: succeeds
    async fn goto(&self, url: &str, _wait_until: LoadState) -> BrowserResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.gotos.push(url.to_string());
        match inner.goto_failures.pop_front() {
            Some(message) => Err(BrowserError::Timeout(message)),
            None => Ok(()),
        }
    }

    // Default: the fixed title
    async fn title(&self) -> BrowserResult<String> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_title {
            return Err(BrowserError::Extraction("title read failed".into()));
        }
        Ok(inner
            .title_queue
            .pop_front()
            .unwrap_or_else(|| inner.title.clone()))
    }

    // Default: times out, as if the field were absent
    async fn input_value(&self, selector: &str, _timeout: Duration) -> BrowserResult<String> {
        let mut inner = self.inner.lock().unwrap();
        match inner.token_reads.pop_front() {
            Some(Some(value)) => Ok(value),
            _ => Err(BrowserError::Timeout(selector.to_string())),
        }
    }

    async fn frames(&self) -> BrowserResult<Vec<Frame>> {
        let mut inner = self.inner.lock().unwrap();
        inner.frames_calls += 1;
        Ok(inner.frames.clone())
    }

    async fn frame_bounding_box(&self, _url_fragment: &str) -> BrowserResult<Option<BoundingBox>> {
        Ok(self.inner.lock().unwrap().bounding_box)
    }

    async fn click_at(&self, x: f64, y: f64) -> BrowserResult<()> {
        self.inner.lock().unwrap().clicks_at.push((x, y));
        Ok(())
    }

    async fn wait_for_selector(&self, _selector: &str, _timeout: Duration) -> BrowserResult<()> {
        Ok(())
    }

    async fn click(&self, selector: &str) -> BrowserResult<()> {
        self.inner.lock().unwrap().clicked.push(selector.to_string());
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> BrowserResult<()> {
        self.inner
            .lock()
            .unwrap()
            .filled
            .push((selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn press(&self, selector: &str, key: &str) -> BrowserResult<()> {
        self.inner
            .lock()
            .unwrap()
            .pressed
            .push((selector.to_string(), key.to_string()));
        Ok(())
    }

    // Default: times out, as if the element never appeared
    async fn text_content(&self, selector: &str, _timeout: Duration) -> BrowserResult<String> {
        let mut inner = self.inner.lock().unwrap();
        match inner
            .text_contents
            .get_mut(selector)
            .and_then(VecDeque::pop_front)
        {
            Some(Some(text)) => Ok(text),
            _ => Err(BrowserError::Timeout(selector.to_string())),
        }
    }

    // Default: zero matches
    async fn texts_of_all(&self, selector: &str) -> BrowserResult<Vec<String>> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner
            .texts_of_all
            .get_mut(selector)
            .and_then(VecDeque::pop_front)
            .unwrap_or_default())
    }

    async fn wait_for_load(&self, state: LoadState, _timeout: Duration) -> BrowserResult<()> {
        self.inner.lock().unwrap().load_waits.push(state);
        Ok(())
    }

    async fn wait_for_function(&self, _expression: &str, _timeout: Duration) -> BrowserResult<()> {
        Ok(())
    }

    // Default: null result
    async fn evaluate(&self, script: &str, arg: Value) -> BrowserResult<Value> {
        let mut inner = self.inner.lock().unwrap();
        inner.evaluated.push((script.to_string(), arg));
        match inner.evaluations.pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(BrowserError::Script(message)),
            None => Ok(Value::Null),
        }
    }

    async fn close(&self) -> BrowserResult<()> {
        self.inner.lock().unwrap().closed = true;
        Ok(())
    }
}
