//! Test fixtures for nut-term testing.
//!
//! Provides:
//! - `MockEditor`: scripted `LineEditor` that records prompts and attach/detach calls
//! - `MockTerminal`: `Terminal` with replayable raw input and a disposal counter
//! - `Transcript`: ordered capture of everything either collaborator printed

#![allow(dead_code)]

use nut_term::{CompletionHandler, LineEditor, ReadError, Subscription, Terminal};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

// ============================================================================
// Transcript - shared output capture
// ============================================================================

/// One output event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Out {
    /// `Terminal::write`
    Write(String),
    /// `LineEditor::println`
    Line(String),
    /// `LineEditor::print_wide`
    Wide(Vec<String>),
    /// `Terminal::clear`
    Clear,
}

/// Output shared by the mock editor and terminal, in call order.
#[derive(Debug, Clone, Default)]
pub struct Transcript(Rc<RefCell<Vec<Out>>>);

impl Transcript {
    pub fn push(&self, out: Out) {
        self.0.borrow_mut().push(out);
    }

    pub fn events(&self) -> Vec<Out> {
        self.0.borrow().clone()
    }

    /// Printed lines only (`println` calls).
    pub fn lines(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|out| match out {
                Out::Line(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Raw writes only.
    pub fn writes(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|out| match out {
                Out::Write(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Render everything as terminal text.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for out in self.0.borrow().iter() {
            match out {
                Out::Write(s) => text.push_str(s),
                Out::Line(s) => {
                    text.push_str(s);
                    text.push('\n');
                }
                Out::Wide(items) => {
                    text.push_str(&items.join("  "));
                    text.push('\n');
                }
                Out::Clear => {}
            }
        }
        text
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

// ============================================================================
// MockEditor - scripted LineEditor
// ============================================================================

/// Scripted input for the editor.
#[derive(Debug)]
pub enum Input {
    /// Resolve the next read with this text
    Line(String),
    /// Stay pending until `abort_read`
    Hang,
}

/// Mock line editor.
///
/// Reads pop scripted input; an empty script reports `ReadError::Closed`,
/// which ends `Shell::repl()`.
pub struct MockEditor {
    input: RefCell<VecDeque<Input>>,
    prompts: RefCell<Vec<String>>,
    pending_abort: RefCell<Option<oneshot::Sender<String>>>,
    completion: RefCell<Option<CompletionHandler>>,
    attaches: Cell<usize>,
    detaches: Cell<usize>,
    attached: Cell<bool>,
    transcript: Transcript,
}

impl MockEditor {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            input: RefCell::new(VecDeque::new()),
            prompts: RefCell::new(Vec::new()),
            pending_abort: RefCell::new(None),
            completion: RefCell::new(None),
            attaches: Cell::new(0),
            detaches: Cell::new(0),
            attached: Cell::new(true),
            transcript,
        }
    }

    /// Queue lines for subsequent reads.
    pub fn push_lines(&self, lines: &[&str]) {
        let mut input = self.input.borrow_mut();
        for line in lines {
            input.push_back(Input::Line(line.to_string()));
        }
    }

    /// Queue a read that only ends through `abort_read`.
    pub fn push_hang(&self) {
        self.input.borrow_mut().push_back(Input::Hang);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn attaches(&self) -> usize {
        self.attaches.get()
    }

    pub fn detaches(&self) -> usize {
        self.detaches.get()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    pub fn has_completion(&self) -> bool {
        self.completion.borrow().is_some()
    }

    /// Invoke the installed completion handler like a Tab press would.
    pub fn complete(&self, index: usize, tokens: &[&str]) -> Vec<String> {
        let tokens: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
        match self.completion.borrow().as_ref() {
            Some(handler) => handler(index, &tokens),
            None => Vec::new(),
        }
    }

    async fn next_input(&self, prompt: &str) -> Result<String, ReadError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        let next = self.input.borrow_mut().pop_front();
        match next {
            Some(Input::Line(line)) => Ok(line),
            Some(Input::Hang) => {
                let (tx, rx) = oneshot::channel();
                *self.pending_abort.borrow_mut() = Some(tx);
                match rx.await {
                    Ok(reason) => Err(ReadError::Aborted(reason)),
                    Err(_) => Err(ReadError::Closed),
                }
            }
            None => Err(ReadError::Closed),
        }
    }
}

impl LineEditor for MockEditor {
    fn attach(&self) {
        self.attaches.set(self.attaches.get() + 1);
        self.attached.set(true);
    }

    fn detach(&self) {
        self.detaches.set(self.detaches.get() + 1);
        self.attached.set(false);
    }

    async fn read(&self, prompt: &str) -> Result<String, ReadError> {
        self.next_input(prompt).await
    }

    async fn read_char(&self, prompt: &str) -> Result<String, ReadError> {
        let line = self.next_input(prompt).await?;
        Ok(line.chars().next().map(String::from).unwrap_or_default())
    }

    fn abort_read(&self, reason: &str) {
        if let Some(tx) = self.pending_abort.borrow_mut().take() {
            let _ = tx.send(reason.to_string());
        }
    }

    fn println(&self, message: &str) {
        self.transcript.push(Out::Line(message.to_string()));
    }

    fn print_wide(&self, items: &[String]) {
        self.transcript.push(Out::Wide(items.to_vec()));
    }

    fn add_autocomplete_handler(&self, handler: CompletionHandler) {
        *self.completion.borrow_mut() = Some(handler);
    }
}

// ============================================================================
// MockTerminal - raw input source
// ============================================================================

/// Subscription handed out by `MockTerminal::on_data`.
#[derive(Debug)]
pub struct MockSubscription {
    sink: Rc<RefCell<Option<UnboundedSender<String>>>>,
    disposals: Rc<Cell<usize>>,
}

impl Subscription for MockSubscription {
    fn dispose(&mut self) {
        self.disposals.set(self.disposals.get() + 1);
        self.sink.borrow_mut().take();
    }
}

/// Mock terminal.
///
/// Chunks queued with `queue_data` are delivered as soon as a subscriber
/// appears. With `close_after_replay`, the event source then goes away.
#[derive(Debug)]
pub struct MockTerminal {
    queued: RefCell<VecDeque<String>>,
    close_after_replay: Cell<bool>,
    sink: Rc<RefCell<Option<UnboundedSender<String>>>>,
    subscriptions: Cell<usize>,
    disposals: Rc<Cell<usize>>,
    cols: u16,
    rows: u16,
    transcript: Transcript,
}

impl MockTerminal {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            queued: RefCell::new(VecDeque::new()),
            close_after_replay: Cell::new(false),
            sink: Rc::new(RefCell::new(None)),
            subscriptions: Cell::new(0),
            disposals: Rc::new(Cell::new(0)),
            cols: 100,
            rows: 30,
            transcript,
        }
    }

    /// Queue raw chunks for the next subscriber.
    pub fn queue_data(&self, chunks: &[&str]) {
        let mut queued = self.queued.borrow_mut();
        for chunk in chunks {
            queued.push_back(chunk.to_string());
        }
    }

    /// Drop the sink after replaying queued data.
    pub fn close_after_replay(&self) {
        self.close_after_replay.set(true);
    }

    /// Deliver a chunk to the current subscriber. Returns false if none.
    pub fn send(&self, chunk: &str) -> bool {
        match self.sink.borrow().as_ref() {
            Some(sink) => sink.send(chunk.to_string()).is_ok(),
            None => false,
        }
    }

    /// Simulate the event source going away.
    pub fn close_source(&self) {
        self.sink.borrow_mut().take();
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.get()
    }

    pub fn disposals(&self) -> usize {
        self.disposals.get()
    }

    pub fn has_subscriber(&self) -> bool {
        self.sink.borrow().is_some()
    }
}

impl Terminal for MockTerminal {
    type Subscription = MockSubscription;

    fn write(&self, text: &str) {
        self.transcript.push(Out::Write(text.to_string()));
    }

    fn clear(&self) {
        self.transcript.push(Out::Clear);
    }

    fn on_data(&self, sink: UnboundedSender<String>) -> MockSubscription {
        self.subscriptions.set(self.subscriptions.get() + 1);

        for chunk in self.queued.borrow_mut().drain(..) {
            let _ = sink.send(chunk);
        }
        if !self.close_after_replay.get() {
            *self.sink.borrow_mut() = Some(sink);
        }

        MockSubscription {
            sink: Rc::clone(&self.sink),
            disposals: Rc::clone(&self.disposals),
        }
    }

    fn cols(&self) -> u16 {
        self.cols
    }

    fn rows(&self) -> u16 {
        self.rows
    }
}
