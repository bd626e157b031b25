use tracing::debug;

use super::lines::{classify_line, resolve_image_url, LineKind};
use crate::record::{Record, SourceDescriptor};

/// Scanner state between lines.
enum ScanState {
    /// No heading seen yet; lines are ignored.
    Idle,
    Open(OpenRecord),
}

/// The record currently being filled in.
struct OpenRecord {
    record: Record,
    blocks: Vec<String>,
    in_quote_run: bool,
}

impl OpenRecord {
    fn new(template: &Record, title: &str) -> Self {
        let mut record = template.clone();
        record.title = title.to_string();
        OpenRecord {
            record,
            blocks: Vec::new(),
            in_quote_run: false,
        }
    }

    /// First image wins.
    fn offer_preview(&mut self, url: Option<&str>, document_location: &str) {
        if self.record.preview.is_some() {
            return;
        }
        if let Some(url) = url {
            self.record.preview = Some(resolve_image_url(url, document_location));
        }
    }

    fn push_block(&mut self, content: &str) {
        self.in_quote_run = false;
        let content = content.trim();
        if !content.is_empty() {
            self.blocks.push(content.to_string());
        }
    }

    /// Quote lines glue onto the block started by the first line of their run.
    fn push_quote_line(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.blocks.last_mut() {
            Some(last) if self.in_quote_run => {
                last.push('\n');
                last.push_str(text);
            }
            _ => {
                self.blocks.push(text.to_string());
                self.in_quote_run = true;
            }
        }
    }

    fn end_quote_run(&mut self) {
        self.in_quote_run = false;
    }

    fn finalize(self) -> Option<Record> {
        let mut record = self.record;
        if !self.blocks.is_empty() {
            record.body = Some(self.blocks.join("\n\n"));
        }
        if record.is_complete() {
            Some(record)
        } else {
            debug!("Dropping entry without prompt or preview: {:?}", record.title);
            None
        }
    }
}

impl ScanState {
    fn close_into(self, records: &mut Vec<Record>) {
        if let ScanState::Open(open) = self {
            records.extend(open.finalize());
        }
    }
}

/// Extract prompt records from an awesome-list style markdown document.
///
/// Every `##`-or-deeper heading opens a record. Fenced blocks and quote runs
/// below it form the body, the first image becomes the preview. Records with
/// neither are dropped. Never fails; unusable input yields an empty vec.
pub fn extract(document: &str, source: &SourceDescriptor) -> Vec<Record> {
    let lines: Vec<&str> = document.lines().collect();
    let template = Record::seeded(source);
    let location = source.location.as_str();

    let mut records = Vec::new();
    let mut state = ScanState::Idle;
    let mut cursor = 0;

    while cursor < lines.len() {
        let kind = classify_line(lines[cursor]);
        cursor += 1;

        state = match (state, kind) {
            (state, LineKind::Heading { title }) => {
                state.close_into(&mut records);
                ScanState::Open(OpenRecord::new(&template, title))
            }
            (ScanState::Idle, _) => ScanState::Idle,
            (ScanState::Open(mut open), LineKind::FenceOpen { marker }) => {
                let (captured, next) = capture_fence(&lines, cursor, marker);
                cursor = next;
                open.push_block(&captured);
                ScanState::Open(open)
            }
            (ScanState::Open(mut open), LineKind::Quote { text, image }) => {
                open.offer_preview(image, location);
                open.push_quote_line(text);
                ScanState::Open(open)
            }
            (ScanState::Open(mut open), LineKind::Image { url }) => {
                open.offer_preview(Some(url), location);
                open.end_quote_run();
                ScanState::Open(open)
            }
            (ScanState::Open(mut open), LineKind::Other) => {
                open.end_quote_run();
                ScanState::Open(open)
            }
        };
    }

    state.close_into(&mut records);
    records
}

/// Collect lines from `start` up to the closing fence.
/// Returns the captured text and the index just past the closing fence
/// (or the end of input when the fence never closes).
fn capture_fence(lines: &[&str], start: usize, marker: &str) -> (String, usize) {
    let end = lines[start..]
        .iter()
        .position(|l| l.trim().starts_with(marker))
        .map_or(lines.len(), |offset| start + offset);
    let captured = lines[start..end].join("\n");
    (captured, (end + 1).min(lines.len()))
}

// ── Tests ──
