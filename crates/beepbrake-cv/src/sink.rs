//! Result sink adapters
//!
//! Closures become sinks through `FnSink`. The types here cover the two other
//! common cases: keeping every result in memory, and handing results to
//! another thread over a bounded channel.

use crate::traits::ResultSink;
use beepbrake_core::{Candidate, Size};
use image::GrayImage;
use serde::Serialize;
use std::sync::mpsc::{Receiver, SendError, SyncSender, sync_channel};
use tracing::warn;

/// One delivered result, recorded without the pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoundRecord {
    pub frame_size: Size,
    pub found: Option<Candidate>,
}

/// Keeps every delivered result in arrival order
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Vec<FoundRecord>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[FoundRecord] {
        &self.records
    }

    /// Selected candidates only, one entry per delivery
    pub fn found(&self) -> Vec<Option<Candidate>> {
        self.records.iter().map(|record| record.found).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ResultSink for RecordingSink {
    fn set_current_found_rect(&mut self, frame: &GrayImage, found: Option<Candidate>) {
        self.records.push(FoundRecord {
            frame_size: crate::utils::frame_size(frame),
            found,
        });
    }
}

/// Owned copy of one result, sent across threads
#[derive(Debug, Clone)]
pub struct DetectionEvent {
    pub sequence: u64,
    pub frame: GrayImage,
    pub found: Option<Candidate>,
}

/// Forwards results to a bounded channel
///
/// When the channel is full the detector blocks until the receiver catches
/// up, so every result is delivered. Only a disconnected receiver loses
/// events, and those are counted.
#[derive(Debug)]
pub struct ChannelSink {
    sender: SyncSender<DetectionEvent>,
    sequence: u64,
    dropped: u64,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its channel
    pub fn bounded(capacity: usize) -> (Self, Receiver<DetectionEvent>) {
        let (sender, receiver) = sync_channel(capacity);
        let sink = Self {
            sender,
            sequence: 0,
            dropped: 0,
        };
        (sink, receiver)
    }

    /// Events lost because the receiver was gone
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl ResultSink for ChannelSink {
    fn set_current_found_rect(&mut self, frame: &GrayImage, found: Option<Candidate>) {
        let event = DetectionEvent {
            sequence: self.sequence,
            frame: frame.clone(),
            found,
        };
        self.sequence += 1;

        if let Err(SendError(event)) = self.sender.send(event) {
            self.dropped += 1;
            warn!(sequence = event.sequence, "result receiver gone, dropping detection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FnSink;

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        let frame = GrayImage::new(4, 3);

        sink.set_current_found_rect(&frame, None);
        sink.set_current_found_rect(&frame, Some(Candidate::new(0, 0, 2, 2)));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.records()[0].frame_size, Size::new(4, 3));
        assert_eq!(sink.found(), vec![None, Some(Candidate::new(0, 0, 2, 2))]);
    }

    #[test]
    fn test_channel_sink_waits_for_slow_receiver() {
        let (mut sink, receiver) = ChannelSink::bounded(1);
        let consumer = std::thread::spawn(move || {
            receiver
                .iter()
                .map(|event| (event.sequence, event.found))
                .collect::<Vec<_>>()
        });
        let frame = GrayImage::new(2, 2);

        sink.set_current_found_rect(&frame, None);
        sink.set_current_found_rect(&frame, Some(Candidate::new(0, 0, 1, 1)));
        sink.set_current_found_rect(&frame, None);
        assert_eq!(sink.dropped(), 0);
        drop(sink);

        let delivered = consumer.join().expect("consumer thread");
        assert_eq!(
            delivered,
            vec![(0, None), (1, Some(Candidate::new(0, 0, 1, 1))), (2, None)]
        );
    }

    #[test]
    fn test_channel_sink_disconnected() {
        let (mut sink, receiver) = ChannelSink::bounded(4);
        drop(receiver);

        sink.set_current_found_rect(&GrayImage::new(2, 2), None);

        assert_eq!(sink.dropped(), 1);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = FnSink(|_: &GrayImage, found: Option<Candidate>| seen.push(found));
            sink.set_current_found_rect(&GrayImage::new(1, 1), None);
        }
        assert_eq!(seen, vec![None]);
    }

    #[test]
    fn test_borrowed_sink_forwards() {
        fn deliver<S: ResultSink>(mut sink: S) {
            sink.set_current_found_rect(&GrayImage::new(3, 3), None);
        }

        let mut recorder = RecordingSink::new();
        deliver(&mut recorder);
        deliver(Box::new(&mut recorder));

        assert_eq!(recorder.len(), 2);
    }
}
