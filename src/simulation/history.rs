//! Rolling queue-length history for display
//!
//! Mirrors what the live chart consumes: one sample per simulated second,
//! bounded to the most recent window.

use std::collections::VecDeque;

use super::metrics::TrafficData;

/// Number of samples kept in the rolling window
pub const HISTORY_CAPACITY: usize = 10;

/// One queue-length sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueSample {
    /// Simulation time the sample was taken at
    pub time: f32,
    pub ns_waiting: usize,
    pub ew_waiting: usize,
}

/// Fixed-capacity rolling window of queue-length samples
#[derive(Debug, Clone)]
pub struct QueueHistory {
    capacity: usize,
    samples: VecDeque<QueueSample>,
}

impl Default for QueueHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl QueueHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, dropping the oldest once the window is full
    pub fn record(&mut self, time: f32, data: &TrafficData) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(QueueSample {
            time,
            ns_waiting: data.ns.waiting,
            ew_waiting: data.ew.waiting,
        });
    }

    pub fn samples(&self) -> impl Iterator<Item = &QueueSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&QueueSample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
