use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkersConfig {
    /// Reader/processor pairs. `0` means one per available CPU.
    #[serde(default)]
    pub count: usize,

    /// Queue capacity is `count * queue_factor`.
    #[serde(default = "default_queue_factor")]
    pub queue_factor: usize,

    /// Size of pooled datagram buffers.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Per-processor bound on packets being handled concurrently.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl WorkersConfig {
    pub fn effective_count(&self) -> usize {
        if self.count > 0 {
            return self.count;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            count: 0,
            queue_factor: default_queue_factor(),
            buffer_size: default_buffer_size(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

fn default_queue_factor() -> usize {
    4
}

fn default_buffer_size() -> usize {
    512
}

fn default_max_in_flight() -> usize {
    64
}
