use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

// Twitter snowflake epoch, 2010-11-04T01:42:54.657Z
const EPOCH_MS: u64 = 1_288_834_974_657;

const WORKER_ID_BITS: u8 = 5;
const PROCESS_ID_BITS: u8 = 5;
const SEQUENCE_BITS: u8 = 12;

const MAX_WORKER_ID: u64 = (1 << WORKER_ID_BITS) - 1;
const MAX_PROCESS_ID: u64 = (1 << PROCESS_ID_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

const PROCESS_ID_SHIFT: u8 = SEQUENCE_BITS;
const WORKER_ID_SHIFT: u8 = SEQUENCE_BITS + PROCESS_ID_BITS;
const TIMESTAMP_SHIFT: u8 = SEQUENCE_BITS + PROCESS_ID_BITS + WORKER_ID_BITS;

/// Generator of unique, time-ordered string ids.
///
/// Snowflake layout: 41-bit millisecond timestamp, 5-bit worker id, 5-bit
/// process id, 12-bit per-millisecond sequence, rendered as a base-10
/// string. Single-writer assumption: uniqueness holds within one deployment
/// of the service, with no cross-instance coordination.
pub struct SnowflakeGenerator {
    worker_id: u64,
    process_id: u64,
    state: Mutex<GeneratorState>,
}

struct GeneratorState {
    last_timestamp: u64,
    sequence: u64,
}

impl SnowflakeGenerator {
    /// Create a new generator.
    ///
    /// # Panics
    /// Panics if `worker_id` or `process_id` exceed their 5-bit range.
    pub fn new(worker_id: u64, process_id: u64) -> Self {
        assert!(worker_id <= MAX_WORKER_ID, "worker_id out of range");
        assert!(process_id <= MAX_PROCESS_ID, "process_id out of range");

        Self {
            worker_id,
            process_id,
            state: Mutex::new(GeneratorState {
                last_timestamp: 0,
                sequence: 0,
            }),
        }
    }

    /// Generate the next unique id.
    ///
    /// Ids never repeat within the process lifetime: the sequence counter
    /// disambiguates ids minted in the same millisecond, and the generator
    /// spins to the next millisecond when the sequence wraps.
    pub fn next_id(&self) -> String {
        let mut state = self.state.lock().expect("snowflake state lock poisoned");

        let mut now = current_millis();
        // Never move backwards, even if the wall clock does
        if now < state.last_timestamp {
            now = state.last_timestamp;
        }

        if now == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                while now <= state.last_timestamp {
                    now = current_millis();
                }
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = now;

        let id = ((now - EPOCH_MS) << TIMESTAMP_SHIFT)
            | (self.worker_id << WORKER_ID_SHIFT)
            | (self.process_id << PROCESS_ID_SHIFT)
            | state.sequence;

        id.to_string()
    }
}

fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_millis() as u64
}
