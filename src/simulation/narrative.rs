//! Canned narratives returned by the simulation endpoints.
//!
//! Every function here is pure: the same input always renders the same lines.

/// Pipe narrative: the message is echoed verbatim twice.
pub fn pipe(message: &str) -> Vec<String> {
    vec![
        "🧪 Testing PIPE Communication...".to_string(),
        format!("Message received: '{message}'"),
        "Processing through pipe...".to_string(),
        format!("✅ Pipe Response: Processed: {message}"),
    ]
}

/// Message-queue narrative: the last line carries the uppercased message.
///
/// Uppercasing is full Unicode (`ß` becomes `SS`), not ASCII-only.
pub fn queue(message: &str) -> Vec<String> {
    vec![
        "🧪 Testing MESSAGE QUEUE...".to_string(),
        format!("Added '{message}' to queue."),
        "Processing message...".to_string(),
        format!("✅ Queue Response: {}", message.to_uppercase()),
    ]
}

/// Shared-memory narrative for one read-modify-write of the counter.
pub fn shared(old: i64, new: i64, increment: i64) -> Vec<String> {
    vec![
        "🧪 Testing SHARED MEMORY...".to_string(),
        format!("Original Value: {old}"),
        format!("Incrementing shared memory by {increment:+}..."),
        format!("✅ Shared Memory Updated: {old} → {new}"),
    ]
}

/// Two workers, two locks, opposite acquisition order.
pub const DEADLOCK_LINES: [&str; 7] = [
    "⚠️ Simulating DEADLOCK Scenario...",
    "Worker 1: Acquiring Lock 1...",
    "Worker 2: Acquiring Lock 2...",
    "Worker 1: Trying to acquire Lock 2... (DEADLOCK)",
    "Worker 2: Trying to acquire Lock 1... (DEADLOCK)",
    "🔴 DEADLOCK DETECTED! Both threads stuck.",
    "💡 Solution: Use consistent lock order or timeouts.",
];

/// Deadlock narrative. Takes no input.
pub fn deadlock() -> Vec<String> {
    DEADLOCK_LINES.iter().map(|s| s.to_string()).collect()
}
