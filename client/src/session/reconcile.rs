//! Checksum reconciliation policy.

/// Outcome of comparing checksums after one upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Checksums agree: acknowledge and finish.
    Accept,
    /// Mismatch with attempts to spare: announce a resend.
    Resend,
    /// Mismatch on the final attempt: give up.
    Abort,
}

/// Decides what to do after an upload attempt. Attempts count from 1. The
/// comparison runs before any retry is announced, so a match on the first
/// attempt never produces a retry message, and exactly one verdict is acted
/// on per attempt.
pub fn verdict(local_crc: u32, remote_crc: u32, attempt: u32, max_attempts: u32) -> Verdict {
    if local_crc == remote_crc {
        Verdict::Accept
    } else if attempt < max_attempts {
        Verdict::Resend
    } else {
        Verdict::Abort
    }
}
