// ── Domain model ──
//
// Scan records flow in, logical entries flow out. Every type here is a
// plain value: cloneable, serializable, free of interior mutability.

pub mod entry;
pub mod radio;
pub mod scan;
pub mod security;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use wifitrack_core::model::*` gives you everything.

pub use entry::{CanonicalKey, WifiEntry};
pub use radio::RadioState;
pub use scan::{NativeScanRecord, RawScanRecord};
pub use security::SecurityClass;
