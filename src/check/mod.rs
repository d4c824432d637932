//! One monitoring pass and the read-only status query.
//!
//! ```text
//! Idle -> Resolving -> Classifying -> Safe ------------------------> Persisting -> Done
//!             |                    -> Unsafe -> Gating -> Notifying -> Persisting -> Done
//!             +-- discovery failed ------------------------------------> Persisting -> Done
//! ```

mod orchestrator;
mod outcome;


pub use orchestrator::CheckOrchestrator;
pub use outcome::{AlertOutcome, CheckOutcome, CheckReport, StatusSnapshot};
