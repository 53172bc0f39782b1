//! # State Module
//!
//! Mutable editing state owned by the application. The engine itself holds
//! none; each state type wraps one editable document behind its own lock.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌────────────────────┐  ┌────────────────────┐  ┌──────────────────┐  │
//! │  │   RegistryState    │  │   QuotationState   │  │    AppConfig     │  │
//! │  │                    │  │                    │  │                  │  │
//! │  │  Arc<Mutex<        │  │  Arc<Mutex<        │  │  default         │  │
//! │  │   Composition      │  │   Quotation        │  │  container,      │  │
//! │  │   Registry>>       │  │  >>                │  │  currencies      │  │
//! │  └────────────────────┘  └────────────────────┘  └──────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Registry and quotation edits take their lock exclusively            │
//! │  • Independent states never block each other                           │
//! │  • AppConfig is read-only after startup                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod quotation;
mod registry;

pub use quotation::QuotationState;
pub use registry::RegistryState;
