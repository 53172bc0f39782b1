//! # Commands Module
//!
//! Every operation the application exposes. Commands take the state they
//! need explicitly and return `Result<T, ApiError>`; the CLI (or any other
//! front end) serializes `T` as JSON.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── kit.rs        ◄─── Recipe edits, kit availability and cost
//! ├── quotation.rs  ◄─── Quotation line edits and totals
//! └── shipment.rs   ◄─── Container catalog and allocation
//! ```
//!
//! ## State Injection
//! ```rust,ignore
//! // Only needs the registry
//! fn evaluate_composite(registry: &RegistryState, sku: &str, snapshot: &InventorySnapshot)
//!
//! // Only needs the quotation
//! fn edit_quotation_line(quotation: &QuotationState, id: &str, field: LineField)
//!
//! // Needs config for the default container
//! fn allocate_quotation(config: &AppConfig, quotation: &QuotationState, container: Option<&str>)
//! ```

pub mod kit;
pub mod quotation;
pub mod shipment;
