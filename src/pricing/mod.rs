//! Pricing engine module for sheet and coil metal.
//!
//! Turns a region/metal/thickness/grade/width/volume/sort/credit request
//! into a price per ton and a total, using reference tables loaded once at
//! startup. `finance` adds loan, deposit and inflation helpers for quoting
//! deferred payment.

pub mod calculators;
pub mod finance;
pub mod loader;
pub mod models;
pub mod profile;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod tables;

// Re-export commonly used items
pub use calculators::round_money;
pub use finance::{accumulate_deposit, adjust_inflation, annuity_payment, FinanceError};
pub use loader::{load_default_tables, load_tables, TablesError};
pub use models::{MetalShape, PriceBreakdown, PricingInput, PricingResult};
pub use profile::PipelineProfile;
pub use routes::router;
pub use services::{PricingEngine, PricingError};
pub use tables::ReferenceTables;
