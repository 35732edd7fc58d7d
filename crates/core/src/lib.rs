pub mod enums;
pub mod error;
pub mod ids;
pub mod records;
pub mod schedule;

pub use enums::{ContractStatus, Decoded, InvoiceStatus, JobStage, TemplateKey, TextEnum};
pub use error::CoreError;
pub use ids::*;
pub use records::{Business, Client, Contract, Invoice, Job, SyncState};
pub use schedule::{DayWindow, WeekSchedule};
