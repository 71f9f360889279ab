pub mod accounting;

pub use accounting::AccountingService;
