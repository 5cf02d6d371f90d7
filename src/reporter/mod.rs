pub(crate) mod reporter;
pub(crate) mod table_reporter;

pub use reporter::Reporter;
pub use table_reporter::TableReporter;
