pub mod agents;
pub mod calendar;
pub mod leads;
