pub mod doc;
pub mod human;
pub mod natural;
pub mod report;
pub mod table;
