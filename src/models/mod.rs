pub mod area;
pub mod attachment;
pub mod dashboard;
pub mod inspection;
pub mod inspector;
pub mod pmi;
pub mod response;

/// Partition key of an inspection and every record hanging off it.
pub fn inspection_pk(so_number: &str) -> String {
    format!("INSPECTION#{so_number}")
}

/// Default for boolean flags that are on unless stated otherwise.
pub(crate) fn default_true() -> bool {
    true
}
