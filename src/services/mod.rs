use crate::error::Error;
use anyhow::Result;
use uuid::Uuid;

pub mod accounts;
pub mod issues;
pub mod machines;

#[cfg(test)]
mod tests;

/// Parse an opaque record id; malformed ids fail as InvalidInput before
/// any lookup or policy check runs
pub(crate) fn parse_id(id: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(id)
        .map_err(|_| Error::InvalidInput(format!("Invalid {} ID: {}", what, id)).into())
}
