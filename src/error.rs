//! Catalog-integrity and infeasible-forced-placement failures are fatal
//! and abort the search before it begins; "no solution" is not an error
//! (it's a normal, sentinel search result) and is therefore not
//! represented here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("partial assignment names section '{0}', which does not exist in the catalog")]
    UnknownSection(String),

    #[error("partial assignment for '{identifier}' names ({day}, {time}) but no matching {kind} slot exists")]
    UnknownSlot {
        identifier: String,
        day: String,
        time: String,
        kind: &'static str,
    },

    #[error("forced placement of '{identifier}' at ({day}, {time}) fails a hard constraint")]
    InfeasibleForcedPlacement {
        identifier: String,
        day: String,
        time: String,
    },
}
