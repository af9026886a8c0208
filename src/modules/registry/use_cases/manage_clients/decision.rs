use crate::modules::registry::core::records::ClientRecord;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("client name is required")]
    EmptyName,

    #[error("a client named {name} already exists")]
    DuplicateName { name: String },

    #[error("no client named {name}")]
    ClientNotFound { name: String },
}

pub enum Decision {
    Added {
        record: ClientRecord,
    },
    Renamed {
        previous: ClientRecord,
        record: ClientRecord,
    },
    Rejected {
        reason: DecideError,
    },
}
