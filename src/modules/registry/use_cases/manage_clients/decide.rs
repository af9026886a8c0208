use crate::modules::registry::core::normalize::{normalize_integer, parse_quantity};
use crate::modules::registry::core::records::ClientRecord;
use crate::modules::registry::use_cases::manage_clients::{
    command::{AddClient, RenameClient},
    decision::{DecideError, Decision},
};

pub const CLIENT_CODE_PREFIX: &str = "C-";

/// Next code after the highest numbered one. Codes are never reused.
pub fn next_client_code(existing: &[ClientRecord]) -> String {
    let highest = existing
        .iter()
        .map(|client| normalize_integer(&client.client_code))
        .filter(|digits| !digits.is_empty())
        .map(|digits| parse_quantity(&digits))
        .max()
        .unwrap_or(0);
    format!("{CLIENT_CODE_PREFIX}{:03}", highest.saturating_add(1))
}

pub fn decide_add_client(existing: &[ClientRecord], command: AddClient) -> Decision {
    let name = command.name.trim().to_string();
    if name.is_empty() {
        return Decision::Rejected {
            reason: DecideError::EmptyName,
        };
    }
    if existing.iter().any(|client| client.has_name(&name)) {
        return Decision::Rejected {
            reason: DecideError::DuplicateName { name },
        };
    }

    let payer = match command.payer.trim() {
        "" => name.clone(),
        payer => payer.to_string(),
    };
    Decision::Added {
        record: ClientRecord {
            client_code: next_client_code(existing),
            name,
            payer,
        },
    }
}

pub fn decide_rename_client(existing: &[ClientRecord], command: RenameClient) -> Decision {
    let new_name = command.new_name.trim().to_string();
    if new_name.is_empty() {
        return Decision::Rejected {
            reason: DecideError::EmptyName,
        };
    }
    let Some(previous) = existing
        .iter()
        .find(|client| client.has_name(&command.current_name))
    else {
        return Decision::Rejected {
            reason: DecideError::ClientNotFound {
                name: command.current_name,
            },
        };
    };
    // A case-only rename of the same client is allowed.
    if existing
        .iter()
        .any(|client| client.has_name(&new_name) && client.client_code != previous.client_code)
    {
        return Decision::Rejected {
            reason: DecideError::DuplicateName { name: new_name },
        };
    }

    Decision::Renamed {
        previous: previous.clone(),
        record: ClientRecord {
            name: new_name,
            ..previous.clone()
        },
    }
}
