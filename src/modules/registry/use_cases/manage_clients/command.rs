#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddClient {
    pub name: String,
    /// Defaults to the client name when blank.
    pub payer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameClient {
    pub current_name: String,
    pub new_name: String,
}
