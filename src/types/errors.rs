use std::fmt;

// === StorageError ===

/// Errors raised by a durable key-value storage backend.
#[derive(Debug)]
pub enum StorageError {
    /// Reading a key failed.
    ReadFailed(String),
    /// Writing or removing a key failed (quota, I/O, locked database).
    WriteFailed(String),
    /// A stored value could not be encoded or decoded.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ReadFailed(msg) => write!(f, "Storage read failed: {}", msg),
            StorageError::WriteFailed(msg) => write!(f, "Storage write failed: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

// === CatalogError ===

/// Errors related to fetching the programme catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog source could not be reached or read.
    SourceUnavailable(String),
    /// The catalog payload was not a valid programme list.
    ParseError(String),
    /// The snapshot contains the same id more than once.
    DuplicateId(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::SourceUnavailable(msg) => {
                write!(f, "Catalog source unavailable: {}", msg)
            }
            CatalogError::ParseError(msg) => write!(f, "Catalog parse error: {}", msg),
            CatalogError::DuplicateId(id) => write!(f, "Duplicate programme id: {}", id),
        }
    }
}

impl std::error::Error for CatalogError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === HubError ===

/// Errors surfaced while wiring up the education hub.
#[derive(Debug)]
pub enum HubError {
    /// Opening the durable storage failed.
    Storage(StorageError),
    /// Loading the catalog failed and no cached copy was available.
    Catalog(CatalogError),
    /// The settings file could not be used.
    Settings(SettingsError),
    /// A referenced programme is not in the current catalog.
    UnknownProgramme(String),
    /// A catalog refresh was requested but no source is configured.
    NoCatalogSource,
}

impl fmt::Display for HubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HubError::Storage(e) => write!(f, "{}", e),
            HubError::Catalog(e) => write!(f, "{}", e),
            HubError::Settings(e) => write!(f, "{}", e),
            HubError::UnknownProgramme(id) => write!(f, "Unknown programme: {}", id),
            HubError::NoCatalogSource => write!(f, "No catalog source configured"),
        }
    }
}

impl std::error::Error for HubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HubError::Storage(e) => Some(e),
            HubError::Catalog(e) => Some(e),
            HubError::Settings(e) => Some(e),
            HubError::UnknownProgramme(_) | HubError::NoCatalogSource => None,
        }
    }
}

impl From<StorageError> for HubError {
    fn from(e: StorageError) -> Self {
        HubError::Storage(e)
    }
}

impl From<CatalogError> for HubError {
    fn from(e: CatalogError) -> Self {
        HubError::Catalog(e)
    }
}

impl From<SettingsError> for HubError {
    fn from(e: SettingsError) -> Self {
        HubError::Settings(e)
    }
}
