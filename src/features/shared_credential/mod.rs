pub mod client;
pub mod listing;
pub mod models;
pub mod xml_codec;

// Re-exports for external use (CLI, integration tests)
pub use client::{delete_shared_credential, list_shared_credentials};
pub use models::{
    CredentialIdentity, NEW_CREDENTIAL_ID, ServiceType, SharedCredential, SharedCredentialSummary,
};
pub use xml_codec::AccountField;
