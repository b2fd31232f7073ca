//! Named API tokens and the domain → profile affinity cache
//!
//! Profiles come from a line-oriented token file. When a command targets a
//! domain, the profile chosen for it last time is offered first; otherwise the
//! user picks one, and that choice is remembered.

mod bindings;
mod secret;
mod selector;
mod token_file;

pub use bindings::{BindingStore, FileBindingStore, MemoryBindingStore};
pub use secret::SecretToken;
pub use selector::ProfileSelector;
pub use token_file::{
    CredentialProfile, FileTokenStore, MemoryTokenStore, TokenStore, parse_token_file,
};
