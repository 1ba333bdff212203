//! HTTP collaborators of the tax calculator: exchange rates, the
//! signed-in user's server message, and the Firestore calculation sink.

pub mod client;
pub mod firebase;
pub mod firestore;
pub mod nbg;

pub use client::{DEFAULT_TIMEOUT, http_client};
pub use firebase::FirebaseMessageClient;
pub use firestore::{FirestoreRepository, FirestoreRepositoryFactory};
pub use nbg::{NBG_RATES_URL, NbgRateClient};
