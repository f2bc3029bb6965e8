pub mod auth;
pub mod pet;
pub mod storage;
pub mod webhook;

pub use pet::{Gender, NewPet, Pet, PetPatch};
pub use webhook::{LogStatus, PetCreatedEnvelope, WebhookLog};
