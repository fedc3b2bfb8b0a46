//! Simulatore di messaggistica a console: modello in memoria di utenti,
//! chat e messaggi, con tracciamento per-utente della posizione di lettura
//! e riuso degli identificativi liberati.
//!
//! Tutto lo stato vive in memoria per la durata di una esecuzione; il
//! binario `messaggero` guida il sistema tramite menu testuali.

pub mod auth;
pub mod chat;
pub mod common;
pub mod error;
pub mod id_pool;
pub mod message;
pub mod seed;
pub mod system;
pub mod user;
pub mod weak_index;
